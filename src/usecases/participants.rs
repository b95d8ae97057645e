//! Conversation membership management calls.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantSourceError {
    Unauthorized,
    UserNotFound,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    Unauthorized,
    UserNotFound,
    TemporarilyUnavailable,
}

/// Port for adding and removing conversation participants. Presence updates
/// arrive separately over the push channel.
pub trait ParticipantAdmin {
    fn add_participant(&self, user_id: &str) -> Result<(), ParticipantSourceError>;
    fn remove_participant(&self, user_id: &str) -> Result<(), ParticipantSourceError>;
}

impl<T: ParticipantAdmin + ?Sized> ParticipantAdmin for &T {
    fn add_participant(&self, user_id: &str) -> Result<(), ParticipantSourceError> {
        (*self).add_participant(user_id)
    }

    fn remove_participant(&self, user_id: &str) -> Result<(), ParticipantSourceError> {
        (*self).remove_participant(user_id)
    }
}

pub fn add_participant(admin: &dyn ParticipantAdmin, user_id: &str) -> Result<(), ParticipantError> {
    admin.add_participant(user_id).map_err(map_source_error)
}

pub fn remove_participant(
    admin: &dyn ParticipantAdmin,
    user_id: &str,
) -> Result<(), ParticipantError> {
    admin.remove_participant(user_id).map_err(map_source_error)
}

fn map_source_error(error: ParticipantSourceError) -> ParticipantError {
    match error {
        ParticipantSourceError::Unauthorized => ParticipantError::Unauthorized,
        ParticipantSourceError::UserNotFound => ParticipantError::UserNotFound,
        ParticipantSourceError::Unavailable => ParticipantError::TemporarilyUnavailable,
    }
}
