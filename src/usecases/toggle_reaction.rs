#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionSourceError {
    Unauthorized,
    MessageNotFound,
    Unavailable,
}

/// Outbound toggle failed; the optimistic flip must be reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionError {
    Unauthorized,
    MessageNotFound,
    TemporarilyUnavailable,
}

/// Port for the outbound reaction toggle call.
pub trait ReactionSink {
    fn toggle_reaction(&self, message_id: &str, emoji: &str) -> Result<(), ReactionSourceError>;
}

impl<T: ReactionSink + ?Sized> ReactionSink for &T {
    fn toggle_reaction(&self, message_id: &str, emoji: &str) -> Result<(), ReactionSourceError> {
        (*self).toggle_reaction(message_id, emoji)
    }
}

pub fn toggle_reaction(
    sink: &dyn ReactionSink,
    message_id: &str,
    emoji: &str,
) -> Result<(), ReactionError> {
    sink.toggle_reaction(message_id, emoji)
        .map_err(map_source_error)
}

fn map_source_error(error: ReactionSourceError) -> ReactionError {
    match error {
        ReactionSourceError::Unauthorized => ReactionError::Unauthorized,
        ReactionSourceError::MessageNotFound => ReactionError::MessageNotFound,
        ReactionSourceError::Unavailable => ReactionError::TemporarilyUnavailable,
    }
}
