//! Use case for creating a message in the conversation.
//!
//! The create call is fire-and-forget: the authoritative echo arrives later
//! over the push channel and replaces the optimistic placeholder.

use crate::domain::message::MessageKind;

/// Errors that can occur at the source level (the server API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendSourceError {
    Unauthorized,
    ConversationNotFound,
    Unavailable,
}

/// Domain-level errors for the send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Message content is empty after trimming whitespace.
    EmptyMessage,
    Unauthorized,
    ConversationNotFound,
    TemporarilyUnavailable,
}

/// Port for the outbound create-message call.
pub trait MessageSender {
    fn create_message(&self, kind: MessageKind, content: &str) -> Result<(), SendSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn create_message(&self, kind: MessageKind, content: &str) -> Result<(), SendSourceError> {
        (*self).create_message(kind, content)
    }
}

/// Validates the content (must not be blank) and issues the create call.
/// Returns the trimmed content actually sent so the caller can build a
/// matching optimistic placeholder.
pub fn send_message<'a>(
    sender: &dyn MessageSender,
    kind: MessageKind,
    content: &'a str,
) -> Result<&'a str, SendError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(SendError::EmptyMessage);
    }

    sender
        .create_message(kind, content)
        .map_err(map_source_error)?;
    Ok(content)
}

fn map_source_error(error: SendSourceError) -> SendError {
    match error {
        SendSourceError::Unauthorized => SendError::Unauthorized,
        SendSourceError::ConversationNotFound => SendError::ConversationNotFound,
        SendSourceError::Unavailable => SendError::TemporarilyUnavailable,
    }
}
