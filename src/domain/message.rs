/// Reserved prefix for locally generated placeholder ids. Server ids never
/// start with it, so a message can be classified without extra bookkeeping.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Kind of message for rendering and receipt purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    File,
    System,
}

impl MessageKind {
    /// Returns the wire label for the kind.
    pub fn as_label(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::File => "file",
            MessageKind::System => "system",
        }
    }

    /// Parses a wire label, falling back to `Text` for unknown values.
    pub fn from_label(label: &str) -> Self {
        match label {
            "file" => MessageKind::File,
            "system" => MessageKind::System,
            _ => MessageKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at_ms: i64,
    pub kind: MessageKind,
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Returns true for a locally created placeholder awaiting its server echo.
    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    /// Total-order key within a conversation: `(created_at, id)`.
    pub fn sort_key(&self) -> (i64, &str) {
        (self.created_at_ms, self.id.as_str())
    }
}

/// A message draft before it has either a server id or a placeholder id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingDraft {
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
}
