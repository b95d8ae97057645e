use super::{
    message::{Message, OutgoingDraft, LOCAL_ID_PREFIX},
    optimistic,
};

/// How far apart a placeholder and its server echo may be and still be
/// treated as the same message. Generous enough to absorb network latency,
/// tight enough not to merge a rapid identical second message.
const OPTIMISTIC_MATCH_WINDOW_MS: i64 = 8_000;

/// Outcome of feeding one inbound message to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingOutcome {
    /// New message inserted in sort order.
    Inserted,
    /// An optimistic placeholder was consumed; the server entry replaced it.
    ReplacedPlaceholder(String),
    /// The id was already present; nothing changed.
    Duplicate,
}

/// Ordered, deduplicated collection of one conversation's messages.
///
/// Invariants: entries are sorted by `(created_at_ms, id)` and no server id
/// appears twice. Placeholders live in the same list until their echo
/// arrives or the send fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_local_seq: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.iter().any(|message| message.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Installs the most recent page, replacing any previous contents.
    pub fn set_initial(&mut self, page: Vec<Message>) {
        self.messages = page;
        self.messages.sort_by(sort_order);
        self.messages.dedup_by(|a, b| a.id == b.id);
    }

    /// Merges an older page into the front of the store, skipping ids that
    /// are already present. Returns the number of messages inserted.
    pub fn prepend_older(&mut self, older: Vec<Message>) -> usize {
        let mut inserted = 0;
        for message in older {
            if !self.contains(&message.id) {
                self.insert_sorted(message);
                inserted += 1;
            }
        }
        inserted
    }

    /// Applies one inbound message. Idempotent by id; consumes at most one
    /// matching optimistic placeholder (same sender, content, kind, created
    /// within the match window) before inserting in sort order.
    pub fn append_incoming(&mut self, message: Message) -> IncomingOutcome {
        if self.contains(&message.id) {
            return IncomingOutcome::Duplicate;
        }

        let replaced = optimistic::confirm_first(
            &mut self.messages,
            Message::is_placeholder,
            |candidate| {
                candidate.sender_id == message.sender_id
                    && candidate.content == message.content
                    && candidate.kind == message.kind
                    && (message.created_at_ms - candidate.created_at_ms).abs()
                        <= OPTIMISTIC_MATCH_WINDOW_MS
            },
        );

        let outcome = match replaced {
            Some(placeholder) => IncomingOutcome::ReplacedPlaceholder(placeholder.id),
            None => IncomingOutcome::Inserted,
        };
        self.insert_sorted(message);
        outcome
    }

    /// Synthesizes a placeholder from a draft and appends it at the tail.
    /// Returns the placeholder id for later replacement or rollback.
    pub fn insert_optimistic(&mut self, draft: OutgoingDraft, now_ms: i64) -> String {
        self.next_local_seq += 1;
        let id = format!("{LOCAL_ID_PREFIX}{}", self.next_local_seq);
        self.insert_sorted(Message {
            id: id.clone(),
            conversation_id: draft.conversation_id,
            sender_id: draft.sender_id,
            content: draft.content,
            created_at_ms: now_ms,
            kind: draft.kind,
            attachments: Vec::new(),
        });
        id
    }

    /// Removes a placeholder after a failed send. Returns whether it existed.
    pub fn discard_optimistic(&mut self, placeholder_id: &str) -> bool {
        let before = self.messages.len();
        self.messages
            .retain(|message| !(message.is_placeholder() && message.id == placeholder_id));
        self.messages.len() < before
    }

    fn insert_sorted(&mut self, message: Message) {
        let index = self
            .messages
            .partition_point(|existing| sort_order(existing, &message) == std::cmp::Ordering::Less);
        self.messages.insert(index, message);
    }
}

fn sort_order(a: &Message, b: &Message) -> std::cmp::Ordering {
    a.sort_key().cmp(&b.sort_key())
}
