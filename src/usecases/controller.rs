//! Orchestration for one conversation.
//!
//! A `SyncController` owns the state components exclusively and is driven
//! from a single-threaded event loop: push events, timer ticks, and user
//! actions each run to completion before the next is processed, so the
//! state is always self-consistent when the presentation layer reads it.

use crate::{
    domain::{
        events::PushEvent,
        message::{Message, MessageKind, OutgoingDraft},
        presence::PresenceTracker,
        reactions::{ReactionAggregate, ReactionBoard},
        receipts::{DeliveryStatus, ReceiptLedger},
        store::{IncomingOutcome, MessageStore},
        typing::TypingRegistry,
    },
    infra::config::AppConfig,
    usecases::{
        contracts::ConversationGateway,
        load_history::{self, FetchError},
        mark_read,
        send_message::{self, SendError},
        toggle_reaction::{self, ReactionError},
        typing_ping::{self, TypingThrottle},
    },
};

/// Lifecycle of the conversation view. Sub-operations within `Ready`
/// (pagination, sends, reactions) are transient and never block each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    Loading,
    Ready,
}

/// Result of a completed older-page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlderLoadOutcome {
    /// Messages actually inserted (after dedup by id).
    pub prepended: usize,
    /// No further history remains.
    pub exhausted: bool,
}

/// Keeps the viewport still when older content is prepended above it: the
/// new scroll position is the old one pushed down by the added height.
pub fn compensate_scroll(scroll_offset: u64, height_before: u64, height_after: u64) -> u64 {
    scroll_offset + height_after.saturating_sub(height_before)
}

pub struct SyncController<G: ConversationGateway> {
    conversation_id: String,
    self_user_id: String,
    gateway: G,
    store: MessageStore,
    receipts: ReceiptLedger,
    reactions: ReactionBoard,
    presence: PresenceTracker,
    typing: TypingRegistry,
    throttle: TypingThrottle,
    phase: ConversationPhase,
    next_cursor: Option<String>,
    page_size: usize,
    visible: bool,
    /// Timestamp of the newest message covered by our last read ack.
    last_read_ack_ms: Option<i64>,
}

impl<G: ConversationGateway> SyncController<G> {
    pub fn new(
        conversation_id: impl Into<String>,
        self_user_id: impl Into<String>,
        gateway: G,
        config: &AppConfig,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            self_user_id: self_user_id.into(),
            gateway,
            store: MessageStore::new(),
            receipts: ReceiptLedger::new(),
            reactions: ReactionBoard::new(),
            presence: PresenceTracker::new(),
            typing: TypingRegistry::with_ttl(config.typing.ttl_ms),
            throttle: TypingThrottle::new(config.typing.ping_interval_ms),
            phase: ConversationPhase::Idle,
            next_cursor: None,
            page_size: config.sync.page_size,
            visible: false,
            last_read_ack_ms: None,
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn status_for(&self, message: &Message) -> Option<DeliveryStatus> {
        self.receipts.status_for(message, &self.self_user_id)
    }

    pub fn reactions_for(&self, message_id: &str) -> &[ReactionAggregate] {
        self.reactions.aggregates_for(message_id)
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn typing_summary(&self, now_ms: i64) -> Option<String> {
        self.typing.summary(&self.self_user_id, now_ms)
    }

    pub fn can_load_older(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Fetches the most recent page and enters `Ready`. The conversation is
    /// considered visible from here on and the latest message is read-acked.
    pub fn start(&mut self) -> Result<(), FetchError> {
        if self.phase != ConversationPhase::Idle {
            return Ok(());
        }

        self.phase = ConversationPhase::Loading;
        let page = match load_history::load_initial(&self.gateway, self.page_size) {
            Ok(page) => page,
            Err(error) => {
                self.phase = ConversationPhase::Idle;
                return Err(error);
            }
        };

        self.store.set_initial(page.messages);
        self.next_cursor = page.next_cursor;
        self.phase = ConversationPhase::Ready;
        self.visible = true;
        self.ack_read();
        Ok(())
    }

    /// Whether the top sentinel should trigger an older-page load.
    pub fn should_load_older(&self, top_sentinel_visible: bool) -> bool {
        self.phase == ConversationPhase::Ready && top_sentinel_visible && self.can_load_older()
    }

    /// Loads and merges the next older page. A failed fetch leaves the
    /// store and the cursor exactly as they were.
    pub fn load_older(&mut self) -> Result<OlderLoadOutcome, FetchError> {
        if self.phase != ConversationPhase::Ready {
            return Ok(OlderLoadOutcome {
                prepended: 0,
                exhausted: false,
            });
        }
        let Some(cursor) = self.next_cursor.clone() else {
            return Ok(OlderLoadOutcome {
                prepended: 0,
                exhausted: true,
            });
        };

        let page = load_history::load_older(&self.gateway, self.page_size, &cursor)?;
        let prepended = self.store.prepend_older(page.messages);
        self.next_cursor = page.next_cursor;
        Ok(OlderLoadOutcome {
            prepended,
            exhausted: self.next_cursor.is_none(),
        })
    }

    /// Sends a message: the placeholder and self-receipt appear
    /// synchronously, then the outbound call goes out. A failed call rolls
    /// both back and surfaces the error.
    pub fn send(
        &mut self,
        kind: MessageKind,
        content: &str,
        now_ms: i64,
    ) -> Result<String, SendError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let placeholder_id = self.store.insert_optimistic(
            OutgoingDraft {
                conversation_id: self.conversation_id.clone(),
                sender_id: self.self_user_id.clone(),
                content: trimmed.to_owned(),
                kind,
            },
            now_ms,
        );
        self.receipts
            .record_self_receipt(&placeholder_id, &self.self_user_id, now_ms);

        match send_message::send_message(&self.gateway, kind, trimmed) {
            Ok(_) => Ok(placeholder_id),
            Err(error) => {
                self.store.discard_optimistic(&placeholder_id);
                self.receipts.forget_message(&placeholder_id);
                Err(error)
            }
        }
    }

    /// Optimistically toggles a reaction and issues the outbound call; the
    /// toggle is self-inverse, so a failed call is undone by re-applying it.
    pub fn toggle_reaction(&mut self, message_id: &str, emoji: &str) -> Result<(), ReactionError> {
        if !self.store.contains(message_id) {
            return Err(ReactionError::MessageNotFound);
        }

        self.reactions.toggle(message_id, emoji, &self.self_user_id);
        match toggle_reaction::toggle_reaction(&self.gateway, message_id, emoji) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.reactions.revert(message_id, emoji, &self.self_user_id);
                Err(error)
            }
        }
    }

    /// Local keystroke activity; at most one outbound ping per throttle
    /// interval. Returns whether a ping went out.
    pub fn notify_typing_activity(&mut self, now_ms: i64) -> bool {
        typing_ping::ping_typing(&self.gateway, &mut self.throttle, now_ms)
    }

    /// Visibility change from the presentation layer. Becoming visible
    /// read-acks once; hiding only stops further acks.
    pub fn set_visible(&mut self, visible: bool) {
        let became_visible = visible && !self.visible;
        self.visible = visible;
        if became_visible {
            self.ack_read();
        }
    }

    /// Periodic tick from the event loop; expires stale typing signals.
    pub fn on_tick(&mut self, now_ms: i64) {
        self.typing.sweep(now_ms);
    }

    /// Applies one inbound push event. Safe under at-least-once delivery:
    /// every arm is idempotent, so duplicates are no-ops end to end.
    pub fn handle_push(&mut self, event: PushEvent, now_ms: i64) {
        tracing::debug!(kind = event.kind(), "push event");
        match event {
            PushEvent::MessageNew(message) => self.on_message_new(message, now_ms),
            PushEvent::Typing {
                user_id,
                display_name,
            } => self.typing.signal(&user_id, display_name, now_ms),
            PushEvent::ReceiptUpdate { updates } => {
                self.receipts.apply_updates(&updates, &self.store);
            }
            PushEvent::ReactionUpdate {
                message_id,
                reactions,
            } => self.reactions.reconcile(&message_id, reactions),
            PushEvent::ConversationRead {
                user_id,
                last_read_at_ms,
            } => self
                .receipts
                .apply_conversation_read(&user_id, last_read_at_ms, &self.store),
            PushEvent::SubscriptionSucceeded { member_ids } => self.presence.set_all(member_ids),
            PushEvent::MemberAdded { user_id } => self.presence.add(&user_id),
            PushEvent::MemberRemoved { user_id } => self.presence.remove(&user_id),
        }
    }

    fn on_message_new(&mut self, message: Message, now_ms: i64) {
        let sender_id = message.sender_id.clone();
        let message_id = message.id.clone();

        match self.store.append_incoming(message) {
            IncomingOutcome::Duplicate => return,
            IncomingOutcome::ReplacedPlaceholder(placeholder_id) => {
                self.receipts.rename_message(&placeholder_id, &message_id);
                self.reactions.rename_message(&placeholder_id, &message_id);
            }
            IncomingOutcome::Inserted => {}
        }

        if sender_id != self.self_user_id {
            mark_read::acknowledge_delivery(&self.gateway, &message_id);
            if self.visible {
                self.ack_read();
            }
        }
    }

    /// Advances the server-side read pointer, debounced by the latest
    /// message timestamp: once per view change, not once per message.
    fn ack_read(&mut self) {
        let watermark = self.store.latest().map(|message| message.created_at_ms);
        if watermark.is_some() && watermark <= self.last_read_ack_ms {
            return;
        }
        mark_read::advance_read_pointer(&self.gateway);
        self.last_read_ack_ms = self.last_read_ack_ms.max(watermark);
    }
}
