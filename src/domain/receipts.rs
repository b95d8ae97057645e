use std::collections::HashMap;

use super::{message::Message, store::MessageStore};

/// Delivery state of a self-authored message, as shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Delivered(usize),
    Read(usize),
}

/// One inbound receipt mutation, already normalized from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpdate {
    pub message_id: String,
    pub user_id: String,
    pub delivered_at_ms: Option<i64>,
    pub read_at_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Receipt {
    pub delivered_at_ms: Option<i64>,
    pub read_at_ms: Option<i64>,
}

impl Receipt {
    /// A read receipt implies the message reached the device.
    pub fn is_delivered(&self) -> bool {
        self.delivered_at_ms.is_some() || self.read_at_ms.is_some()
    }

    pub fn is_read(&self) -> bool {
        self.read_at_ms.is_some()
    }

    fn merge(&mut self, delivered_at_ms: Option<i64>, read_at_ms: Option<i64>) {
        self.delivered_at_ms = merge_max(self.delivered_at_ms, delivered_at_ms);
        self.read_at_ms = merge_max(self.read_at_ms, read_at_ms);
    }
}

/// Later-or-existing: a timestamp never regresses once set, and arrival
/// order of updates cannot matter.
fn merge_max(existing: Option<i64>, incoming: Option<i64>) -> Option<i64> {
    match (existing, incoming) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Per-message, per-user delivery/read state plus the conversation-level
/// read pointers it derives receipts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptLedger {
    receipts: HashMap<(String, String), Receipt>,
    read_pointers: HashMap<String, i64>,
}

impl ReceiptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipt(&self, message_id: &str, user_id: &str) -> Option<&Receipt> {
        self.receipts
            .get(&(message_id.to_owned(), user_id.to_owned()))
    }

    pub fn read_pointer(&self, user_id: &str) -> Option<i64> {
        self.read_pointers.get(user_id).copied()
    }

    /// Merges a batch of updates. Updates naming a message the store does
    /// not hold are dropped: receipts are best-effort annotations.
    pub fn apply_updates(&mut self, updates: &[ReceiptUpdate], store: &MessageStore) {
        for update in updates {
            if !store.contains(&update.message_id) {
                tracing::debug!(
                    message_id = %update.message_id,
                    "receipt update for unknown message dropped"
                );
                continue;
            }
            self.receipts
                .entry((update.message_id.clone(), update.user_id.clone()))
                .or_default()
                .merge(update.delivered_at_ms, update.read_at_ms);
        }
    }

    /// Advances a participant's conversation read pointer and backfills a
    /// read receipt for every message authored by someone else at or before
    /// it. Existing receipts only ever advance.
    pub fn apply_conversation_read(
        &mut self,
        user_id: &str,
        last_read_at_ms: i64,
        store: &MessageStore,
    ) {
        let pointer = self.read_pointers.entry(user_id.to_owned()).or_insert(0);
        *pointer = (*pointer).max(last_read_at_ms);
        let pointer = *pointer;

        for message in store.messages() {
            if message.sender_id == user_id || message.created_at_ms > pointer {
                continue;
            }
            self.receipts
                .entry((message.id.clone(), user_id.to_owned()))
                .or_default()
                .merge(None, Some(pointer));
        }
    }

    /// Synthesized receipt for a locally authored message: the sender has
    /// trivially received and read their own text.
    pub fn record_self_receipt(&mut self, message_id: &str, self_user_id: &str, now_ms: i64) {
        self.receipts
            .entry((message_id.to_owned(), self_user_id.to_owned()))
            .or_default()
            .merge(Some(now_ms), Some(now_ms));
    }

    /// Re-keys receipts when a placeholder is replaced by its server echo.
    pub fn rename_message(&mut self, old_id: &str, new_id: &str) {
        let keys: Vec<(String, String)> = self
            .receipts
            .keys()
            .filter(|(message_id, _)| message_id == old_id)
            .cloned()
            .collect();
        for key in keys {
            if let Some(receipt) = self.receipts.remove(&key) {
                self.receipts
                    .entry((new_id.to_owned(), key.1))
                    .or_default()
                    .merge(receipt.delivered_at_ms, receipt.read_at_ms);
            }
        }
    }

    /// Drops all receipts for a message, used when a failed send rolls its
    /// placeholder back.
    pub fn forget_message(&mut self, message_id: &str) {
        self.receipts
            .retain(|(receipt_message_id, _), _| receipt_message_id != message_id);
    }

    /// Status for a self-authored message; `None` for everything else.
    /// Read outranks delivered outranks sent; counts exclude the author.
    pub fn status_for(&self, message: &Message, self_user_id: &str) -> Option<DeliveryStatus> {
        if message.sender_id != self_user_id {
            return None;
        }

        let mut delivered = 0;
        let mut read = 0;
        for ((message_id, user_id), receipt) in &self.receipts {
            if message_id != &message.id || user_id == self_user_id {
                continue;
            }
            if receipt.is_read() {
                read += 1;
            } else if receipt.is_delivered() {
                delivered += 1;
            }
        }

        Some(if read > 0 {
            DeliveryStatus::Read(read)
        } else if delivered > 0 {
            DeliveryStatus::Delivered(delivered)
        } else {
            DeliveryStatus::Sent
        })
    }
}
