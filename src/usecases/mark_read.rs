//! Delivered/read acknowledgments.
//!
//! Acknowledgments are best-effort annotations: a failure is logged and
//! dropped, never surfaced, because the next qualifying event retries
//! naturally and the reconciling push stream corrects any divergence.

const DELIVERED_ACK_FAILED: &str = "SYNC_DELIVERED_ACK_FAILED";
const READ_ACK_FAILED: &str = "SYNC_READ_ACK_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckSourceError {
    Unauthorized,
    Unavailable,
}

/// Port for outbound delivery/read acknowledgments. `mark_conversation_read`
/// has no body: the server stamps "now" as the caller's read pointer.
pub trait ReceiptSink {
    fn mark_delivered(&self, message_id: &str) -> Result<(), AckSourceError>;
    fn mark_conversation_read(&self) -> Result<(), AckSourceError>;
}

impl<T: ReceiptSink + ?Sized> ReceiptSink for &T {
    fn mark_delivered(&self, message_id: &str) -> Result<(), AckSourceError> {
        (*self).mark_delivered(message_id)
    }

    fn mark_conversation_read(&self) -> Result<(), AckSourceError> {
        (*self).mark_conversation_read()
    }
}

/// Acknowledges delivery of one inbound message. Best-effort.
pub fn acknowledge_delivery(sink: &dyn ReceiptSink, message_id: &str) {
    if let Err(error) = sink.mark_delivered(message_id) {
        tracing::warn!(
            code = DELIVERED_ACK_FAILED,
            message_id,
            error = ?error,
            "delivered acknowledgment dropped"
        );
    }
}

/// Advances the caller's conversation read pointer to now. Best-effort.
pub fn advance_read_pointer(sink: &dyn ReceiptSink) {
    if let Err(error) = sink.mark_conversation_read() {
        tracing::warn!(
            code = READ_ACK_FAILED,
            error = ?error,
            "read acknowledgment dropped"
        );
    }
}
