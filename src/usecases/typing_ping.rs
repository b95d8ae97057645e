//! Outbound typing pings, throttled by last-sent timestamp.
//!
//! The debounce is against the time the last ping actually went out, not a
//! timer reset on every keystroke: continuous typing produces a steady ping
//! rate instead of suppressing pings entirely.

const TYPING_PING_FAILED: &str = "SYNC_TYPING_PING_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingSourceError {
    Unauthorized,
    Unavailable,
}

/// Port for the outbound typing ping. No body: the server attributes the
/// ping to the caller's session.
pub trait TypingSink {
    fn send_typing(&self) -> Result<(), TypingSourceError>;
}

impl<T: TypingSink + ?Sized> TypingSink for &T {
    fn send_typing(&self) -> Result<(), TypingSourceError> {
        (*self).send_typing()
    }
}

/// Rate limiter for outbound typing pings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingThrottle {
    min_interval_ms: i64,
    last_sent_ms: Option<i64>,
}

impl TypingThrottle {
    pub fn new(min_interval_ms: i64) -> Self {
        Self {
            min_interval_ms,
            last_sent_ms: None,
        }
    }

    /// Returns whether a ping may go out now, recording the send time if so.
    pub fn try_acquire(&mut self, now_ms: i64) -> bool {
        let allowed = match self.last_sent_ms {
            None => true,
            Some(last) => now_ms - last >= self.min_interval_ms,
        };
        if allowed {
            self.last_sent_ms = Some(now_ms);
        }
        allowed
    }
}

/// Sends a typing ping if the throttle allows one. Ping failures are
/// best-effort: logged and dropped, like acknowledgments.
pub fn ping_typing(sink: &dyn TypingSink, throttle: &mut TypingThrottle, now_ms: i64) -> bool {
    if !throttle.try_acquire(now_ms) {
        return false;
    }

    if let Err(error) = sink.send_typing() {
        tracing::warn!(
            code = TYPING_PING_FAILED,
            error = ?error,
            "typing ping dropped"
        );
    }
    true
}
