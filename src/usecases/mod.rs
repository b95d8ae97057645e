//! Use case layer: outbound operations and the per-conversation controller.

pub mod contracts;
pub mod controller;
pub mod load_history;
pub mod mark_read;
pub mod participants;
pub mod search;
pub mod send_message;
pub mod toggle_reaction;
pub mod typing_ping;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
