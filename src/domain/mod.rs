//! Domain layer: conversation state components and their invariants.

pub mod events;
pub mod message;
pub mod optimistic;
pub mod presence;
pub mod reactions;
pub mod receipts;
pub mod store;
pub mod typing;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
