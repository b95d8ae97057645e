//! Client-side real-time conversation synchronization engine.
//!
//! Keeps a local view of one conversation's messages, receipts, reactions,
//! typing signals, and presence consistent with an authoritative server
//! under out-of-order push delivery, optimistic local writes, and paginated
//! history loading. A presentation layer observes the state; rendering,
//! storage, and the transport itself live elsewhere.

pub mod domain;
pub mod infra;
pub mod usecases;
pub mod wire;
