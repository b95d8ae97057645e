//! Wire layer: the ingestion boundary between the push transport and the
//! engine, plus the cursor token format the gateway paginates with.

pub mod cursor;
pub mod decode;
pub mod monitor;

/// Returns the wire module name for smoke checks.
pub fn module_name() -> &'static str {
    "wire"
}
