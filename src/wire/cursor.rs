//! Opaque pagination cursors.
//!
//! A cursor is the base64 of a small JSON boundary: the `(created_at, id)`
//! sort key of the oldest message already served. Clients treat the token
//! as opaque; only the gateway encodes and decodes it.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub before_created_at_ms: i64,
    pub before_id: String,
}

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("cursor body is not a valid boundary: {0}")]
    Body(#[from] serde_json::Error),
}

impl Cursor {
    pub fn new(before_created_at_ms: i64, before_id: impl Into<String>) -> Self {
        Self {
            before_created_at_ms,
            before_id: before_id.into(),
        }
    }

    pub fn encode(&self) -> String {
        let body = serde_json::json!({
            "beforeCreatedAtMs": self.before_created_at_ms,
            "beforeId": self.before_id,
        });
        URL_SAFE_NO_PAD.encode(body.to_string())
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(token)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
