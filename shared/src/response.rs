//! API error body
//!
//! The backend answers failures either with `{ "message": "..." }` or with a
//! plain-text body such as `Error: Ticket not found with ID: 4`.

use serde::{Deserialize, Serialize};

/// Structured error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extract a displayable message from a raw response body.
    ///
    /// JSON bodies yield their `message` field, anything else is returned
    /// trimmed. Empty bodies yield `None`.
    pub fn message_from_body(body: &str) -> Option<String> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
            return Some(parsed.message);
        }
        Some(trimmed.to_string())
    }
}
