//! Client error types

use reqwest::StatusCode;
use shared::response::ErrorBody;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, DNS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required (401); carries the server's message
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (400 with message body)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation needs a session that is not there
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ClientError {
    /// Map a non-success status and its raw body to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = ErrorBody::message_from_body(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Single human-readable line for inline display next to a form.
    ///
    /// Server-provided messages are shown verbatim; everything else falls
    /// back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Unauthorized(m)
            | ClientError::Forbidden(m)
            | ClientError::NotFound(m)
            | ClientError::Validation(m) => m.clone(),
            ClientError::Server { .. }
            | ClientError::Http(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Serialization(_)
            | ClientError::Config(_)
            | ClientError::InvalidState(_) => fallback.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
