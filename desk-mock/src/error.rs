//! Error responses
//!
//! Every failure is answered with `{ "message": "..." }`.
//!
//! | variant | status |
//! |---------|--------|
//! | `Validation` | 400 |
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `Internal` | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::response::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Missing or unusable credentials
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Please login first".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Unauthorized("Invalid or expired token".to_string())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Internal error");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
