//! Data models
//!
//! Mirrors the backend's JSON: camelCase fields, SCREAMING_SNAKE_CASE enums.
//! All IDs are `i64`.

pub mod message;
pub mod ticket;
pub mod user;

// Re-exports
pub use message::*;
pub use ticket::*;
pub use user::*;
