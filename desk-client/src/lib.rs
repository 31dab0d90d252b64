//! Desk Client - HTTP client for the support desk REST API
//!
//! Provides the bearer-token HTTP wrapper, the session context shared by
//! every consumer, and typed user / ticket / message operations.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use api::DeskClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext, SessionError, SessionEvent,
    SessionStore,
};

// Re-export shared types for convenience
pub use shared::models::{
    Message, MessageType, Ticket, TicketPriority, TicketStatus, User, UserRole, visible_messages,
};
