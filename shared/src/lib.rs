//! Shared types for the support desk
//!
//! Wire types exchanged with the REST backend: users, tickets, messages,
//! request payloads and the error body format. Used by `desk-client`,
//! `desk-tui` and `desk-mock`.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Message, MessageCreate, MessageType, PriorityUpdate, StatusUpdate, Ticket, TicketAssign,
    TicketCreate, TicketPriority, TicketStatus, User, UserRole, UserUpdate, visible_messages,
};
