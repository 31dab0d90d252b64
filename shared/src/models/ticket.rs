//! Ticket Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::User;

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
        }
    }

    /// Human label for selects
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Next value in select order (wraps)
    pub fn next(self) -> Self {
        match self {
            TicketStatus::Open => TicketStatus::InProgress,
            TicketStatus::InProgress => TicketStatus::Resolved,
            TicketStatus::Resolved => TicketStatus::Closed,
            TicketStatus::Closed => TicketStatus::Open,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Low => "LOW",
            TicketPriority::Medium => "MEDIUM",
            TicketPriority::High => "HIGH",
            TicketPriority::Urgent => "URGENT",
        }
    }

    /// Human label for selects
    pub fn label(self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }

    /// Next value in select order (wraps)
    pub fn next(self) -> Self {
        match self {
            TicketPriority::Low => TicketPriority::Medium,
            TicketPriority::Medium => TicketPriority::High,
            TicketPriority::High => TicketPriority::Urgent,
            TicketPriority::Urgent => TicketPriority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TicketPriority::Low => TicketPriority::Urgent,
            TicketPriority::Medium => TicketPriority::Low,
            TicketPriority::High => TicketPriority::Medium,
            TicketPriority::Urgent => TicketPriority::High,
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Owning customer (always present)
    pub customer: User,
    /// Assigned agent, role AGENT when present
    #[serde(default)]
    pub assigned_agent: Option<User>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Ticket {
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_agent.as_ref().is_some_and(|a| a.id == user_id)
    }
}

/// Create ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreate {
    pub customer_id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

/// Status update payload
///
/// `user_id` is the acting user; the backend rejects non-agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Priority update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityUpdate {
    pub priority: TicketPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Assign ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAssign {
    pub agent_id: i64,
}
