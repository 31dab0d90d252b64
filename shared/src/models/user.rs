//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role
///
/// Closed set; every role-dependent decision in the client is an exhaustive
/// match over this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Agent,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Customer, UserRole::Agent, UserRole::Admin];

    /// Whether internal notes are shown to this role.
    pub fn can_view_notes(self) -> bool {
        match self {
            UserRole::Customer => false,
            UserRole::Agent | UserRole::Admin => true,
        }
    }

    /// Whether this role may author internal notes.
    pub fn can_author_notes(self) -> bool {
        match self {
            UserRole::Customer | UserRole::Admin => false,
            UserRole::Agent => true,
        }
    }

    /// Whether this role sees the status/priority/assignment controls.
    pub fn can_manage_tickets(self) -> bool {
        match self {
            UserRole::Customer => false,
            UserRole::Agent | UserRole::Admin => true,
        }
    }

    /// Wire name (`CUSTOMER`, `AGENT`, `ADMIN`)
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::Agent => "AGENT",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Next role in registration-form order (wraps)
    pub fn next(self) -> Self {
        match self {
            UserRole::Customer => UserRole::Agent,
            UserRole::Agent => UserRole::Admin,
            UserRole::Admin => UserRole::Customer,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl User {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Update user payload (name fields only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::Agent).unwrap(), "\"AGENT\"");
        let role: UserRole = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_note_permissions() {
        assert!(!UserRole::Customer.can_view_notes());
        assert!(UserRole::Agent.can_view_notes());
        assert!(UserRole::Admin.can_view_notes());
        assert!(UserRole::Agent.can_author_notes());
        assert!(!UserRole::Customer.can_author_notes());
    }

    #[test]
    fn test_user_deserialize_defaults_active() {
        let json = r#"{"id":7,"email":"a@b.c","firstName":"Ada","lastName":"Lovelace","role":"AGENT"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.active);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
