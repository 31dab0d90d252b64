//! Message Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{User, UserRole};

/// Message type
///
/// `StatusUpdate` and `Assignment` are produced by the backend only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    #[default]
    Reply,
    Note,
    StatusUpdate,
    Assignment,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Reply => "REPLY",
            MessageType::Note => "NOTE",
            MessageType::StatusUpdate => "STATUS_UPDATE",
            MessageType::Assignment => "ASSIGNMENT",
        }
    }
}

/// Message entity (append-only, belongs to one ticket)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub ticket_id: i64,
    pub sender: User,
    pub content: String,
    pub message_type: MessageType,
    pub created_at: NaiveDateTime,
}

impl Message {
    /// Notes are agent-only; everything else is visible to all participants.
    pub fn is_visible_to(&self, role: UserRole) -> bool {
        match self.message_type {
            MessageType::Note => role.can_view_notes(),
            MessageType::Reply | MessageType::StatusUpdate | MessageType::Assignment => true,
        }
    }
}

/// Filter a thread down to what `role` may see, preserving server order.
pub fn visible_messages(messages: &[Message], role: UserRole) -> Vec<&Message> {
    messages.iter().filter(|m| m.is_visible_to(role)).collect()
}

/// Reply / note payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreate {
    pub ticket_id: i64,
    pub sender_id: i64,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User {
            id: 1,
            email: "u@x.io".into(),
            first_name: "U".into(),
            last_name: "X".into(),
            role,
            active: true,
        }
    }

    fn message(id: i64, message_type: MessageType) -> Message {
        Message {
            id,
            ticket_id: 9,
            sender: user(UserRole::Agent),
            content: format!("m{id}"),
            message_type,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_notes_hidden_from_customers() {
        let thread = vec![
            message(1, MessageType::Reply),
            message(2, MessageType::Note),
            message(3, MessageType::StatusUpdate),
        ];

        let customer: Vec<i64> = visible_messages(&thread, UserRole::Customer)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(customer, vec![1, 3]);

        let agent: Vec<i64> = visible_messages(&thread, UserRole::Agent)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(agent, vec![1, 2, 3]);
    }

    #[test]
    fn test_message_type_wire_format() {
        let t: MessageType = serde_json::from_str("\"STATUS_UPDATE\"").unwrap();
        assert_eq!(t, MessageType::StatusUpdate);
        assert_eq!(serde_json::to_string(&MessageType::Note).unwrap(), "\"NOTE\"");
    }
}
