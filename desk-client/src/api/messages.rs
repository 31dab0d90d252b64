//! Message endpoints (`/messages`)

use shared::models::{Message, MessageCreate};

use super::DeskClient;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> DeskClient<H> {
    /// Reply visible to every participant
    pub async fn add_reply(&self, ticket_id: i64, sender_id: i64, content: &str) -> ClientResult<Message> {
        let body = MessageCreate {
            ticket_id,
            sender_id,
            content: content.to_string(),
        };
        self.http.post("messages/reply", &body).await
    }

    /// Internal note; the backend rejects non-agent senders
    pub async fn add_note(&self, ticket_id: i64, sender_id: i64, content: &str) -> ClientResult<Message> {
        let body = MessageCreate {
            ticket_id,
            sender_id,
            content: content.to_string(),
        };
        self.http.post("messages/note", &body).await
    }

    /// Messages of a ticket in server order
    pub async fn ticket_messages(&self, ticket_id: i64) -> ClientResult<Vec<Message>> {
        self.http.get(&format!("messages/ticket/{}", ticket_id)).await
    }

    pub async fn user_messages(&self, user_id: i64) -> ClientResult<Vec<Message>> {
        self.http.get(&format!("messages/user/{}", user_id)).await
    }

    pub async fn get_message(&self, id: i64) -> ClientResult<Message> {
        self.http.get(&format!("messages/{}", id)).await
    }

    /// Only notes can be deleted (server-enforced)
    pub async fn delete_message(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("messages/{}", id)).await
    }
}
