//! Ticket endpoints (`/tickets`)

use shared::models::{
    PriorityUpdate, StatusUpdate, Ticket, TicketAssign, TicketCreate, TicketPriority, TicketStatus,
};

use super::DeskClient;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> DeskClient<H> {
    pub async fn create_ticket(
        &self,
        customer_id: i64,
        title: &str,
        description: &str,
        priority: TicketPriority,
    ) -> ClientResult<Ticket> {
        let body = TicketCreate {
            customer_id,
            title: title.to_string(),
            description: description.to_string(),
            priority,
        };
        self.http.post("tickets", &body).await
    }

    pub async fn get_ticket(&self, id: i64) -> ClientResult<Ticket> {
        self.http.get(&format!("tickets/{}", id)).await
    }

    pub async fn tickets_by_customer(&self, customer_id: i64) -> ClientResult<Vec<Ticket>> {
        self.http.get(&format!("tickets/customer/{}", customer_id)).await
    }

    pub async fn tickets_by_agent(&self, agent_id: i64) -> ClientResult<Vec<Ticket>> {
        self.http.get(&format!("tickets/agent/{}", agent_id)).await
    }

    pub async fn unassigned_tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.http.get("tickets/unassigned").await
    }

    pub async fn all_tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.http.get("tickets").await
    }

    /// `userId` is taken from the session when present.
    pub async fn update_status(&self, id: i64, status: TicketStatus) -> ClientResult<Ticket> {
        let body = StatusUpdate {
            status,
            user_id: self.session().user().map(|u| u.id),
        };
        self.http.patch(&format!("tickets/{}/status", id), &body).await
    }

    pub async fn update_priority(&self, id: i64, priority: TicketPriority) -> ClientResult<Ticket> {
        let body = PriorityUpdate {
            priority,
            user_id: self.session().user().map(|u| u.id),
        };
        self.http.patch(&format!("tickets/{}/priority", id), &body).await
    }

    pub async fn assign_ticket(&self, id: i64, agent_id: i64) -> ClientResult<Ticket> {
        let body = TicketAssign { agent_id };
        self.http.patch(&format!("tickets/{}/assign", id), &body).await
    }

    pub async fn unassign_ticket(&self, id: i64) -> ClientResult<Ticket> {
        self.http.patch_empty(&format!("tickets/{}/unassign", id)).await
    }
}
