//! In-memory store and business rules
//!
//! Tickets and messages reference users by id and are materialized with
//! the current user records on every read.

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use shared::client::RegisterRequest;
use shared::models::{
    Message, MessageCreate, MessageType, Ticket, TicketCreate, TicketPriority, TicketStatus, User,
    UserRole,
};
use shared::util::now_local;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::JwtService;
use crate::error::{AppError, AppResult};

/// Demo accounts created by [`MockStore::seed_demo`]
pub mod demo {
    pub const CUSTOMER_EMAIL: &str = "customer@example.com";
    pub const CUSTOMER_PASSWORD: &str = "customer123";
    pub const AGENT_EMAIL: &str = "agent@supportdesk.io";
    pub const AGENT_PASSWORD: &str = "agent123";
    pub const SECOND_AGENT_EMAIL: &str = "sam@supportdesk.io";
    pub const ADMIN_EMAIL: &str = "admin@supportdesk.io";
    pub const ADMIN_PASSWORD: &str = "admin123";
}

/// Shared server state
#[derive(Clone, Debug)]
pub struct AppState {
    store: Arc<Mutex<MockStore>>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(store: MockStore, jwt_secret: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            jwt: JwtService::new(jwt_secret),
        }
    }

    pub fn store(&self) -> AppResult<MutexGuard<'_, MockStore>> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("Store lock poisoned".to_string()))
    }
}

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct TicketRecord {
    id: i64,
    title: String,
    description: String,
    status: TicketStatus,
    priority: TicketPriority,
    customer_id: i64,
    agent_id: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
struct MessageRecord {
    id: i64,
    ticket_id: i64,
    sender_id: i64,
    content: String,
    message_type: MessageType,
    created_at: NaiveDateTime,
}

/// Backend data
#[derive(Debug, Default)]
pub struct MockStore {
    users: Vec<UserRecord>,
    tickets: Vec<TicketRecord>,
    messages: Vec<MessageRecord>,
    next_user_id: i64,
    next_ticket_id: i64,
    next_message_id: i64,
    token_generation: u64,
}

fn hash_password(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.to_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one customer, two agents and an admin.
    pub fn seed_demo() -> Self {
        let mut store = Self::new();
        let accounts = [
            (demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD, "Cara", "Customer", UserRole::Customer),
            (demo::AGENT_EMAIL, demo::AGENT_PASSWORD, "Alice", "Agent", UserRole::Agent),
            (demo::SECOND_AGENT_EMAIL, demo::AGENT_PASSWORD, "Sam", "Support", UserRole::Agent),
            (demo::ADMIN_EMAIL, demo::ADMIN_PASSWORD, "Ada", "Admin", UserRole::Admin),
        ];
        for (email, password, first, last, role) in accounts {
            // Fresh store: emails are unique
            let _ = store.register(RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role,
            });
        }
        store
    }

    // ========== Sessions ==========

    pub fn token_generation(&self) -> u64 {
        self.token_generation
    }

    /// Invalidate every issued token.
    pub fn revoke_sessions(&mut self) {
        self.token_generation += 1;
        tracing::info!(generation = self.token_generation, "Sessions revoked");
    }

    // ========== Users ==========

    pub fn register(&mut self, req: RegisterRequest) -> AppResult<User> {
        let email = req.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email is required"));
        }
        if req.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if self.users.iter().any(|r| r.user.email.eq_ignore_ascii_case(&email)) {
            return Err(AppError::validation(format!(
                "User with email {} already exists",
                email
            )));
        }

        self.next_user_id += 1;
        let user = User {
            id: self.next_user_id,
            email: email.clone(),
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
            active: true,
        };
        self.users.push(UserRecord {
            user: user.clone(),
            password_hash: hash_password(&email, &req.password),
        });
        Ok(user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim();
        self.users
            .iter()
            .find(|r| {
                r.user.active
                    && r.user.email.eq_ignore_ascii_case(email)
                    && r.password_hash == hash_password(email, password)
            })
            .map(|r| r.user.clone())
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))
    }

    pub fn user(&self, id: i64) -> AppResult<User> {
        self.users
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.clone())
            .ok_or_else(|| AppError::not_found(format!("User not found with ID: {}", id)))
    }

    fn user_mut(&mut self, id: i64) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|r| r.user.id == id)
            .map(|r| &mut r.user)
            .ok_or_else(|| AppError::not_found(format!("User not found with ID: {}", id)))
    }

    pub fn update_user(&mut self, id: i64, first_name: String, last_name: String) -> AppResult<User> {
        let user = self.user_mut(id)?;
        user.first_name = first_name;
        user.last_name = last_name;
        Ok(user.clone())
    }

    pub fn deactivate_user(&mut self, id: i64) -> AppResult<User> {
        let user = self.user_mut(id)?;
        user.active = false;
        Ok(user.clone())
    }

    pub fn active_agents(&self) -> Vec<User> {
        self.users
            .iter()
            .filter(|r| r.user.active && r.user.role == UserRole::Agent)
            .map(|r| r.user.clone())
            .collect()
    }

    // ========== Tickets ==========

    fn materialize(&self, rec: &TicketRecord) -> AppResult<Ticket> {
        Ok(Ticket {
            id: rec.id,
            title: rec.title.clone(),
            description: rec.description.clone(),
            status: rec.status,
            priority: rec.priority,
            customer: self.user(rec.customer_id)?,
            assigned_agent: rec.agent_id.map(|id| self.user(id)).transpose()?,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        })
    }

    fn select_tickets(&self, filter: impl Fn(&TicketRecord) -> bool) -> AppResult<Vec<Ticket>> {
        self.tickets
            .iter()
            .filter(|t| filter(t))
            .map(|t| self.materialize(t))
            .collect()
    }

    fn ticket_mut(&mut self, id: i64) -> AppResult<&mut TicketRecord> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(format!("Ticket not found with ID: {}", id)))
    }

    /// Open + in-progress tickets assigned to `agent_id`
    fn workload(&self, agent_id: i64) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.agent_id == Some(agent_id))
            .filter(|t| matches!(t.status, TicketStatus::Open | TicketStatus::InProgress))
            .count()
    }

    /// Create an OPEN ticket and assign it to the least busy active agent.
    pub fn create_ticket(&mut self, req: TicketCreate) -> AppResult<Ticket> {
        let customer = self.user(req.customer_id)?;
        if customer.role != UserRole::Customer {
            return Err(AppError::validation("Only customers can create tickets"));
        }
        if req.title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }

        let agent_id = self
            .active_agents()
            .iter()
            .min_by_key(|a| self.workload(a.id))
            .map(|a| a.id);

        self.next_ticket_id += 1;
        let rec = TicketRecord {
            id: self.next_ticket_id,
            title: req.title,
            description: req.description,
            status: TicketStatus::Open,
            priority: req.priority,
            customer_id: customer.id,
            agent_id,
            created_at: now_local(),
            updated_at: None,
        };
        let ticket = self.materialize(&rec)?;
        self.tickets.push(rec);
        tracing::info!(ticket_id = ticket.id, ?agent_id, "Ticket created");
        Ok(ticket)
    }

    pub fn ticket(&self, id: i64) -> AppResult<Ticket> {
        let rec = self
            .tickets
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(format!("Ticket not found with ID: {}", id)))?;
        self.materialize(rec)
    }

    pub fn all_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.select_tickets(|_| true)
    }

    pub fn tickets_by_customer(&self, customer_id: i64) -> AppResult<Vec<Ticket>> {
        self.select_tickets(|t| t.customer_id == customer_id)
    }

    pub fn tickets_by_agent(&self, agent_id: i64) -> AppResult<Vec<Ticket>> {
        self.select_tickets(|t| t.agent_id == Some(agent_id))
    }

    pub fn unassigned_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.select_tickets(|t| t.agent_id.is_none())
    }

    fn require_staff(&self, user_id: i64, action: &str) -> AppResult<()> {
        let user = self.user(user_id)?;
        if user.role.can_manage_tickets() {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("Only agents can update ticket {}", action)))
        }
    }

    pub fn update_status(&mut self, id: i64, status: TicketStatus, user_id: i64) -> AppResult<Ticket> {
        self.require_staff(user_id, "status")?;
        let rec = self.ticket_mut(id)?;
        rec.status = status;
        rec.updated_at = Some(now_local());
        self.ticket(id)
    }

    pub fn update_priority(
        &mut self,
        id: i64,
        priority: TicketPriority,
        user_id: i64,
    ) -> AppResult<Ticket> {
        self.require_staff(user_id, "priority")?;
        let rec = self.ticket_mut(id)?;
        rec.priority = priority;
        rec.updated_at = Some(now_local());
        self.ticket(id)
    }

    pub fn assign(&mut self, id: i64, agent_id: i64) -> AppResult<Ticket> {
        let agent = self.user(agent_id)?;
        if agent.role != UserRole::Agent {
            return Err(AppError::validation("User is not an agent"));
        }
        let rec = self.ticket_mut(id)?;
        rec.agent_id = Some(agent_id);
        rec.updated_at = Some(now_local());
        self.ticket(id)
    }

    pub fn unassign(&mut self, id: i64) -> AppResult<Ticket> {
        let rec = self.ticket_mut(id)?;
        rec.agent_id = None;
        rec.updated_at = Some(now_local());
        self.ticket(id)
    }

    // ========== Messages ==========

    fn materialize_message(&self, rec: &MessageRecord) -> AppResult<Message> {
        Ok(Message {
            id: rec.id,
            ticket_id: rec.ticket_id,
            sender: self.user(rec.sender_id)?,
            content: rec.content.clone(),
            message_type: rec.message_type,
            created_at: rec.created_at,
        })
    }

    /// Append a message. Notes require an agent sender.
    pub fn add_message(&mut self, req: MessageCreate, message_type: MessageType) -> AppResult<Message> {
        self.ticket(req.ticket_id)?;
        let sender = self.user(req.sender_id)?;
        if message_type == MessageType::Note && !sender.role.can_author_notes() {
            return Err(AppError::forbidden("Only agents can add internal notes"));
        }
        if req.content.trim().is_empty() {
            return Err(AppError::validation("Message content is required"));
        }

        self.next_message_id += 1;
        let rec = MessageRecord {
            id: self.next_message_id,
            ticket_id: req.ticket_id,
            sender_id: sender.id,
            content: req.content,
            message_type,
            created_at: now_local(),
        };
        let message = self.materialize_message(&rec)?;
        self.messages.push(rec);
        Ok(message)
    }

    /// Messages in insertion order, with notes removed for viewers who may not see them
    fn select_messages(
        &self,
        viewer: UserRole,
        filter: impl Fn(&MessageRecord) -> bool,
    ) -> AppResult<Vec<Message>> {
        self.messages
            .iter()
            .filter(|m| filter(m))
            .filter(|m| m.message_type != MessageType::Note || viewer.can_view_notes())
            .map(|m| self.materialize_message(m))
            .collect()
    }

    pub fn ticket_messages(&self, ticket_id: i64, viewer: UserRole) -> AppResult<Vec<Message>> {
        self.select_messages(viewer, |m| m.ticket_id == ticket_id)
    }

    pub fn user_messages(&self, user_id: i64, viewer: UserRole) -> AppResult<Vec<Message>> {
        self.select_messages(viewer, |m| m.sender_id == user_id)
    }

    pub fn message(&self, id: i64, viewer: UserRole) -> AppResult<Message> {
        self.select_messages(viewer, |m| m.id == id)?
            .pop()
            .ok_or_else(|| AppError::not_found(format!("Message not found with ID: {}", id)))
    }

    /// Delete a note. Replies and system messages are permanent.
    pub fn delete_message(&mut self, id: i64) -> AppResult<()> {
        let idx = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::not_found(format!("Message not found with ID: {}", id)))?;
        if self.messages[idx].message_type != MessageType::Note {
            return Err(AppError::validation("Only notes can be deleted"));
        }
        self.messages.remove(idx);
        Ok(())
    }
}
