//! Ticket detail: update panel plus message thread
//!
//! Every successful mutation is applied to the local ticket from the
//! request's own input, then the whole detail is fetched again so server
//! state replaces the optimistic value.

use crossterm::event::{KeyCode, KeyEvent};
use shared::models::{Message, Ticket, User};

use super::{Action, MessageThread, Mutation, Request};
use crate::route::Route;

pub const LOAD_FAILED: &str = "Failed to load ticket details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Panel,
    Composer,
}

/// Everything one detail fetch returns
#[derive(Debug, Clone, PartialEq)]
pub struct DetailData {
    pub ticket: Ticket,
    pub messages: Vec<Message>,
    /// Assignment candidates; empty for viewers who cannot assign
    pub agents: Vec<User>,
}

#[derive(Debug, Clone)]
pub struct TicketDetail {
    pub ticket_id: i64,
    viewer: User,
    pub ticket: Option<Ticket>,
    pub agents: Vec<User>,
    pub thread: MessageThread,
    pub focus: DetailFocus,
    pub loading: bool,
    pub updating: bool,
    pub error: Option<String>,
}

impl TicketDetail {
    pub fn new(ticket_id: i64, viewer: User) -> Self {
        Self {
            ticket_id,
            thread: MessageThread::new(viewer.role),
            viewer,
            ticket: None,
            agents: Vec::new(),
            focus: DetailFocus::default(),
            loading: false,
            updating: false,
            error: None,
        }
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    pub fn can_manage(&self) -> bool {
        self.viewer.role.can_manage_tickets()
    }

    pub fn load(&mut self) -> Action {
        self.loading = true;
        Request::LoadDetail(self.ticket_id).into()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.focus == DetailFocus::Composer {
            return match key.code {
                KeyCode::Esc | KeyCode::Tab => {
                    self.focus = DetailFocus::Panel;
                    None
                }
                _ => self.thread.handle_key(key, self.ticket_id, self.viewer.id),
            };
        }

        match key.code {
            KeyCode::Esc => Some(Action::Navigate(Route::home_for(self.viewer.role))),
            KeyCode::Tab | KeyCode::Char('m') => {
                self.focus = DetailFocus::Composer;
                None
            }
            KeyCode::Char('r') => Some(self.load()),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char(c) if self.can_manage() => {
                let mutation = self.panel_mutation(c)?;
                self.mutate(mutation)
            }
            _ => None,
        }
    }

    fn panel_mutation(&self, key: char) -> Option<Mutation> {
        let ticket = self.ticket.as_ref()?;
        match key {
            's' => Some(Mutation::Status(ticket.status.next())),
            'p' => Some(Mutation::Priority(ticket.priority.next())),
            'a' => self.next_agent(ticket).map(|agent| Mutation::Assign(agent.id)),
            'u' if ticket.assigned_agent.is_some() => Some(Mutation::Unassign),
            _ => None,
        }
    }

    /// Agent after the current assignee in the candidate list (wraps)
    fn next_agent(&self, ticket: &Ticket) -> Option<&User> {
        let current = ticket
            .assigned_agent
            .as_ref()
            .and_then(|a| self.agents.iter().position(|u| u.id == a.id));
        match current {
            Some(idx) => self.agents.get((idx + 1) % self.agents.len()),
            None => self.agents.first(),
        }
    }

    pub fn mutate(&mut self, mutation: Mutation) -> Option<Action> {
        if self.updating {
            return None;
        }
        self.updating = true;
        self.error = None;
        Some(
            Request::Mutate {
                ticket_id: self.ticket_id,
                mutation,
            }
            .into(),
        )
    }

    pub fn complete_load(&mut self, result: Result<DetailData, String>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.thread.set_messages(data.messages);
                self.ticket = Some(data.ticket);
                if !data.agents.is_empty() {
                    self.agents = data.agents;
                }
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Mutation finished. Success applies the input locally and re-fetches.
    pub fn complete_mutation(&mut self, mutation: Mutation, result: Result<(), String>) -> Option<Action> {
        self.updating = false;
        if let Err(message) = result {
            self.error = Some(message);
            return None;
        }
        self.apply_optimistic(mutation);
        Some(self.load())
    }

    fn apply_optimistic(&mut self, mutation: Mutation) {
        let Some(ticket) = self.ticket.as_mut() else {
            return;
        };
        match mutation {
            Mutation::Status(status) => ticket.status = status,
            Mutation::Priority(priority) => ticket.priority = priority,
            Mutation::Assign(agent_id) => {
                ticket.assigned_agent = self.agents.iter().find(|a| a.id == agent_id).cloned();
            }
            Mutation::Unassign => ticket.assigned_agent = None,
        }
    }

    pub fn complete_post(&mut self, result: Result<(), String>) -> Option<Action> {
        let ok = result.is_ok();
        self.thread.complete(result);
        ok.then(|| self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::super::ticket_list::fixtures::{ticket, user};
    use super::*;
    use crossterm::event::KeyModifiers;
    use shared::models::{TicketStatus, UserRole};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(viewer: User) -> TicketDetail {
        let mut view = TicketDetail::new(7, viewer);
        view.load();
        view.complete_load(Ok(DetailData {
            ticket: ticket(7, "Printer jam"),
            messages: Vec::new(),
            agents: vec![user(2, "Alice", UserRole::Agent), user(5, "Sam", UserRole::Agent)],
        }));
        view
    }

    #[test]
    fn test_status_change_is_optimistic_then_reloads() {
        let mut view = loaded(user(2, "Alice", UserRole::Agent));
        let action = view.handle_key(key(KeyCode::Char('s')));
        assert_eq!(
            action,
            Some(Action::Request(Request::Mutate {
                ticket_id: 7,
                mutation: Mutation::Status(TicketStatus::InProgress),
            }))
        );
        assert!(view.handle_key(key(KeyCode::Char('s'))).is_none());

        let next = view.complete_mutation(Mutation::Status(TicketStatus::InProgress), Ok(()));
        assert_eq!(next, Some(Action::Request(Request::LoadDetail(7))));
        assert_eq!(view.ticket.as_ref().map(|t| t.status), Some(TicketStatus::InProgress));

        let mut server = ticket(7, "Printer jam");
        server.status = TicketStatus::Resolved;
        view.complete_load(Ok(DetailData {
            ticket: server,
            messages: Vec::new(),
            agents: Vec::new(),
        }));
        assert_eq!(view.ticket.as_ref().map(|t| t.status), Some(TicketStatus::Resolved));
        assert_eq!(view.agents.len(), 2);
    }

    #[test]
    fn test_failed_mutation_keeps_state() {
        let mut view = loaded(user(2, "Alice", UserRole::Agent));
        view.handle_key(key(KeyCode::Char('p')));
        let next = view.complete_mutation(
            Mutation::Priority(shared::models::TicketPriority::Urgent),
            Err("Failed to update ticket priority".into()),
        );
        assert!(next.is_none());
        assert_eq!(
            view.ticket.as_ref().map(|t| t.priority),
            Some(shared::models::TicketPriority::High)
        );
        assert!(view.error.is_some());
    }

    #[test]
    fn test_assign_cycles_to_next_agent() {
        let mut view = loaded(user(2, "Alice", UserRole::Agent));
        assert_eq!(
            view.handle_key(key(KeyCode::Char('a'))),
            Some(Action::Request(Request::Mutate {
                ticket_id: 7,
                mutation: Mutation::Assign(5),
            }))
        );
        view.complete_mutation(Mutation::Assign(5), Ok(()));
        assert_eq!(
            view.ticket.as_ref().and_then(|t| t.assigned_agent.as_ref()).map(|a| a.id),
            Some(5)
        );
    }

    #[test]
    fn test_customer_has_no_panel_controls() {
        let mut view = loaded(user(1, "Cara", UserRole::Customer));
        assert!(view.handle_key(key(KeyCode::Char('s'))).is_none());
        assert!(view.handle_key(key(KeyCode::Char('u'))).is_none());
        assert_eq!(
            view.handle_key(key(KeyCode::Esc)),
            Some(Action::Navigate(Route::CustomerDashboard))
        );
    }

    #[test]
    fn test_composer_focus() {
        let mut view = loaded(user(1, "Cara", UserRole::Customer));
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus, DetailFocus::Composer);
        view.handle_key(key(KeyCode::Char('q')));
        assert_eq!(view.thread.composer.value(), "q");
        view.handle_key(key(KeyCode::Esc));
        assert_eq!(view.focus, DetailFocus::Panel);
    }

    #[test]
    fn test_load_failure() {
        let mut view = TicketDetail::new(7, user(1, "Cara", UserRole::Customer));
        view.load();
        view.complete_load(Err(LOAD_FAILED.into()));
        assert!(!view.loading);
        assert!(view.ticket.is_none());
        assert_eq!(view.error.as_deref(), Some(LOAD_FAILED));
    }
}
