//! Customer dashboard: new-ticket form over the customer's own tickets

use crossterm::event::{KeyCode, KeyEvent};
use shared::models::{Ticket, TicketPriority};

use super::{Action, Field, FormKey, FormState, Request, TicketList, TicketQuery};

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;

pub const CREATE_FAILED: &str = "Failed to create ticket";

#[derive(Debug, Clone)]
pub struct CustomerDashboard {
    customer_id: i64,
    pub form: FormState,
    pub priority: TicketPriority,
    pub form_open: bool,
    pub list: TicketList,
}

impl CustomerDashboard {
    pub fn new(customer_id: i64) -> Self {
        Self {
            customer_id,
            form: FormState::new(vec![Field::new("Title"), Field::new("Description")])
                .with_choices(1),
            priority: TicketPriority::default(),
            form_open: false,
            list: TicketList::default(),
        }
    }

    pub fn query(&self) -> TicketQuery {
        TicketQuery::Customer(self.customer_id)
    }

    pub fn load(&mut self) -> Action {
        self.list.begin_load();
        Request::LoadTickets(self.query()).into()
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form.reset();
        self.priority = TicketPriority::default();
        self.form_open = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.form_open {
            return match self.form.handle_key(key) {
                FormKey::Submit => self.submit(),
                FormKey::Cancel => {
                    if !self.form.is_busy() {
                        self.close_form();
                    }
                    None
                }
                FormKey::Cycle { forward, .. } => {
                    if !self.form.is_busy() {
                        self.priority = if forward {
                            self.priority.next()
                        } else {
                            self.priority.prev()
                        };
                    }
                    None
                }
                FormKey::Handled | FormKey::Ignored => None,
            };
        }

        match key.code {
            KeyCode::Char('n') => {
                self.open_form();
                None
            }
            KeyCode::Char('r') => Some(self.load()),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => self.list.handle_key(key),
        }
    }

    pub fn submit(&mut self) -> Option<Action> {
        if self.form.value(TITLE).trim().is_empty() {
            self.form.fail("Title is required");
            return None;
        }
        if !self.form.begin() {
            return None;
        }
        Some(
            Request::CreateTicket {
                customer_id: self.customer_id,
                title: self.form.value(TITLE).trim().to_string(),
                description: self.form.value(DESCRIPTION).trim().to_string(),
                priority: self.priority,
            }
            .into(),
        )
    }

    /// Creation finished. Success closes the form and reloads the list.
    pub fn complete_create(&mut self, result: Result<Ticket, String>) -> Option<Action> {
        match result {
            Ok(ticket) => {
                tracing::info!(ticket_id = ticket.id, "Ticket created");
                self.close_form();
                Some(self.load())
            }
            Err(message) => {
                self.form.finish(Err(message));
                None
            }
        }
    }

    pub fn complete_load(&mut self, query: TicketQuery, result: Result<Vec<Ticket>, String>) {
        if query == self.query() {
            self.list.complete_load(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ticket_list::fixtures::ticket;
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_form_defaults_to_medium() {
        let mut view = CustomerDashboard::new(3);
        view.handle_key(key(KeyCode::Char('n')));
        assert!(view.form_open);
        view.form.set_value(TITLE, "Printer jam");
        view.form.set_value(DESCRIPTION, "paper stuck");

        let Some(Action::Request(Request::CreateTicket {
            customer_id,
            priority,
            ..
        })) = view.submit()
        else {
            panic!("expected create request");
        };
        assert_eq!(customer_id, 3);
        assert_eq!(priority, TicketPriority::Medium);
    }

    #[test]
    fn test_priority_selector_cycles() {
        let mut view = CustomerDashboard::new(3);
        view.open_form();
        view.form.focus_prev();
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.priority, TicketPriority::High);
        view.handle_key(key(KeyCode::Left));
        view.handle_key(key(KeyCode::Left));
        assert_eq!(view.priority, TicketPriority::Low);
    }

    #[test]
    fn test_created_ticket_closes_form_and_reloads() {
        let mut view = CustomerDashboard::new(3);
        view.open_form();
        view.form.set_value(TITLE, "Printer jam");
        assert!(view.submit().is_some());

        let next = view.complete_create(Ok(ticket(1, "Printer jam")));
        assert_eq!(
            next,
            Some(Action::Request(Request::LoadTickets(TicketQuery::Customer(3))))
        );
        assert!(!view.form_open);
        assert_eq!(view.form.value(TITLE), "");
        assert!(view.list.loading);
    }

    #[test]
    fn test_failed_create_keeps_form() {
        let mut view = CustomerDashboard::new(3);
        view.open_form();
        view.form.set_value(TITLE, "x");
        view.submit();
        assert!(view.complete_create(Err(CREATE_FAILED.into())).is_none());
        assert!(view.form_open);
        assert_eq!(view.form.error.as_deref(), Some(CREATE_FAILED));
        assert_eq!(view.form.value(TITLE), "x");
    }
}
