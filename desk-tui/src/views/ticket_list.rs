//! Ticket collection shown on both dashboards

use crossterm::event::{KeyCode, KeyEvent};
use shared::models::{Ticket, TicketPriority, TicketStatus};
use shared::util::truncate_chars;

use super::Action;
use crate::route::Route;

/// Description characters shown in a list row
pub const DESCRIPTION_PREVIEW: usize = 100;

pub const EMPTY_TEXT: &str = "No tickets found";
pub const LOAD_FAILED: &str = "Failed to load tickets";

/// First [`DESCRIPTION_PREVIEW`] characters, with `...` when cut
pub fn description_preview(description: &str) -> String {
    let cut = truncate_chars(description, DESCRIPTION_PREVIEW);
    if cut.len() < description.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

/// Display projection of one ticket
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRow {
    pub id: i64,
    pub title: String,
    pub id_label: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created: String,
    /// Assigned agent's first name
    pub agent: Option<String>,
}

impl TicketRow {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title.clone(),
            id_label: format!("#{}", ticket.id),
            description: description_preview(&ticket.description),
            status: ticket.status,
            priority: ticket.priority,
            created: ticket.created_at.format("%Y-%m-%d").to_string(),
            agent: ticket.assigned_agent.as_ref().map(|a| a.first_name.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TicketList {
    tickets: Vec<Ticket>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl TicketList {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the collection. A failure keeps the previous tickets.
    pub fn complete_load(&mut self, result: Result<Vec<Ticket>, String>) {
        self.loading = false;
        match result {
            Ok(tickets) => {
                self.tickets = tickets;
                self.selected = self.selected.min(self.tickets.len().saturating_sub(1));
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn rows(&self) -> Vec<TicketRow> {
        self.tickets.iter().map(TicketRow::from_ticket).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.tickets.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.tickets.is_empty() {
            self.selected = (self.selected + 1).min(self.tickets.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Arrow keys move the selection; Enter opens the ticket.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Enter => self
                .selected_ticket()
                .map(|t| Action::Navigate(Route::Ticket(t.id))),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::ticket;
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_description_preview() {
        assert_eq!(description_preview("short"), "short");
        let long = "é".repeat(150);
        let preview = description_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW + 3);
        assert_eq!(description_preview(&"x".repeat(100)), "x".repeat(100));
    }

    #[test]
    fn test_row_projection() {
        let row = TicketRow::from_ticket(&ticket(12, "Printer jam"));
        assert_eq!(row.id_label, "#12");
        assert_eq!(row.created, "2024-03-01");
        assert_eq!(row.agent.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_failed_reload_keeps_tickets() {
        let mut list = TicketList::default();
        list.complete_load(Ok(vec![ticket(1, "a"), ticket(2, "b")]));
        list.begin_load();
        list.complete_load(Err(LOAD_FAILED.into()));
        assert_eq!(list.tickets().len(), 2);
        assert_eq!(list.error.as_deref(), Some(LOAD_FAILED));
        assert!(!list.loading);
    }

    #[test]
    fn test_selection_and_open() {
        let mut list = TicketList::default();
        list.complete_load(Ok(vec![ticket(1, "a"), ticket(2, "b")]));
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        list.handle_key(down);
        list.handle_key(down);
        assert_eq!(list.selected, 1);
        assert_eq!(
            list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::Navigate(Route::Ticket(2)))
        );

        list.complete_load(Ok(vec![ticket(5, "c")]));
        assert_eq!(list.selected, 0);
    }
}
