//! Agent dashboard: one ticket list behind three filter tabs

use crossterm::event::{KeyCode, KeyEvent};
use shared::models::Ticket;

use super::{Action, Request, TicketList, TicketQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentTab {
    #[default]
    Assigned,
    Unassigned,
    All,
}

impl AgentTab {
    pub const ALL: [AgentTab; 3] = [AgentTab::Assigned, AgentTab::Unassigned, AgentTab::All];

    pub fn label(self) -> &'static str {
        match self {
            AgentTab::Assigned => "Assigned to Me",
            AgentTab::Unassigned => "Unassigned",
            AgentTab::All => "All Tickets",
        }
    }

    pub fn index(self) -> usize {
        match self {
            AgentTab::Assigned => 0,
            AgentTab::Unassigned => 1,
            AgentTab::All => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct AgentDashboard {
    agent_id: i64,
    pub tab: AgentTab,
    pub list: TicketList,
}

impl AgentDashboard {
    /// Starts on "Assigned to Me"; the tab is not remembered between runs.
    pub fn new(agent_id: i64) -> Self {
        Self {
            agent_id,
            tab: AgentTab::default(),
            list: TicketList::default(),
        }
    }

    pub fn query(&self) -> TicketQuery {
        match self.tab {
            AgentTab::Assigned => TicketQuery::Agent(self.agent_id),
            AgentTab::Unassigned => TicketQuery::Unassigned,
            AgentTab::All => TicketQuery::All,
        }
    }

    pub fn load(&mut self) -> Action {
        self.list.begin_load();
        Request::LoadTickets(self.query()).into()
    }

    pub fn select_tab(&mut self, tab: AgentTab) -> Option<Action> {
        if tab == self.tab {
            return None;
        }
        self.tab = tab;
        self.list.selected = 0;
        Some(self.load())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Right | KeyCode::Tab => self.select_tab(self.tab.next()),
            KeyCode::Left | KeyCode::BackTab => self.select_tab(self.tab.prev()),
            KeyCode::Char('1') => self.select_tab(AgentTab::Assigned),
            KeyCode::Char('2') => self.select_tab(AgentTab::Unassigned),
            KeyCode::Char('3') => self.select_tab(AgentTab::All),
            KeyCode::Char('r') => Some(self.load()),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => self.list.handle_key(key),
        }
    }

    /// Results for a tab that is no longer selected are dropped.
    pub fn complete_load(&mut self, query: TicketQuery, result: Result<Vec<Ticket>, String>) {
        if query == self.query() {
            self.list.complete_load(result);
        } else {
            tracing::debug!(?query, "Dropping tickets for inactive tab");
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
    fn test_tabs_map_to_queries() {
        let mut view = AgentDashboard::new(8);
        assert_eq!(view.query(), TicketQuery::Agent(8));
        assert_eq!(
            view.handle_key(key(KeyCode::Right)),
            Some(Action::Request(Request::LoadTickets(TicketQuery::Unassigned)))
        );
        assert_eq!(
            view.handle_key(key(KeyCode::Char('3'))),
            Some(Action::Request(Request::LoadTickets(TicketQuery::All)))
        );
        assert!(view.handle_key(key(KeyCode::Char('3'))).is_none());
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.tab, AgentTab::Assigned);
    }

    #[test]
    fn test_stale_tab_results_ignored() {
        let mut view = AgentDashboard::new(8);
        view.load();
        view.select_tab(AgentTab::All);
        view.complete_load(TicketQuery::Agent(8), Ok(vec![ticket(1, "old")]));
        assert!(view.list.is_empty());
        assert!(view.list.loading);

        view.complete_load(TicketQuery::All, Ok(vec![ticket(2, "new")]));
        assert_eq!(view.list.tickets()[0].id, 2);
    }
}
