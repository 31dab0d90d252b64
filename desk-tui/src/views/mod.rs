//! View models
//!
//! Each screen owns its state and turns key presses into [`Action`]s. The
//! application controller runs the requests and feeds the results back
//! through the views' `complete_*` methods, which keeps the views free of
//! I/O and testable on their own.

pub mod agent;
pub mod customer;
pub mod detail;
pub mod form;
pub mod login;
pub mod register;
pub mod thread;
pub mod ticket_list;

pub use agent::{AgentDashboard, AgentTab};
pub use customer::CustomerDashboard;
pub use detail::{DetailData, DetailFocus, TicketDetail};
pub use form::{Field, FormKey, FormState};
pub use login::LoginView;
pub use register::RegisterView;
pub use thread::{ComposeKind, MessageThread};
pub use ticket_list::{TicketList, TicketRow};

use crossterm::event::KeyEvent;
use shared::models::{TicketPriority, TicketStatus, User, UserRole};

use crate::route::Route;

/// Role-scoped ticket collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketQuery {
    Customer(i64),
    Agent(i64),
    Unassigned,
    All,
}

/// A change to a ticket made from the detail panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Status(TicketStatus),
    Priority(TicketPriority),
    Assign(i64),
    Unassign,
}

impl Mutation {
    /// Inline error text when the server gives no message
    pub fn failure_message(&self) -> &'static str {
        match self {
            Mutation::Status(_) => "Failed to update ticket status",
            Mutation::Priority(_) => "Failed to update ticket priority",
            Mutation::Assign(_) => "Failed to assign ticket",
            Mutation::Unassign => "Failed to unassign ticket",
        }
    }
}

/// Work that needs the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        role: UserRole,
    },
    LoadTickets(TicketQuery),
    CreateTicket {
        customer_id: i64,
        title: String,
        description: String,
        priority: TicketPriority,
    },
    LoadDetail(i64),
    Mutate {
        ticket_id: i64,
        mutation: Mutation,
    },
    PostMessage {
        ticket_id: i64,
        sender_id: i64,
        content: String,
        note: bool,
    },
}

/// What a view asks the controller to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(Route),
    Logout,
    Quit,
    Request(Request),
}

impl From<Request> for Action {
    fn from(request: Request) -> Self {
        Action::Request(request)
    }
}

/// The screen for the current route
#[derive(Debug)]
pub enum View {
    Login(LoginView),
    Register(RegisterView),
    Customer(CustomerDashboard),
    Agent(AgentDashboard),
    Detail(TicketDetail),
}

impl View {
    /// Build the view for an already-guarded route plus its initial load.
    pub fn for_route(route: Route, user: Option<&User>) -> (View, Option<Action>) {
        match (route, user) {
            (Route::Register, _) => (View::Register(RegisterView::new()), None),
            (Route::CustomerDashboard, Some(user)) => {
                let mut view = CustomerDashboard::new(user.id);
                let load = view.load();
                (View::Customer(view), Some(load))
            }
            (Route::AgentDashboard, Some(user)) => {
                let mut view = AgentDashboard::new(user.id);
                let load = view.load();
                (View::Agent(view), Some(load))
            }
            (Route::Ticket(id), Some(user)) => {
                let mut view = TicketDetail::new(id, user.clone());
                let load = view.load();
                (View::Detail(view), Some(load))
            }
            (Route::Login, _)
            | (Route::CustomerDashboard | Route::AgentDashboard | Route::Ticket(_), None) => {
                (View::Login(LoginView::new()), None)
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self {
            View::Login(v) => v.handle_key(key),
            View::Register(v) => v.handle_key(key),
            View::Customer(v) => v.handle_key(key),
            View::Agent(v) => v.handle_key(key),
            View::Detail(v) => v.handle_key(key),
        }
    }

    /// True while the focused widget consumes plain characters
    pub fn is_typing(&self) -> bool {
        match self {
            View::Login(_) | View::Register(_) => true,
            View::Customer(v) => v.form_open,
            View::Agent(_) => false,
            View::Detail(v) => v.focus == DetailFocus::Composer,
        }
    }
}
