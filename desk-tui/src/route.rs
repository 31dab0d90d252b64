//! URL-style routing and the authentication guard

use shared::models::{User, UserRole};
use std::fmt;

/// A screen of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    CustomerDashboard,
    AgentDashboard,
    Ticket(i64),
}

impl Route {
    /// Parse a path. `None` for `/` and anything unknown.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim().trim_end_matches('/');
        match path {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/customer-dashboard" => Some(Route::CustomerDashboard),
            "/agent-dashboard" => Some(Route::AgentDashboard),
            _ => path
                .strip_prefix("/ticket/")
                .and_then(|id| id.parse().ok())
                .map(Route::Ticket),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::CustomerDashboard => "/customer-dashboard".to_string(),
            Route::AgentDashboard => "/agent-dashboard".to_string(),
            Route::Ticket(id) => format!("/ticket/{}", id),
        }
    }

    /// Everything except the two auth screens needs a session.
    pub fn requires_auth(&self) -> bool {
        match self {
            Route::Login | Route::Register => false,
            Route::CustomerDashboard | Route::AgentDashboard | Route::Ticket(_) => true,
        }
    }

    /// Landing screen after login. Admins share the agent dashboard.
    pub fn home_for(role: UserRole) -> Route {
        match role {
            UserRole::Customer => Route::CustomerDashboard,
            UserRole::Agent | UserRole::Admin => Route::AgentDashboard,
        }
    }

    /// Apply the guard: protected routes without a user go to login.
    pub fn guard(self, user: Option<&User>) -> Route {
        if self.requires_auth() && user.is_none() {
            Route::Login
        } else {
            self
        }
    }

    /// Parse and guard in one step. Unknown paths and `/` land on login.
    pub fn resolve(path: &str, user: Option<&User>) -> Route {
        Route::parse(path).unwrap_or(Route::Login).guard(user)
    }

    /// Header title
    pub fn title(&self) -> String {
        match self {
            Route::Login => "Login".to_string(),
            Route::Register => "Register".to_string(),
            Route::CustomerDashboard => "My Support Tickets".to_string(),
            Route::AgentDashboard => "Agent Dashboard".to_string(),
            Route::Ticket(id) => format!("Ticket #{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
