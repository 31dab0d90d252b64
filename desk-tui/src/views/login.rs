use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Action, Field, FormKey, FormState, Request};
use crate::route::Route;

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

/// Email + password form
#[derive(Debug, Clone)]
pub struct LoginView {
    pub form: FormState,
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            form: FormState::new(vec![Field::new("Email"), Field::masked("Password")]),
        }
    }

    /// Login screen showing `message` (e.g. after the session expired)
    pub fn with_notice(message: impl Into<String>) -> Self {
        let mut view = Self::new();
        view.form.fail(message);
        view
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            return Some(Action::Navigate(Route::Register));
        }
        match self.form.handle_key(key) {
            FormKey::Submit => self.submit(),
            FormKey::Cancel | FormKey::Cycle { .. } | FormKey::Handled | FormKey::Ignored => None,
        }
    }

    pub fn submit(&mut self) -> Option<Action> {
        if !self.form.missing().is_empty() {
            self.form.fail("Email and password are required");
            return None;
        }
        if !self.form.begin() {
            return None;
        }
        Some(
            Request::Login {
                email: self.form.value(EMAIL).trim().to_string(),
                password: self.form.value(PASSWORD).to_string(),
            }
            .into(),
        )
    }

    /// Login finished. On success the controller navigates away.
    pub fn complete(&mut self, result: Result<(), String>) {
        self.form.finish(result);
    }
}
