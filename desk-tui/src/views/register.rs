use crossterm::event::KeyEvent;
use shared::models::UserRole;

use super::{Action, Field, FormKey, FormState, Request};
use crate::route::Route;

const EMAIL: usize = 0;
const PASSWORD: usize = 1;
const FIRST_NAME: usize = 2;
const LAST_NAME: usize = 3;

/// Account creation form; the role selector is the last slot.
#[derive(Debug, Clone)]
pub struct RegisterView {
    pub form: FormState,
    pub role: UserRole,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterView {
    pub fn new() -> Self {
        Self {
            form: FormState::new(vec![
                Field::new("Email"),
                Field::masked("Password"),
                Field::new("First name"),
                Field::new("Last name"),
            ])
            .with_choices(1),
            role: UserRole::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.form.handle_key(key) {
            FormKey::Submit => self.submit(),
            FormKey::Cancel => Some(Action::Navigate(Route::Login)),
            FormKey::Cycle { forward, .. } => {
                self.cycle_role(forward);
                None
            }
            FormKey::Handled | FormKey::Ignored => None,
        }
    }

    fn cycle_role(&mut self, forward: bool) {
        if self.form.is_busy() {
            return;
        }
        self.role = if forward {
            self.role.next()
        } else {
            // Three roles: two steps forward is one back
            self.role.next().next()
        };
    }

    pub fn submit(&mut self) -> Option<Action> {
        let missing = self.form.missing();
        if !missing.is_empty() {
            self.form.fail(format!("{} required", missing.join(", ")));
            return None;
        }
        if !self.form.begin() {
            return None;
        }
        Some(
            Request::Register {
                email: self.form.value(EMAIL).trim().to_string(),
                password: self.form.value(PASSWORD).to_string(),
                first_name: self.form.value(FIRST_NAME).trim().to_string(),
                last_name: self.form.value(LAST_NAME).trim().to_string(),
                role: self.role,
            }
            .into(),
        )
    }

    pub fn complete(&mut self, result: Result<(), String>) {
        self.form.finish(result);
    }
}
