//! Form state shared by the login, register and ticket forms
//!
//! A form is a list of text fields followed by zero or more choice slots
//! (role, priority) that are cycled rather than typed. `busy` is set while a
//! submission is in flight and blocks another one.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub input: Input,
    pub masked: bool,
}

impl Field {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: Input::default(),
            masked: false,
        }
    }

    /// Password-style field rendered as `*`
    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_string()
        }
    }
}

/// Where a key press in a form should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Submit,
    Cancel,
    /// Left/Right/Space on a choice slot
    Cycle { slot: usize, forward: bool },
    Handled,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub fields: Vec<Field>,
    pub focus: usize,
    choices: usize,
    busy: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn with_choices(mut self, choices: usize) -> Self {
        self.choices = choices;
        self
    }

    fn slots(&self) -> usize {
        (self.fields.len() + self.choices).max(1)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.slots();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.slots() - 1) % self.slots();
    }

    /// Index of the focused choice slot, if focus is past the text fields
    pub fn focused_choice(&self) -> Option<usize> {
        self.focus.checked_sub(self.fields.len())
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(Field::value).unwrap_or_default()
    }

    pub fn set_value(&mut self, idx: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.input = Input::new(value.to_string());
        }
    }

    /// Route a key press. Text goes to the focused field unless busy.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormKey {
        match key.code {
            KeyCode::Enter => FormKey::Submit,
            KeyCode::Esc => FormKey::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormKey::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormKey::Handled
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focused_choice().is_some() => {
                let slot = self.focused_choice().unwrap_or_default();
                FormKey::Cycle {
                    slot,
                    forward: key.code != KeyCode::Left,
                }
            }
            _ if self.busy || key.modifiers.contains(KeyModifiers::CONTROL) => FormKey::Ignored,
            _ => match self.fields.get_mut(self.focus) {
                Some(field) => {
                    field.input.handle_event(&Event::Key(key));
                    FormKey::Handled
                }
                None => FormKey::Ignored,
            },
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a submission in flight. `false` if one already is.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.error = None;
        true
    }

    /// Submission finished; an error is kept for display.
    pub fn finish(&mut self, result: Result<(), String>) {
        self.busy = false;
        self.error = result.err();
    }

    /// Client-side validation failure
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Required text fields that are blank
    pub fn missing(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.value().trim().is_empty())
            .map(|f| f.label)
            .collect()
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.reset();
        }
        self.focus = 0;
        self.busy = false;
        self.error = None;
    }
}
