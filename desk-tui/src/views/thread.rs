//! Message thread with a reply/note composer

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use shared::models::{Message, UserRole, visible_messages};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use super::{Action, Request};

pub const EMPTY_TEXT: &str = "No messages yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeKind {
    #[default]
    Reply,
    Note,
}

impl ComposeKind {
    pub fn label(self) -> &'static str {
        match self {
            ComposeKind::Reply => "Reply",
            ComposeKind::Note => "Internal note",
        }
    }

    pub fn from_note(note: bool) -> Self {
        if note { ComposeKind::Note } else { ComposeKind::Reply }
    }

    /// Inline error text when the server gives no message
    pub fn failure_message(self) -> &'static str {
        match self {
            ComposeKind::Reply => "Failed to add reply",
            ComposeKind::Note => "Failed to add note",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageThread {
    viewer: UserRole,
    messages: Vec<Message>,
    pub composer: Input,
    pub kind: ComposeKind,
    busy: bool,
    pub error: Option<String>,
}

impl MessageThread {
    pub fn new(viewer: UserRole) -> Self {
        Self {
            viewer,
            messages: Vec::new(),
            composer: Input::default(),
            kind: ComposeKind::default(),
            busy: false,
            error: None,
        }
    }

    /// Messages the viewer may see, in server order
    pub fn visible(&self) -> Vec<&Message> {
        visible_messages(&self.messages, self.viewer)
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Switch between reply and note. Only note authors get the choice.
    pub fn toggle_kind(&mut self) {
        if !self.viewer.can_author_notes() {
            return;
        }
        self.kind = match self.kind {
            ComposeKind::Reply => ComposeKind::Note,
            ComposeKind::Note => ComposeKind::Reply,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent, ticket_id: i64, sender_id: i64) -> Option<Action> {
        match key.code {
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_kind();
                None
            }
            KeyCode::Enter => self.submit(ticket_id, sender_id),
            _ if self.busy || key.modifiers.contains(KeyModifiers::CONTROL) => None,
            _ => {
                self.composer.handle_event(&Event::Key(key));
                None
            }
        }
    }

    pub fn submit(&mut self, ticket_id: i64, sender_id: i64) -> Option<Action> {
        let content = self.composer.value().trim();
        if content.is_empty() || self.busy {
            return None;
        }
        let request = Request::PostMessage {
            ticket_id,
            sender_id,
            content: content.to_string(),
            note: self.kind == ComposeKind::Note,
        };
        self.busy = true;
        self.error = None;
        Some(request.into())
    }

    /// Post finished. Success clears the composer, failure keeps the text.
    pub fn complete(&mut self, result: Result<(), String>) {
        self.busy = false;
        match result {
            Ok(()) => {
                self.composer.reset();
                self.kind = ComposeKind::Reply;
            }
            Err(message) => self.error = Some(message),
        }
    }
}
