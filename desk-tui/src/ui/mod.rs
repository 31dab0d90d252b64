//! Rendering
//!
//! Pure functions of the view state. Nothing here mutates the app.

pub mod detail;
pub mod forms;
pub mod tickets;

use ratatui::{prelude::*, widgets::*};
use shared::models::UserRole;

use crate::app::App;
use crate::views::{AgentTab, View};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    match app.view() {
        View::Login(view) => forms::render_form(frame, chunks[1], " Login ", &view.form, &[]),
        View::Register(view) => forms::render_form(
            frame,
            chunks[1],
            " Create Account ",
            &view.form,
            &[("Role", view.role.as_str().to_string())],
        ),
        View::Customer(view) => {
            if view.form_open {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(14), Constraint::Min(3)])
                    .split(chunks[1]);
                forms::render_form(
                    frame,
                    parts[0],
                    " New Ticket ",
                    &view.form,
                    &[("Priority", view.priority.label().to_string())],
                );
                tickets::render_list(frame, parts[1], " My Tickets ", &view.list);
            } else {
                tickets::render_list(frame, chunks[1], " My Tickets ", &view.list);
            }
        }
        View::Agent(view) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(chunks[1]);
            let titles: Vec<&str> = AgentTab::ALL.iter().map(|t| t.label()).collect();
            let tabs = Tabs::new(titles)
                .select(view.tab.index())
                .block(Block::default().borders(Borders::ALL))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_widget(tabs, parts[0]);
            tickets::render_list(frame, parts[1], " Tickets ", &view.list);
        }
        View::Detail(view) => detail::render(frame, chunks[1], view),
    }

    let help = Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(" Support Desk ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("| "),
        Span::styled(app.route().title(), Style::default().fg(Color::Yellow)),
    ];
    if app.pending() > 0 {
        spans.push(Span::styled("  Loading...", Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    if let Some(user) = app.session().user() {
        let who = Paragraph::new(format!("{} ({}) ", user.full_name(), user.role))
            .alignment(Alignment::Right);
        frame.render_widget(who, area.inner(Margin::new(1, 1)));
    }
}

fn help_text(app: &App) -> String {
    let global = if app.session().is_authenticated() {
        "Ctrl+L logout  Ctrl+C quit"
    } else {
        "Ctrl+C quit"
    };
    let local = match app.view() {
        View::Login(_) => "Tab next field  Enter sign in  Ctrl+R register",
        View::Register(_) => "Tab next field  ←/→ role  Enter create  Esc back",
        View::Customer(v) if v.form_open => "Tab next field  ←/→ priority  Enter submit  Esc cancel",
        View::Customer(_) => "↑/↓ select  Enter open  n new ticket  r refresh",
        View::Agent(_) => "←/→ or 1-3 tab  ↑/↓ select  Enter open  r refresh",
        View::Detail(v) if app.view().is_typing() => {
            if v.viewer().role.can_author_notes() {
                "Enter send  Ctrl+N reply/note  Esc panel"
            } else {
                "Enter send  Esc panel"
            }
        }
        View::Detail(v) => match v.viewer().role {
            UserRole::Customer => "Tab compose  r reload  Esc back",
            UserRole::Agent | UserRole::Admin => {
                "s status  p priority  a assign  u unassign  Tab compose  r reload  Esc back"
            }
        },
    };
    format!(" {}  |  {}", local, global)
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}
