use ratatui::{prelude::*, widgets::*};
use shared::models::{Message, MessageType, Ticket};

use super::tickets::{priority_badge, status_badge};
use crate::views::thread::EMPTY_TEXT;
use crate::views::{ComposeKind, DetailFocus, MessageThread, TicketDetail};

pub fn render(frame: &mut Frame, area: Rect, view: &TicketDetail) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_panel(frame, columns[0], view);
    render_thread(frame, columns[1], &view.thread, view.focus == DetailFocus::Composer);
}

fn render_panel(frame: &mut Frame, area: Rect, view: &TicketDetail) {
    let mut block = Block::default()
        .title(" Ticket ")
        .borders(Borders::ALL)
        .border_style(panel_border(view.focus == DetailFocus::Panel));
    if let Some(error) = &view.error {
        block = block.title_bottom(Line::styled(format!(" {} ", error), Style::default().fg(Color::Red)));
    }

    let Some(ticket) = &view.ticket else {
        let text = if view.loading { "Loading ticket..." } else { "Ticket not found" };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let mut lines = ticket_lines(ticket);
    if view.updating {
        lines.push(Line::styled("Updating...", Style::default().fg(Color::DarkGray)));
    }
    let panel = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn ticket_lines(ticket: &Ticket) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!("{:<10}", text), Style::default().fg(Color::DarkGray));
    let agent = ticket
        .assigned_agent
        .as_ref()
        .map(|a| a.full_name())
        .unwrap_or_else(|| "Unassigned".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            ticket.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("Status"), status_badge(ticket.status)]),
        Line::from(vec![label("Priority"), priority_badge(ticket.priority)]),
        Line::from(vec![label("Customer"), Span::raw(ticket.customer.full_name())]),
        Line::from(vec![label("Agent"), Span::raw(agent)]),
        Line::from(vec![
            label("Created"),
            Span::raw(ticket.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
    ];
    if let Some(updated) = ticket.updated_at {
        lines.push(Line::from(vec![
            label("Updated"),
            Span::raw(updated.format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }
    lines.push(Line::from(""));
    lines.extend(ticket.description.lines().map(|l| Line::from(l.to_string())));
    lines
}

fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let kind_style = match message.message_type {
        MessageType::Note => Style::default().fg(Color::Magenta),
        MessageType::Reply => Style::default().fg(Color::Cyan),
        MessageType::StatusUpdate | MessageType::Assignment => Style::default().fg(Color::DarkGray),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(message.sender.full_name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(format!("[{}]", message.message_type.as_str()), kind_style),
        Span::styled(
            format!(" {}", message.created_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    lines.extend(message.content.lines().map(|l| Line::from(format!("  {}", l))));
    lines.push(Line::from(""));
    lines
}

fn render_thread(frame: &mut Frame, area: Rect, thread: &MessageThread, composing: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let messages = thread.visible();
    let block = Block::default()
        .title(format!(" Messages ({}) ", messages.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    if messages.is_empty() {
        let empty = Paragraph::new(EMPTY_TEXT)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, rows[0]);
    } else {
        let lines: Vec<Line> = messages.into_iter().flat_map(message_lines).collect();
        // Keep the newest messages in view
        let visible = rows[0].height.saturating_sub(2) as usize;
        let scroll = tail_scroll(lines.len(), visible);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, rows[0]);
    }

    let mut title = format!(" {} ", thread.kind.label());
    if thread.is_busy() {
        title.push_str("(sending) ");
    }
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(panel_border(composing));
    if let Some(error) = &thread.error {
        block = block.title_bottom(Line::styled(format!(" {} ", error), Style::default().fg(Color::Red)));
    }
    let input_style = match thread.kind {
        ComposeKind::Reply => Style::default(),
        ComposeKind::Note => Style::default().fg(Color::Magenta),
    };

    let input_area = rows[1];
    let width = input_area.width.max(3) - 3;
    let scroll = thread.composer.visual_scroll(width as usize);
    let input = Paragraph::new(thread.composer.value())
        .style(input_style)
        .scroll((0, scroll as u16))
        .block(block);
    frame.render_widget(input, input_area);

    if composing {
        frame.set_cursor_position((
            input_area.x + ((thread.composer.visual_cursor().max(scroll) - scroll) as u16) + 1,
            input_area.y + 1,
        ));
    }
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Scroll offset that shows the last `visible` of `total` lines.
fn tail_scroll(total: usize, visible: usize) -> u16 {
    u16::try_from(total.saturating_sub(visible)).unwrap_or(u16::MAX)
}
