use ratatui::{prelude::*, widgets::*};
use shared::models::{TicketPriority, TicketStatus};

use crate::views::TicketList;
use crate::views::ticket_list::EMPTY_TEXT;

pub fn status_color(status: TicketStatus) -> Color {
    match status {
        TicketStatus::Open => Color::Blue,
        TicketStatus::InProgress => Color::Yellow,
        TicketStatus::Resolved => Color::Green,
        TicketStatus::Closed => Color::DarkGray,
    }
}

pub fn priority_color(priority: TicketPriority) -> Color {
    match priority {
        TicketPriority::Low => Color::Green,
        TicketPriority::Medium => Color::Cyan,
        TicketPriority::High => Color::Yellow,
        TicketPriority::Urgent => Color::Red,
    }
}

pub fn status_badge(status: TicketStatus) -> Span<'static> {
    Span::styled(
        format!(" {} ", status.as_str()),
        Style::default().fg(Color::Black).bg(status_color(status)),
    )
}

pub fn priority_badge(priority: TicketPriority) -> Span<'static> {
    Span::styled(
        format!(" {} ", priority.as_str()),
        Style::default().fg(Color::Black).bg(priority_color(priority)),
    )
}

pub fn render_list(frame: &mut Frame, area: Rect, title: &str, list: &TicketList) {
    let mut block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    if let Some(error) = &list.error {
        block = block.title_bottom(Line::styled(format!(" {} ", error), Style::default().fg(Color::Red)));
    }

    if list.is_empty() {
        let text = if list.loading { "Loading tickets..." } else { EMPTY_TEXT };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = list
        .rows()
        .into_iter()
        .map(|row| {
            let mut meta = vec![
                status_badge(row.status),
                Span::raw(" "),
                priority_badge(row.priority),
                Span::raw(format!("  Created: {}", row.created)),
            ];
            if let Some(agent) = row.agent {
                meta.push(Span::raw(format!("  Agent: {}", agent)));
            }

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(row.title, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!(" {}", row.id_label), Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(Span::raw(row.description)),
                Line::from(meta),
                Line::from(""),
            ])
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(list.selected));
    frame.render_stateful_widget(widget, area, &mut state);
}
