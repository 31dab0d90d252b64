use ratatui::{prelude::*, widgets::*};

use crate::views::FormState;

/// Text fields, then `choices` as `< value >` selectors, then the error line.
pub fn render_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &FormState,
    choices: &[(&str, String)],
) {
    let outer = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = (0..form.fields.len() + choices.len())
        .map(|_| Constraint::Length(3))
        .collect();
    constraints.push(Constraint::Length(1)); // Error / status
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = form.focus == idx;
        let area = rows[idx];
        let width = area.width.max(3) - 3;
        let scroll = field.input.visual_scroll(width as usize);

        let input = Paragraph::new(field.display())
            .style(focus_style(focused))
            .scroll((0, scroll as u16))
            .block(Block::default().borders(Borders::ALL).title(field.label));
        frame.render_widget(input, area);

        if focused && !form.is_busy() {
            frame.set_cursor_position((
                area.x + ((field.input.visual_cursor().max(scroll) - scroll) as u16) + 1,
                area.y + 1,
            ));
        }
    }

    for (offset, (label, value)) in choices.iter().enumerate() {
        let slot = form.fields.len() + offset;
        let selector = Paragraph::new(format!("< {} >", value))
            .style(focus_style(form.focus == slot))
            .block(Block::default().borders(Borders::ALL).title(*label));
        frame.render_widget(selector, rows[slot]);
    }

    let status_row = rows[form.fields.len() + choices.len()];
    let status = if form.is_busy() {
        Paragraph::new("Submitting...").style(Style::default().fg(Color::DarkGray))
    } else if let Some(error) = &form.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(status, status_row);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}
