// src/ui/widgets/input.rs
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus};
use crate::core::api::ScanApi;
use crate::ui::theme;

/// Renders the scan form: a Host field and a narrower Port field.
pub fn render_input<A: ScanApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let title = if app.controller.is_starting() {
        "Starting scan..."
    } else if app.controller.is_busy() {
        "Scan in progress"
    } else {
        "Start Scan (Enter)"
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(area);

    let disabled = app.controller.is_busy();
    render_field(frame, &format!("Host - {title}"), &app.host_input, app.focus == Focus::Host, disabled, chunks[0]);
    render_field(frame, "Port", &app.port_input, app.focus == Focus::Port, disabled, chunks[1]);

    // The cursor only shows in an editable, focused field.
    if app.popup.is_none() && !disabled {
        let (value, field) = match app.focus {
            Focus::Host => (&app.host_input, chunks[0]),
            Focus::Port => (&app.port_input, chunks[1]),
            _ => return,
        };
        frame.set_cursor_position(Position::new(field.x + value.chars().count() as u16 + 1, field.y + 1));
    }
}

fn render_field(frame: &mut Frame, title: &str, value: &str, focused: bool, disabled: bool, area: Rect) {
    let mut block = Block::default().borders(Borders::ALL).title(title.to_string());
    if focused {
        block = block.border_style(theme::BORDER_ACTIVE);
    }
    let style = if disabled { theme::TEXT_DIM } else { theme::INPUT_ACTIVE };
    let paragraph = Paragraph::new(value.to_string()).block(block).style(style);
    frame.render_widget(paragraph, area);
}
