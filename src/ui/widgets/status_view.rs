// src/ui/widgets/status_view.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::app::{App, SPINNER_CHARS};
use crate::core::api::ScanApi;
use crate::ui::theme;

/// Renders the progress of the active scan, or the last status message.
pub fn render_status_view<A: ScanApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Scan Status");
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let mut spans = Vec::new();
    if app.controller.is_busy() {
        let spinner_char = SPINNER_CHARS[app.spinner_frame];
        spans.push(Span::styled(format!("{spinner_char} "), theme::MODERN));
    }
    spans.push(Span::raw(app.status_line.clone()));
    let status = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let gauge = Gauge::default()
        .gauge_style(theme::MODERN)
        .percent(u16::from(app.progress))
        .label(format!("{}%", app.progress));
    frame.render_widget(gauge, chunks[2]);

    if let Some(scan_id) = app.controller.active_scan_id() {
        let id = Paragraph::new(format!("ScanID: {scan_id}"))
            .style(theme::TEXT_DIM)
            .alignment(Alignment::Center);
        frame.render_widget(id, chunks[3]);
    }
}
