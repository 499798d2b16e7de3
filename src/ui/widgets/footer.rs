// src/ui/widgets/footer.rs

use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{ApiHealth, App, Focus};
use crate::core::api::ScanApi;
use crate::ui::theme;

/// Renders the footer: key hints for the focused region and the health of the
/// scanning service.
pub fn render_footer<A: ScanApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let hints: &[(&str, &str)] = match app.focus {
        Focus::Host | Focus::Port => &[("Enter", " scan, "), ("Tab", " next, "), ("Esc", " leave form, "), ("Ctrl+C", " quit")],
        Focus::Recent => &[("↑↓", " move, "), ("Enter", " open, "), ("r", " reload, "), ("l", " logs, "), ("q", " quit")],
        Focus::Report => &[("↑↓", " scroll, "), ("c", " ciphers, "), ("s", " status, "), ("n", " new scan, "), ("q", " quit")],
    };

    let mut spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| [Span::styled(*key, theme::FOOTER_KEY), Span::raw(*action)])
        .collect();

    spans.push(Span::raw("  |  "));
    spans.push(match &app.api_health {
        ApiHealth::Unknown => Span::styled("API: checking...", theme::TEXT_DIM),
        ApiHealth::Healthy => Span::styled("API: healthy", theme::SAFE),
        ApiHealth::Unreachable(_) => Span::styled("API: unreachable", theme::CRITICAL),
    });

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
