// src/ui/widgets/recent.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::{App, Focus};
use crate::core::api::ScanApi;
use crate::core::models::ScanSummary;
use crate::core::recent::{format_created_at, RecentState};
use crate::ui::theme;

/// Renders the recent-scans list, or its placeholder while there is nothing
/// to list.
pub fn render_recent<A: ScanApi>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title("Recent Scans (r reload)");
    if app.focus == Focus::Recent {
        block = block.border_style(theme::BORDER_ACTIVE);
    }

    let placeholder = match app.recent.state() {
        RecentState::Loading => Some(("Loading scans...", theme::TEXT_DIM)),
        RecentState::Empty => Some(("No scans yet", theme::TEXT_DIM)),
        RecentState::Failed(_) => Some(("Error loading scans", theme::CRITICAL)),
        RecentState::Loaded => None,
    };
    if let Some((text, style)) = placeholder {
        let paragraph = Paragraph::new(text).style(style).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app.recent.entries().iter().map(entry_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::LIST_HIGHLIGHT);

    frame.render_stateful_widget(list, area, &mut app.recent_list_state);
}

fn entry_item(entry: &ScanSummary) -> ListItem<'static> {
    let mut title = vec![Span::styled(format!("{}:{}", entry.host, entry.port), theme::TEXT_BOLD)];
    if let Some(grade) = &entry.grade {
        title.push(Span::raw(" "));
        title.push(Span::styled(format!("[{grade}]"), theme::grade(grade)));
    }
    title.push(Span::raw(" "));
    title.push(Span::styled(entry.status.to_string(), theme::status(entry.status)));

    ListItem::new(vec![
        Line::from(title),
        Line::styled(format!("  {}", format_created_at(entry.created_at)), theme::TEXT_DIM),
        Line::styled(format!("  ScanID: {}", entry.id), theme::TEXT_DIM),
    ])
}
