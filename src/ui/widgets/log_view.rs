// src/ui/widgets/log_view.rs

use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

use crate::app::App;
use crate::core::api::ScanApi;
use crate::ui::theme;

/// Renders the tail of the session log.
///
/// Long lines are not wrapped; a horizontal scrollbar at the bottom of the
/// panel tracks how far they are scrolled.
pub fn render_log_view<A: ScanApi>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    let block = Block::default()
        .title("Logs (scroll with ← →)")
        .borders(Borders::ALL);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app.log_content.iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    app.log_horizontal_scroll = app.log_horizontal_scroll.min(max_width);
    app.log_horizontal_scroll_state = app
        .log_horizontal_scroll_state
        .content_length(max_width)
        .position(app.log_horizontal_scroll);

    // Only the bottom of the file fits; show the newest lines.
    let visible = inner_area.height.saturating_sub(1) as usize;
    let start = app.log_content.len().saturating_sub(visible);
    let log_lines: Vec<Line> = app.log_content[start..].iter().map(|line| style_log_line(line)).collect();

    let log_paragraph = Paragraph::new(log_lines)
        .scroll((0, app.log_horizontal_scroll as u16));
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
        .thumb_symbol("■");
    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    frame.render_stateful_widget(
        scrollbar,
        scrollbar_area,
        &mut app.log_horizontal_scroll_state,
    );
}

/// "DATE TIME LEVEL MESSAGE": the timestamp is dimmed, anything else is
/// shown as-is.
fn style_log_line(line: &str) -> Line<'_> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), Some(rest)) => Line::from(vec![
            Span::styled(format!("{date} {time}"), theme::TEXT_DIM),
            Span::raw(format!(" {rest}")),
        ]),
        _ => Line::from(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_split_from_message() {
        let line = style_log_line("2026-01-02 10:11:12  INFO Scan created. scan_id=abc");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "2026-01-02 10:11:12");
        assert_eq!(line.spans[1].content, "  INFO Scan created. scan_id=abc");

        let bare = style_log_line("panicked");
        assert_eq!(bare.spans.len(), 1);
    }
}
