// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Defines the areas of the application's user interface.
///
/// Each `Rect` is one widget area on the terminal screen, computed once per
/// frame.
pub struct AppLayout {
    pub input: Rect,
    pub main: Rect,
    pub recent: Rect,
    pub log_panel: Rect,
    pub footer: Rect,
}

/// Splits the frame into the scan form at the top, the content row in the
/// middle and the footer at the bottom. The content row holds the main panel
/// and the recent-scans list, plus the log panel when it is visible.
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_constraints = if show_logs {
        // Main (45%), Recent (25%), Logs (30%)
        vec![Constraint::Percentage(45), Constraint::Percentage(25), Constraint::Percentage(30)]
    } else {
        // Main (65%), Recent (35%)
        vec![Constraint::Percentage(65), Constraint::Percentage(35)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    AppLayout {
        input: main_chunks[0],
        main: content_chunks[0],
        recent: content_chunks[1],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
        footer: main_chunks[2],
    }
}

/// A rectangle of the given percentages, centered inside `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_panel_only_exists_when_visible() {
        let area = Rect::new(0, 0, 120, 40);
        let hidden = create_layout(area, false);
        assert_eq!(hidden.log_panel, Rect::default());
        assert_eq!(hidden.input.height, 3);
        assert_eq!(hidden.footer.height, 1);

        let shown = create_layout(area, true);
        assert!(shown.log_panel.width > 0);
        assert!(shown.main.width < hidden.main.width);
    }
}
