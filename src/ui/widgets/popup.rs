// src/ui/widgets/popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::Popup;
use crate::ui::layout::centered_rect;
use crate::ui::theme;

/// Renders a modal message on top of the existing UI.
///
/// `Clear` wipes the popup area first so the widgets underneath do not bleed
/// through.
pub fn render_popup(frame: &mut Frame, popup: &Popup, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(popup.message.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", theme::TEXT_BOLD),
            Span::styled("Enter", theme::FOOTER_KEY),
            Span::styled(" to dismiss", theme::TEXT_BOLD),
        ]),
    ]);

    let block = Block::default()
        .title(popup.title.clone())
        .borders(Borders::ALL)
        .border_style(theme::CRITICAL);

    let popup_area = centered_rect(60, 30, area);

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
