// src/ui/mod.rs

use crate::app::{App, View};
use crate::core::api::ScanApi;
use ratatui::prelude::*;

mod layout;
pub mod theme;
mod widgets;

pub fn render<A: ScanApi>(app: &mut App<A>, frame: &mut Frame) {
    let area = frame.area();
    let layout = layout::create_layout(area, app.show_logs);

    widgets::input::render_input(frame, app, layout.input);

    match app.view {
        View::Results => widgets::results::render_results(frame, app, layout.main),
        View::Status => widgets::status_view::render_status_view(frame, app, layout.main),
    }

    widgets::recent::render_recent(frame, app, layout.recent);

    if app.show_logs {
        widgets::log_view::render_log_view(frame, app, layout.log_panel);
    }

    widgets::footer::render_footer(frame, app, layout.footer);

    if let Some(popup) = &app.popup {
        widgets::popup::render_popup(frame, popup, area);
    }
}
