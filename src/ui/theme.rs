// src/ui/theme.rs

//! Colours shared by the widgets.

use ratatui::style::{Color, Modifier, Style};

use crate::core::models::{ScanStatus, Severity, Strength};

pub const CRITICAL: Style = Style::new().fg(Color::Red);
pub const WARNING: Style = Style::new().fg(Color::Yellow);
pub const SAFE: Style = Style::new().fg(Color::Green);
pub const MODERN: Style = Style::new().fg(Color::Cyan);

pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);
pub const TEXT_BOLD: Style = Style::new().add_modifier(Modifier::BOLD);
pub const SECTION_TITLE: Style = Style::new().add_modifier(Modifier::BOLD).add_modifier(Modifier::UNDERLINED);
pub const INPUT_ACTIVE: Style = Style::new().fg(Color::Yellow);
pub const BORDER_ACTIVE: Style = Style::new().fg(Color::Cyan);
pub const LIST_HIGHLIGHT: Style = Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD);
pub const FOOTER_KEY: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

pub fn severity(severity: Severity) -> Style {
    match severity {
        Severity::Critical => CRITICAL,
        Severity::Warning => WARNING,
        Severity::Safe => SAFE,
    }
}

pub fn strength(strength: Strength) -> (&'static str, Style) {
    match strength {
        Strength::Weak => ("❌", CRITICAL),
        Strength::Medium => ("⚠", WARNING),
        Strength::Strong => ("✅", SAFE),
    }
}

/// Badge colour for a letter grade.
pub fn grade(grade: &str) -> Style {
    let style = match grade.chars().next() {
        _ if grade == "N/A" => TEXT_DIM,
        Some('A') => SAFE,
        Some('B') | Some('C') => WARNING,
        _ => CRITICAL,
    };
    style.add_modifier(Modifier::BOLD)
}

pub fn status(status: ScanStatus) -> Style {
    match status {
        ScanStatus::Completed => SAFE,
        ScanStatus::Error => CRITICAL,
        ScanStatus::Running => MODERN,
        ScanStatus::Queued | ScanStatus::Unknown => TEXT_DIM,
    }
}
