// src/ui/widgets/results.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};

use crate::app::{App, Focus};
use crate::core::api::ScanApi;
use crate::core::models::Severity;
use crate::core::report::{CipherSummary, ProtocolFlag, Report, Section};
use crate::ui::theme;

/// Renders the report of the last completed or selected scan.
pub fn render_results<A: ScanApi>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title("Scan Results (↑ ↓ scroll, c ciphers, s status)");
    if app.focus == Focus::Report {
        block = block.border_style(theme::BORDER_ACTIVE);
    }

    let Some(report) = &app.report else {
        let placeholder = Paragraph::new("Scan results will appear here...")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let text = build_report_text(report, app.ciphers_expanded);
    let line_count = text.lines.len();
    app.scroll_offset = app.scroll_offset.min(line_count.saturating_sub(1));
    app.report_scroll_state = app
        .report_scroll_state
        .content_length(line_count)
        .position(app.scroll_offset);

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin { vertical: 1, horizontal: 0 }),
        &mut app.report_scroll_state,
    );
}

/// Turns report sections into styled lines. Cipher details are only listed
/// when `ciphers_expanded` is set.
pub fn build_report_text(report: &Report, ciphers_expanded: bool) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for section in &report.sections {
        match section {
            Section::Header { target, grade } => {
                lines.push(Line::from(vec![
                    Span::styled(target.clone(), theme::TEXT_BOLD),
                    Span::raw("  "),
                    Span::styled(format!("[{grade}]"), theme::grade(grade)),
                ]));
            }
            Section::Protocols(protocols) => {
                push_title(&mut lines, "🔐 Protocol Support");
                for p in protocols {
                    let (icon, status) = if p.supported { ("✅", "Supported") } else { ("❌", "Not Supported") };
                    let style = match p.flag {
                        ProtocolFlag::Insecure => theme::CRITICAL,
                        ProtocolFlag::Modern => theme::MODERN,
                        ProtocolFlag::Neutral => Style::default(),
                    };
                    let mut spans = vec![
                        Span::raw(format!("  {icon} ")),
                        Span::styled(p.name.clone(), style.add_modifier(Modifier::BOLD)),
                        Span::raw(format!(": {status}")),
                    ];
                    if p.flag == ProtocolFlag::Insecure {
                        spans.push(Span::styled(" ⚠ Insecure!", theme::CRITICAL));
                    }
                    lines.push(Line::from(spans));
                }
            }
            Section::Vulnerabilities { items, all_clear } => {
                push_title(&mut lines, "🛡 Vulnerability Assessment");
                for v in items {
                    if v.vulnerable {
                        let mut spans = vec![
                            Span::styled("  ⚠ ", theme::CRITICAL),
                            Span::styled(v.name.clone(), theme::CRITICAL.add_modifier(Modifier::BOLD)),
                            Span::styled(": VULNERABLE", theme::CRITICAL),
                        ];
                        if let Some(cve) = &v.cve {
                            spans.push(Span::styled(format!(" ({cve})"), theme::WARNING));
                        }
                        lines.push(Line::from(spans));
                        lines.push(Line::styled(format!("      {}", v.finding), theme::TEXT_DIM));
                    } else {
                        lines.push(Line::from(vec![
                            Span::styled("  ✅ ", theme::SAFE),
                            Span::styled(v.name.clone(), theme::TEXT_BOLD),
                            Span::raw(": Not vulnerable"),
                        ]));
                    }
                }
                if *all_clear {
                    lines.push(Line::styled("  ✅ No vulnerabilities detected!", theme::SAFE));
                }
            }
            Section::Certificate { expiration, severity } => {
                push_title(&mut lines, "📜 Certificate Information");
                let icon = match severity {
                    Severity::Critical if expiration.contains("expired") => "❌",
                    Severity::Critical | Severity::Warning => "⚠",
                    Severity::Safe => "✅",
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {icon} "), theme::severity(*severity)),
                    Span::styled("Certificate Expiration: ", theme::TEXT_BOLD),
                    Span::styled(expiration.clone(), theme::severity(*severity)),
                ]));
            }
            Section::Ciphers(summary) => {
                push_title(&mut lines, "🔑 Cipher Suites");
                push_cipher_lines(&mut lines, summary, ciphers_expanded);
            }
            Section::ServerConfig(rows) => {
                push_title(&mut lines, "⚙ Server Configuration");
                for (label, value) in rows {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {label}: "), theme::TEXT_BOLD),
                        Span::raw(value.clone()),
                    ]));
                }
            }
            Section::Headers(headers) => {
                push_title(&mut lines, "📋 Security Headers");
                for h in headers {
                    let (icon, style) = if h.ok { ("✅", theme::SAFE) } else { ("⚠", theme::WARNING) };
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {icon} "), style),
                        Span::styled(format!("{}: ", h.name), theme::TEXT_BOLD),
                        Span::raw(h.finding.clone()),
                    ]));
                }
            }
        }
    }

    Text::from(lines)
}

fn push_title(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(""));
    lines.push(Line::styled(title, theme::SECTION_TITLE));
}

fn push_cipher_lines(lines: &mut Vec<Line<'static>>, summary: &CipherSummary, expanded: bool) {
    let mut spans = vec![
        Span::styled("  Total Ciphers: ", theme::TEXT_BOLD),
        Span::raw(summary.total.to_string()),
    ];
    if summary.weak > 0 {
        spans.push(Span::styled(format!(" ({} weak ciphers detected)", summary.weak), theme::WARNING));
    }
    let hint = if expanded { "   ▲ press c to collapse" } else { "   ▼ press c to expand" };
    spans.push(Span::styled(hint, theme::MODERN));
    lines.push(Line::from(spans));

    if summary.weak > 0 {
        lines.push(Line::styled("  ⚠ Weak ciphers should be disabled", theme::CRITICAL));
    }

    if !expanded {
        return;
    }
    for group in &summary.groups {
        lines.push(Line::styled(format!("    {}", group.category), theme::TEXT_BOLD));
        for cipher in &group.ciphers {
            let (icon, style) = theme::strength(cipher.strength);
            lines.push(Line::from(vec![
                Span::styled(format!("      {icon} "), style),
                Span::styled(cipher.label.clone(), style),
            ]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Scan;
    use crate::core::report::build_report;

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn report() -> Report {
        let scan: Scan = serde_json::from_str(
            r#"{
                "id": "s1", "host": "example.com", "port": 443, "status": "completed", "grade": "B",
                "results": {
                    "protocols": {"TLS1": {"name": "TLS 1.0", "supported": true}},
                    "vulnerabilities": {"heartbleed": {"vulnerable": true, "cve": "CVE-2014-0160", "finding": "susceptible"}},
                    "certificate": {"cert_expirationStatus": "expires < 30 days"},
                    "ciphers": {"legacy": [{"name": "RC4-SHA", "strength": "weak"}, {"name": "AES128-SHA", "strength": "medium"}]}
                }
            }"#,
        )
        .unwrap();
        build_report(&scan)
    }

    #[test]
    fn collapsed_ciphers_hide_detail_lines() {
        let collapsed = plain(&build_report_text(&report(), false));
        let expanded = plain(&build_report_text(&report(), true));

        assert!(collapsed.iter().any(|l| l.contains("Total Ciphers: 2 (1 weak ciphers detected)")));
        assert!(collapsed.iter().any(|l| l.contains("Weak ciphers should be disabled")));
        assert!(!collapsed.iter().any(|l| l.contains("RC4-SHA")));
        assert!(expanded.iter().any(|l| l.contains("RC4-SHA")));
        assert!(expanded.iter().any(|l| l.contains("legacy")));
        assert_eq!(expanded.len(), collapsed.len() + 3);
    }

    #[test]
    fn findings_are_spelled_out() {
        let lines = plain(&build_report_text(&report(), false));
        assert_eq!(lines[0], "example.com:443  [B]");
        assert!(lines.iter().any(|l| l.contains("TLS 1.0: Supported ⚠ Insecure!")));
        assert!(lines.iter().any(|l| l.contains("heartbleed: VULNERABLE (CVE-2014-0160)")));
        assert!(lines.iter().any(|l| l.trim() == "susceptible"));
        assert!(lines.iter().any(|l| l.contains("⚠ Certificate Expiration: expires < 30 days")));
        assert!(!lines.iter().any(|l| l.contains("No vulnerabilities detected")));
    }
}
