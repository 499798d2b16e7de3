// src/app.rs

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::{ListState, ScrollbarState};
use tracing::{info, warn};

use crate::config::Config;
use crate::core::api::ScanApi;
use crate::core::controller::{status_text, LifecycleUpdate, ScanController};
use crate::core::events::{EventSender, ResultsOrigin, ScanEvent};
use crate::core::models::{Scan, ScanStatus};
use crate::core::recent::{RecentScans, Selection};
use crate::core::report::{build_report, Report};
use crate::logging;

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Lines of the log file kept for the log panel.
const LOG_TAIL: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Host,
    Port,
    Recent,
    Report,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Host => Focus::Port,
            Focus::Port => Focus::Recent,
            Focus::Recent => Focus::Report,
            Focus::Report => Focus::Host,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Host => Focus::Report,
            Focus::Port => Focus::Host,
            Focus::Recent => Focus::Port,
            Focus::Report => Focus::Recent,
        }
    }

    pub fn is_text_field(self) -> bool {
        matches!(self, Focus::Host | Focus::Port)
    }
}

/// What the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Status,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiHealth {
    Unknown,
    Healthy,
    Unreachable(String),
}

/// A modal message; every key except Enter/Esc is swallowed while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
}

pub struct App<A: ScanApi> {
    pub should_quit: bool,
    pub focus: Focus,
    pub view: View,
    pub host_input: String,
    pub port_input: String,
    pub controller: ScanController<A>,
    pub recent: RecentScans<A>,
    pub recent_list_state: ListState,
    pub status_line: String,
    pub progress: u8,
    pub report: Option<Report>,
    pub ciphers_expanded: bool,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub popup: Option<Popup>,
    pub api_health: ApiHealth,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    pub spinner_frame: usize,
}

impl<A: ScanApi> App<A> {
    pub fn new(api: Arc<A>, events: EventSender, config: &Config) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Host,
            view: View::Status,
            host_input: config.initial_host.clone(),
            port_input: config.initial_port.to_string(),
            controller: ScanController::new(Arc::clone(&api), events.clone(), config.poll_interval),
            recent: RecentScans::new(api, events),
            recent_list_state: ListState::default(),
            status_line: "Enter a host and press Enter to start a scan.".to_string(),
            progress: 0,
            report: None,
            ciphers_expanded: false,
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            popup: None,
            api_health: ApiHealth::Unknown,
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            spinner_frame: 0,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- Background Events ---

    pub fn handle_scan_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Created(result) => match self.controller.on_created(result) {
                Ok(_) => {
                    self.view = View::Status;
                    self.progress = 0;
                    self.status_line = status_text(ScanStatus::Queued, 0);
                }
                Err(e) => self.show_popup("Scan not started", format!("Error starting scan: {e}")),
            },
            ScanEvent::Status { scan_id, result } => match self.controller.on_status(&scan_id, result) {
                LifecycleUpdate::Progress { status, progress } => {
                    self.progress = progress;
                    self.status_line = status_text(status, progress);
                }
                LifecycleUpdate::Completed { progress } => {
                    self.progress = progress;
                    self.status_line = status_text(ScanStatus::Completed, progress);
                }
                LifecycleUpdate::Failed => {
                    self.status_line = status_text(ScanStatus::Error, self.progress);
                }
                LifecycleUpdate::Ignored | LifecycleUpdate::PollFailed => {}
            },
            ScanEvent::Results { scan_id, origin: ResultsOrigin::Lifecycle, result } => {
                match self.controller.on_results(&scan_id, result) {
                    Some(Ok(scan)) => {
                        self.show_report(&scan);
                        self.recent.load();
                    }
                    Some(Err(e)) => self.show_popup("Results unavailable", format!("Error loading scan results: {e}")),
                    None => {}
                }
            }
            ScanEvent::Results { scan_id, origin: ResultsOrigin::History, result } => {
                match self.recent.on_results(&scan_id, result) {
                    Some(Selection::Ready(scan)) => self.show_report(&scan),
                    Some(Selection::NotReady { scan_id, status }) => {
                        self.view = View::Status;
                        self.status_line = format!("Scan {scan_id} is {status}; results are not available yet.");
                    }
                    None => {}
                }
            }
            ScanEvent::Recent { generation, result } => {
                self.recent.on_loaded(generation, result);
                self.clamp_recent_selection();
            }
            ScanEvent::Health(result) => {
                self.api_health = match result {
                    Ok(report) if report.status == "healthy" => ApiHealth::Healthy,
                    Ok(report) => ApiHealth::Unreachable(report.status),
                    Err(e) => {
                        warn!(error = %e, "Scanning service health check failed.");
                        ApiHealth::Unreachable(e.to_string())
                    }
                };
            }
        }
    }

    fn show_report(&mut self, scan: &Scan) {
        info!(
            scan_id = %scan.id,
            grade = scan.grade.as_deref().unwrap_or("N/A"),
            completed_at = ?scan.completed_at,
            "Rendering scan report."
        );
        self.report = Some(build_report(scan));
        self.view = View::Results;
        self.ciphers_expanded = false;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
    }

    fn show_popup(&mut self, title: &str, message: String) {
        self.popup = Some(Popup { title: title.to_string(), message });
    }

    fn clamp_recent_selection(&mut self) {
        let len = self.recent.entries().len();
        let selected = match self.recent_list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.recent_list_state.select(selected);
    }

    // --- Keyboard ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.popup = None;
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return;
            }
            _ => {}
        }

        if self.focus.is_text_field() {
            self.handle_form_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('l') => self.show_logs = !self.show_logs,
            KeyCode::Left if self.show_logs => self.scroll_logs_left(),
            KeyCode::Right if self.show_logs => self.scroll_logs_right(),
            code if self.focus == Focus::Recent => self.handle_recent_key(code),
            code => self.handle_report_key(code),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_scan(),
            KeyCode::Esc => self.focus = Focus::Recent,
            KeyCode::Backspace => {
                self.focused_input().pop();
            }
            KeyCode::Char(c) if self.focus == Focus::Port && !c.is_ascii_digit() => {}
            KeyCode::Char(c) => self.focused_input().push(c),
            _ => {}
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Focus::Port => &mut self.port_input,
            _ => &mut self.host_input,
        }
    }

    /// Starts a scan from the form. Ignored while the form is disabled.
    pub fn submit_scan(&mut self) {
        if self.controller.is_busy() {
            return;
        }
        match self.controller.start_scan(&self.host_input, &self.port_input) {
            Ok(()) => {
                self.view = View::Status;
                self.progress = 0;
                self.status_line = "Starting scan...".to_string();
            }
            Err(e) => self.show_popup("Invalid target", e.to_string()),
        }
    }

    fn handle_recent_key(&mut self, code: KeyCode) {
        let len = self.recent.entries().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let i = self.recent_list_state.selected().unwrap_or(0);
                self.recent_list_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let i = self.recent_list_state.selected().map_or(0, |i| i + 1);
                self.recent_list_state.select(Some(i.min(len - 1)));
            }
            KeyCode::Enter => {
                if let Some(index) = self.recent_list_state.selected() {
                    self.recent.select(index);
                }
            }
            KeyCode::Char('r') => self.recent.load(),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.scroll_up(),
            KeyCode::Down => self.scroll_down(),
            KeyCode::Char('c') => self.toggle_cipher_details(),
            KeyCode::Char('s') => self.view = View::Status,
            KeyCode::Char('n') => self.focus = Focus::Host,
            _ => {}
        }
    }

    /// Flips the collapsed cipher list of the current report.
    pub fn toggle_cipher_details(&mut self) {
        if self.report.is_some() {
            self.ciphers_expanded = !self.ciphers_expanded;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    // --- Tick ---

    pub fn on_tick(&mut self) {
        if self.controller.is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    fn refresh_logs(&mut self) {
        if let Ok(content) = std::fs::read_to_string(logging::log_file_path()) {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(LOG_TAIL);
            self.log_content = lines[start..].iter().map(|l| l.to_string()).collect();
        }
    }
}
