// src/core/recent.rs

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::{debug, error, info};

use crate::core::api::{ApiError, ScanApi};
use crate::core::events::{EventSender, ResultsOrigin, ScanEvent};
use crate::core::models::{Scan, ScanStatus, ScanSummary};

/// How many scans the history shows.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentState {
    Loading,
    Empty,
    Loaded,
    Failed(String),
}

/// Outcome of opening a historical scan.
#[derive(Debug)]
pub enum Selection {
    /// Completed; ready for the renderer.
    Ready(Scan),
    /// Not completed yet, so there is nothing to render.
    NotReady { scan_id: String, status: ScanStatus },
}

/// Bounded history of past scans, newest first.
pub struct RecentScans<A: ScanApi> {
    api: Arc<A>,
    events: EventSender,
    state: RecentState,
    entries: Vec<ScanSummary>,
    pending: Option<String>,
    /// Bumped by every `load`; only the newest answer is applied.
    generation: u64,
}

impl<A: ScanApi> RecentScans<A> {
    pub fn new(api: Arc<A>, events: EventSender) -> Self {
        Self {
            api,
            events,
            state: RecentState::Loading,
            entries: Vec::new(),
            pending: None,
            generation: 0,
        }
    }

    /// Requests the list again. Current entries stay visible until the answer
    /// arrives.
    pub fn load(&mut self) {
        debug!(limit = RECENT_LIMIT, "Loading recent scans.");
        if self.entries.is_empty() {
            self.state = RecentState::Loading;
        }
        self.generation += 1;
        let generation = self.generation;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.recent_scans(RECENT_LIMIT).await;
            let _ = events.send(ScanEvent::Recent { generation, result });
        });
    }

    /// Applies a list answer unless a newer `load` has been issued since.
    pub fn on_loaded(&mut self, generation: u64, result: Result<Vec<ScanSummary>, ApiError>) {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "Ignoring outdated recent-scans answer.");
            return;
        }
        match result {
            Ok(mut scans) => {
                scans.truncate(RECENT_LIMIT);
                info!(count = scans.len(), "Recent scans loaded.");
                self.state = if scans.is_empty() { RecentState::Empty } else { RecentState::Loaded };
                self.entries = scans;
            }
            Err(e) => {
                error!(error = %e, "Error loading recent scans.");
                self.entries.clear();
                self.state = RecentState::Failed(e.to_string());
            }
        }
    }

    /// Fetches the full record of the entry at `index`. Lifecycle polling is
    /// never involved.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let scan_id = self.entries.get(index)?.id.clone();
        info!(scan_id = %scan_id, "Opening historical scan.");

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let request_id = scan_id.clone();
        tokio::spawn(async move {
            let result = api.scan_results(&request_id).await;
            let _ = events.send(ScanEvent::Results { scan_id: request_id, origin: ResultsOrigin::History, result });
        });

        self.pending = Some(scan_id);
        self.pending.as_deref()
    }

    /// Applies a fetched historical record. Only the most recent selection
    /// counts; failures are logged and produce nothing.
    pub fn on_results(&mut self, scan_id: &str, result: Result<Scan, ApiError>) -> Option<Selection> {
        if self.pending.as_deref() != Some(scan_id) {
            debug!(scan_id, "Ignoring results for a superseded selection.");
            return None;
        }
        self.pending = None;

        match result {
            Ok(scan) if scan.status == ScanStatus::Completed => Some(Selection::Ready(scan)),
            Ok(scan) => {
                info!(scan_id, status = %scan.status, message = scan.message.as_deref().unwrap_or(""), "Historical scan has no results yet.");
                Some(Selection::NotReady { scan_id: scan_id.to_string(), status: scan.status })
            }
            Err(e) => {
                error!(scan_id, error = %e, "Error viewing scan.");
                None
            }
        }
    }

    pub fn state(&self) -> &RecentState {
        &self.state
    }

    pub fn entries(&self) -> &[ScanSummary] {
        &self.entries
    }
}

/// Creation time in the viewer's local time, marked as coming from UTC.
pub fn format_created_at(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => format!("{} (UTC source)", ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")),
        None => "unknown date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{summary, FakeApi};
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::timeout;

    async fn next_event(rx: &mut UnboundedReceiver<ScanEvent>) -> ScanEvent {
        timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap()
    }

    async fn loaded(api: FakeApi) -> (RecentScans<FakeApi>, UnboundedReceiver<ScanEvent>, Arc<FakeApi>) {
        let api = Arc::new(api);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut recent = RecentScans::new(Arc::clone(&api), tx);
        recent.load();
        match next_event(&mut rx).await {
            ScanEvent::Recent { generation, result } => recent.on_loaded(generation, result),
            other => panic!("unexpected event {other:?}"),
        }
        (recent, rx, api)
    }

    #[tokio::test]
    async fn never_shows_more_than_ten() {
        let many = (0..15).map(|i| summary(&format!("s{i}"), ScanStatus::Completed, Some("A"))).collect();
        let (recent, _rx, api) = loaded(FakeApi::new(Vec::new()).with_recent(many)).await;
        assert_eq!(api.recent_limits(), vec![RECENT_LIMIT]);
        assert_eq!(recent.entries().len(), RECENT_LIMIT);
        assert_eq!(recent.entries()[0].id, "s0");
        assert_eq!(recent.state(), &RecentState::Loaded);
    }

    #[tokio::test]
    async fn empty_and_failed_lists_have_placeholders() {
        let (recent, _rx, _) = loaded(FakeApi::new(Vec::new())).await;
        assert_eq!(recent.state(), &RecentState::Empty);

        let (recent, _rx, _) = loaded(FakeApi::failing_recent()).await;
        assert!(matches!(recent.state(), RecentState::Failed(_)));
        assert!(recent.entries().is_empty());
    }

    #[tokio::test]
    async fn completed_selection_is_ready_without_polling() {
        let api = FakeApi::new(Vec::new())
            .with_recent(vec![summary("old", ScanStatus::Completed, Some("B"))]);
        let (mut recent, mut rx, api) = loaded(api).await;

        assert_eq!(recent.select(0), Some("old"));
        let ScanEvent::Results { scan_id, origin, result } = next_event(&mut rx).await else {
            panic!("expected results");
        };
        assert_eq!(origin, ResultsOrigin::History);
        assert!(matches!(recent.on_results(&scan_id, result), Some(Selection::Ready(_))));
        assert_eq!(api.status_calls(), 0);
    }

    #[tokio::test]
    async fn running_selection_is_not_ready() {
        let api = FakeApi::new(Vec::new())
            .with_recent(vec![summary("busy", ScanStatus::Running, None)])
            .with_results("busy", r#"{"status": "running", "message": "Scan not completed yet"}"#);
        let (mut recent, mut rx, _) = loaded(api).await;

        recent.select(0);
        let ScanEvent::Results { scan_id, result, .. } = next_event(&mut rx).await else {
            panic!("expected results");
        };
        match recent.on_results(&scan_id, result) {
            Some(Selection::NotReady { scan_id, status }) => {
                assert_eq!(scan_id, "busy");
                assert_eq!(status, ScanStatus::Running);
            }
            other => panic!("unexpected selection {other:?}"),
        }
    }

    #[tokio::test]
    async fn superseded_selection_is_ignored() {
        let api = FakeApi::new(Vec::new()).with_recent(vec![
            summary("first", ScanStatus::Completed, None),
            summary("second", ScanStatus::Completed, None),
        ]);
        let (mut recent, mut rx, _) = loaded(api).await;

        recent.select(0);
        recent.select(1);
        let mut ready = Vec::new();
        for _ in 0..2 {
            if let ScanEvent::Results { scan_id, result, .. } = next_event(&mut rx).await {
                if let Some(Selection::Ready(scan)) = recent.on_results(&scan_id, result) {
                    ready.push(scan.id);
                }
            }
        }
        assert_eq!(ready, vec!["second".to_string()]);
        assert!(recent.select(7).is_none());
    }

    #[tokio::test]
    async fn outdated_list_does_not_replace_newer_one() {
        let (mut recent, mut rx, _) = loaded(FakeApi::new(Vec::new())).await;

        recent.load();
        recent.load();
        let mut answers = Vec::new();
        for _ in 0..2 {
            if let ScanEvent::Recent { generation, .. } = next_event(&mut rx).await {
                answers.push(generation);
            }
        }
        answers.sort_unstable();
        let (older, newer) = (answers[0], answers[1]);

        let newest = vec![summary("new", ScanStatus::Completed, Some("A"))];
        let stale = vec![summary("old", ScanStatus::Completed, Some("C"))];
        recent.on_loaded(newer, Ok(newest));
        recent.on_loaded(older, Ok(stale));
        assert_eq!(recent.entries().len(), 1);
        assert_eq!(recent.entries()[0].id, "new");

        recent.on_loaded(older, Err(ApiError::Status { status: 503, message: "down".into() }));
        assert_eq!(recent.state(), &RecentState::Loaded);
    }

    #[test]
    fn created_at_is_marked_as_utc_sourced() {
        let ts = crate::core::models::parse_timestamp("2024-01-01T12:00:00").unwrap();
        assert!(format_created_at(Some(ts)).ends_with("(UTC source)"));
        assert_eq!(format_created_at(None), "unknown date");
    }
}
