// src/core/controller.rs

//! Scan lifecycle: job creation, status polling and termination.
//!
//! The controller observes at most one scan at a time. All network work runs in
//! spawned tasks that report back through [`ScanEvent`]s; the `on_*` methods
//! apply those events and are the only place lifecycle state changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::core::api::{ApiError, ScanApi};
use crate::core::events::{EventSender, ResultsOrigin, ScanEvent};
use crate::core::models::{CreatedScan, NewScan, Scan, ScanStatus, StatusReport};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("Host must not be empty")]
    InvalidHost,
    #[error("Port must be a number between 1 and 65535 (got '{0}')")]
    InvalidPort(String),
    #[error("A scan is already being started or observed")]
    Busy,
}

/// What applying a status event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleUpdate {
    /// Not for the active scan, a regression, or arrived after termination.
    Ignored,
    /// The request failed; state is unchanged and polling continues.
    PollFailed,
    /// Non-terminal status; polling continues.
    Progress { status: ScanStatus, progress: u8 },
    /// Polling stopped and the results fetch is in flight.
    Completed { progress: u8 },
    /// Polling stopped and the lifecycle was reset.
    Failed,
}

/// The one scan currently being observed.
struct ScanSession {
    id: String,
    status: ScanStatus,
    progress: u8,
    poller: Option<JoinHandle<()>>,
}

impl ScanSession {
    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            debug!(scan_id = %self.id, "Stopping status poller.");
            poller.abort();
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

pub struct ScanController<A: ScanApi> {
    api: Arc<A>,
    events: EventSender,
    poll_interval: Duration,
    starting: bool,
    session: Option<ScanSession>,
}

impl<A: ScanApi> ScanController<A> {
    pub fn new(api: Arc<A>, events: EventSender, poll_interval: Duration) -> Self {
        Self {
            api,
            events,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            starting: false,
            session: None,
        }
    }

    /// Validates the target and issues the job-creation request.
    ///
    /// The answer arrives as [`ScanEvent::Created`] and must be passed to
    /// [`ScanController::on_created`].
    pub fn start_scan(&mut self, host: &str, port: &str) -> Result<(), StartError> {
        if self.is_busy() {
            return Err(StartError::Busy);
        }
        let request = validate_target(host, port)?;

        self.release_session();
        self.starting = true;
        info!(host = %request.host, port = request.port, "Starting scan.");

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.create_scan(&request).await;
            let _ = events.send(ScanEvent::Created(result));
        });
        Ok(())
    }

    /// Applies the job-creation answer. On success the scan becomes active and
    /// polling begins with an immediate first poll.
    pub fn on_created(&mut self, result: Result<CreatedScan, ApiError>) -> Result<String, ApiError> {
        self.starting = false;
        match result {
            Ok(created) => {
                info!(scan_id = %created.id, status = ?created.status, "Scan created.");
                self.observe(created.id.clone());
                Ok(created.id)
            }
            Err(e) => {
                error!(error = %e, "Failed to start scan.");
                Err(e)
            }
        }
    }

    /// Makes `scan_id` the active scan and starts its poller.
    fn observe(&mut self, scan_id: String) {
        // The previous timer is cleared before the new one exists.
        self.release_session();

        let poller = self.spawn_poller(scan_id.clone());
        self.session = Some(ScanSession {
            id: scan_id,
            status: ScanStatus::Queued,
            progress: 0,
            poller: Some(poller),
        });
    }

    fn spawn_poller(&self, scan_id: String) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let period = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                let result = api.scan_status(&scan_id).await;
                let event = ScanEvent::Status { scan_id: scan_id.clone(), result };
                if events.send(event).is_err() {
                    break;
                }
            }
        })
    }

    fn release_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop_polling();
        }
    }

    /// Applies one polled status.
    pub fn on_status(&mut self, scan_id: &str, result: Result<StatusReport, ApiError>) -> LifecycleUpdate {
        let Some(session) = self.session.as_mut().filter(|s| s.id == scan_id) else {
            debug!(scan_id, "Ignoring status for a scan that is no longer active.");
            return LifecycleUpdate::Ignored;
        };
        if session.status.is_terminal() {
            debug!(scan_id, "Ignoring status received after termination.");
            return LifecycleUpdate::Ignored;
        }

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(scan_id, error = %e, "Status poll failed; will retry on next tick.");
                return LifecycleUpdate::PollFailed;
            }
        };

        // An unrecognised status says nothing about lifecycle position, so it
        // is shown but never replaces the last known one.
        let known = report.status != ScanStatus::Unknown;
        if known && report.status.rank() < session.status.rank() {
            warn!(scan_id, from = %session.status, to = %report.status, "Ignoring status regression.");
            return LifecycleUpdate::Ignored;
        }

        let progress = report.progress_percent();
        if known {
            session.status = report.status;
        }
        session.progress = progress;

        match report.status {
            ScanStatus::Queued | ScanStatus::Running | ScanStatus::Unknown => {
                debug!(scan_id, status = %report.status, progress, "Scan in progress.");
                LifecycleUpdate::Progress { status: report.status, progress }
            }
            ScanStatus::Completed => {
                info!(scan_id, "Scan completed; fetching results.");
                session.stop_polling();
                self.fetch_results(scan_id.to_string());
                LifecycleUpdate::Completed { progress }
            }
            ScanStatus::Error => {
                warn!(scan_id, "Scan failed on the service.");
                self.release_session();
                LifecycleUpdate::Failed
            }
        }
    }

    fn fetch_results(&self, scan_id: String) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.scan_results(&scan_id).await;
            let _ = events.send(ScanEvent::Results { scan_id, origin: ResultsOrigin::Lifecycle, result });
        });
    }

    /// Applies the results fetched after completion and resets the lifecycle.
    ///
    /// Returns `None` when the payload belongs to a scan that is no longer the
    /// active one.
    pub fn on_results(&mut self, scan_id: &str, result: Result<Scan, ApiError>) -> Option<Result<Scan, ApiError>> {
        let awaiting = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == scan_id && s.status == ScanStatus::Completed);
        if !awaiting {
            debug!(scan_id, "Ignoring results for a scan that is no longer active.");
            return None;
        }

        self.release_session();
        if let Err(e) = &result {
            error!(scan_id, error = %e, "Failed to load scan results.");
        }
        Some(result)
    }

    /// True while a scan is being created or observed; the form is disabled.
    pub fn is_busy(&self) -> bool {
        self.starting || self.session.is_some()
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn active_scan_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.poller.is_some())
    }
}

/// Checks the form values and builds the creation request.
pub fn validate_target(host: &str, port: &str) -> Result<NewScan, StartError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(StartError::InvalidHost);
    }
    let port_text = port.trim();
    let port = port_text
        .parse::<u16>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| StartError::InvalidPort(port_text.to_string()))?;

    Ok(NewScan { host: host.to_string(), port })
}

/// Status line shown under the progress gauge.
pub fn status_text(status: ScanStatus, progress: u8) -> String {
    match status {
        ScanStatus::Queued => "Scan queued...".to_string(),
        ScanStatus::Running => format!("Scanning... {progress}%"),
        ScanStatus::Completed => "Scan completed!".to_string(),
        ScanStatus::Error => "Scan failed".to_string(),
        ScanStatus::Unknown => "Scan status unknown".to_string(),
    }
}
