// src/core/events.rs

use crate::core::api::ApiError;
use crate::core::models::{CreatedScan, HealthReport, Scan, ScanSummary, StatusReport};

/// Which part of the dashboard asked for a results payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsOrigin {
    /// The scan lifecycle reached `completed`.
    Lifecycle,
    /// The user picked an entry in the recent-scans list.
    History,
}

/// Completion of a background request, delivered to the UI loop.
///
/// Background tasks never touch application state; they only send one of
/// these and the UI loop applies it.
#[derive(Debug)]
pub enum ScanEvent {
    Created(Result<CreatedScan, ApiError>),
    Status {
        scan_id: String,
        result: Result<StatusReport, ApiError>,
    },
    Results {
        scan_id: String,
        origin: ResultsOrigin,
        result: Result<Scan, ApiError>,
    },
    /// Answer to the `generation`-th list request.
    Recent {
        generation: u64,
        result: Result<Vec<ScanSummary>, ApiError>,
    },
    Health(Result<HealthReport, ApiError>),
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<ScanEvent>;
