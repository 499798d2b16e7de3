// src/core/testing.rs

//! Scripted in-memory scanning service for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::api::{ApiError, ScanApi};
use crate::core::models::{CreatedScan, HealthReport, NewScan, Scan, ScanStatus, ScanSummary, StatusReport};

#[derive(Debug, Clone)]
pub enum FakeStatus {
    Report(ScanStatus, Option<i64>),
    Unreachable,
}

pub struct FakeApi {
    statuses: Mutex<Vec<FakeStatus>>,
    reject_creation: bool,
    fail_recent: bool,
    recent: Mutex<Vec<ScanSummary>>,
    stored: Mutex<HashMap<String, String>>,
    status_polls: Mutex<Vec<String>>,
    results_requests: Mutex<Vec<String>>,
    recent_limits: Mutex<Vec<usize>>,
}

impl FakeApi {
    /// Statuses are served in order; the last one repeats forever.
    pub fn new(statuses: Vec<FakeStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses),
            reject_creation: false,
            fail_recent: false,
            recent: Mutex::new(Vec::new()),
            stored: Mutex::new(HashMap::new()),
            status_polls: Mutex::new(Vec::new()),
            results_requests: Mutex::new(Vec::new()),
            recent_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_creation() -> Self {
        Self { reject_creation: true, ..Self::new(Vec::new()) }
    }

    pub fn failing_recent() -> Self {
        Self { fail_recent: true, ..Self::new(Vec::new()) }
    }

    pub fn with_recent(self, recent: Vec<ScanSummary>) -> Self {
        *self.recent.lock().unwrap() = recent;
        self
    }

    /// Serves `body` as the results payload of `scan_id`.
    pub fn with_results(self, scan_id: &str, body: &str) -> Self {
        self.stored.lock().unwrap().insert(scan_id.to_string(), body.to_string());
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_polls.lock().unwrap().len()
    }

    pub fn polls_for(&self, scan_id: &str) -> usize {
        self.status_polls.lock().unwrap().iter().filter(|id| *id == scan_id).count()
    }

    pub fn results_calls(&self) -> usize {
        self.results_requests.lock().unwrap().len()
    }

    pub fn recent_limits(&self) -> Vec<usize> {
        self.recent_limits.lock().unwrap().clone()
    }
}

pub fn summary(id: &str, status: ScanStatus, grade: Option<&str>) -> ScanSummary {
    ScanSummary {
        id: id.to_string(),
        host: format!("{id}.example"),
        port: 443,
        status,
        grade: grade.map(str::to_string),
        created_at: None,
    }
}

fn unavailable() -> ApiError {
    ApiError::Status { status: 503, message: "Service Unavailable".into() }
}

impl ScanApi for FakeApi {
    async fn create_scan(&self, request: &NewScan) -> Result<CreatedScan, ApiError> {
        if self.reject_creation {
            return Err(ApiError::Status { status: 422, message: "Invalid host".into() });
        }
        Ok(CreatedScan { id: format!("scan-{}", request.host), status: Some(ScanStatus::Queued) })
    }

    async fn scan_status(&self, scan_id: &str) -> Result<StatusReport, ApiError> {
        self.status_polls.lock().unwrap().push(scan_id.to_string());
        let next = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 { Some(statuses.remove(0)) } else { statuses.first().cloned() }
        };
        match next {
            Some(FakeStatus::Report(status, progress)) => Ok(StatusReport { status, progress }),
            Some(FakeStatus::Unreachable) | None => Err(unavailable()),
        }
    }

    async fn scan_results(&self, scan_id: &str) -> Result<Scan, ApiError> {
        self.results_requests.lock().unwrap().push(scan_id.to_string());
        let body = self.stored.lock().unwrap().get(scan_id).cloned();
        match body {
            Some(body) => Ok(serde_json::from_str(&body)?),
            None => Ok(serde_json::from_value(serde_json::json!({
                "id": scan_id,
                "host": "example.com",
                "port": 443,
                "status": "completed",
                "grade": "A",
                "results": {}
            }))?),
        }
    }

    async fn recent_scans(&self, limit: usize) -> Result<Vec<ScanSummary>, ApiError> {
        self.recent_limits.lock().unwrap().push(limit);
        if self.fail_recent {
            return Err(unavailable());
        }
        Ok(self.recent.lock().unwrap().clone())
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        Ok(HealthReport { status: "healthy".into() })
    }
}
