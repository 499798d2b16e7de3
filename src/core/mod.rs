// src/core/mod.rs

// Domain logic of the dashboard. Nothing in here knows about the terminal;
// the `ui` module only reads the values produced here.

/// Wire types exchanged with the scanning service.
pub mod models;

/// HTTP client for the scanning service and the `ScanApi` seam.
pub mod api;

/// Messages sent from background requests back to the UI loop.
pub mod events;

/// Scan lifecycle: creation, polling, termination.
pub mod controller;

/// Bounded list of past scans.
pub mod recent;

/// Pure transformation of a scan record into report sections.
pub mod report;

#[cfg(test)]
pub mod testing;
