// src/core/models.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;
use tracing::warn;

// --- Ordered Maps ---

/// A JSON object that keeps its keys in the order they arrived on the wire.
///
/// The scanning service emits its result sections as objects whose key order
/// is meaningful for display (server defaults, cipher categories), so they are
/// not collected into a `HashMap`. A repeated key keeps its first position and
/// takes the last value.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V: DeserializeOwned> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `serde_json::Map` is insertion-ordered with the `preserve_order`
        // feature and already folds repeated keys.
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        object
            .into_iter()
            .map(|(key, value)| {
                let value = serde_json::from_value(value).map_err(de::Error::custom)?;
                Ok((key, value))
            })
            .collect::<Result<Vec<_>, D::Error>>()
            .map(OrderedMap)
    }
}

/// Deserializes an optional results section, discarding it when its shape is
/// not what the renderer understands.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(section) => Ok(Some(section)),
            Err(e) => {
                warn!(error = %e, "Discarding malformed results section.");
                Ok(None)
            }
        },
    }
}

// --- Timestamps ---

/// Parses an ISO-8601 timestamp. Values without an offset are naive UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse_timestamp(s);
        if parsed.is_none() {
            warn!(raw = s, "Unparsable timestamp from scanning service.");
        }
        parsed
    }))
}

// --- Scan Lifecycle ---

/// Lifecycle state of a scan as reported by the scanning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Queued,
    Running,
    Completed,
    Error,
    /// Anything the service sends that this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ScanStatus {
    /// `completed` and `error` are final; nothing follows them.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Error)
    }

    /// Position in the lifecycle. Status never moves to a lower rank.
    pub fn rank(self) -> u8 {
        match self {
            ScanStatus::Unknown | ScanStatus::Queued => 0,
            ScanStatus::Running => 1,
            ScanStatus::Completed | ScanStatus::Error => 2,
        }
    }
}

/// Body of `POST /scans`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewScan {
    pub host: String,
    pub port: u16,
}

/// Answer to `POST /scans`. Only the id matters to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedScan {
    pub id: String,
    #[serde(default)]
    pub status: Option<ScanStatus>,
}

/// Answer to `GET /scans/{id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub status: ScanStatus,
    #[serde(default)]
    pub progress: Option<i64>,
}

impl StatusReport {
    /// Progress clamped to `0..=100`; missing progress counts as zero.
    pub fn progress_percent(&self) -> u8 {
        self.progress.unwrap_or(0).clamp(0, 100) as u8
    }
}

/// One entry of `GET /scans?limit=N`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSummary {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub status: ScanStatus,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Answer to `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

// --- Scan Results ---

/// The full scan record returned by `GET /scans/{id}/results`.
///
/// For a scan that has not completed the service only sends `status` and a
/// `message`, so everything else is optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct Scan {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    pub status: ScanStatus,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub results: Option<ScanResults>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResults {
    #[serde(default, deserialize_with = "lenient_section")]
    pub protocols: Option<OrderedMap<ProtocolSupport>>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub vulnerabilities: Option<OrderedMap<Vulnerability>>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub certificate: Option<OrderedMap<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub ciphers: Option<OrderedMap<Vec<Cipher>>>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub server_defaults: Option<OrderedMap<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub headers: Option<OrderedMap<HeaderFinding>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtocolSupport {
    pub name: String,
    #[serde(default)]
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Vulnerability {
    #[serde(default)]
    pub vulnerable: bool,
    #[serde(default)]
    pub cve: Option<String>,
    #[serde(default)]
    pub finding: String,
}

/// Qualitative strength of a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    #[default]
    #[serde(other)]
    Strong,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cipher {
    pub name: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub strength: Strength,
}

impl Cipher {
    /// The detailed descriptor when the service sent one, else the name.
    pub fn display_name(&self) -> &str {
        match self.details.as_deref() {
            Some(details) if !details.is_empty() => details,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderFinding {
    #[serde(default)]
    pub finding: String,
    #[serde(default)]
    pub severity: String,
}

// --- Classification ---

/// How a rendered finding should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Safe,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn ordered_map_keeps_wire_order() {
        let map: OrderedMap<String> =
            serde_json::from_str(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha").map(String::as_str), Some("2"));
    }

    #[test]
    fn ordered_map_repeated_key_keeps_first_position() {
        let map: OrderedMap<u8> = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let entries: Vec<(&str, u8)> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(entries, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn status_report_progress_is_clamped() {
        let over: StatusReport = serde_json::from_str(r#"{"status": "running", "progress": 250}"#).unwrap();
        let under: StatusReport = serde_json::from_str(r#"{"status": "running", "progress": -4}"#).unwrap();
        let missing: StatusReport = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(over.progress_percent(), 100);
        assert_eq!(under.progress_percent(), 0);
        assert_eq!(missing.progress_percent(), 0);
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let report: StatusReport = serde_json::from_str(r#"{"status": "paused"}"#).unwrap();
        assert_eq!(report.status, ScanStatus::Unknown);
        assert!(!report.status.is_terminal());
        assert!(ScanStatus::Completed.is_terminal());
        assert!(ScanStatus::Error.is_terminal());
        assert!(ScanStatus::Running.rank() > ScanStatus::Queued.rank());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = parse_timestamp("2024-03-05T14:07:09.123456").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 7, 9));

        let offset = parse_timestamp("2024-03-05T16:07:09+02:00").unwrap();
        assert_eq!(offset.hour(), 14);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn incomplete_scan_results_payload_parses() {
        let scan: Scan =
            serde_json::from_str(r#"{"status": "running", "message": "Scan not completed yet"}"#).unwrap();
        assert_eq!(scan.status, ScanStatus::Running);
        assert!(scan.results.is_none());
        assert_eq!(scan.message.as_deref(), Some("Scan not completed yet"));
    }

    #[test]
    fn malformed_section_is_dropped_not_fatal() {
        let scan: Scan = serde_json::from_str(
            r#"{
                "id": "s1", "host": "example.com", "port": 443, "status": "completed",
                "results": {
                    "protocols": "not an object",
                    "headers": {"HSTS": {"finding": "max-age=31536000", "severity": "OK"}},
                    "summary": {"grade": "A"}
                }
            }"#,
        )
        .unwrap();
        let results = scan.results.unwrap();
        assert!(results.protocols.is_none());
        assert_eq!(results.headers.unwrap().len(), 1);
    }

    #[test]
    fn cipher_strength_defaults_to_strong() {
        let ciphers: Vec<Cipher> = serde_json::from_str(
            r#"[
                {"name": "RC4-MD5", "strength": "weak"},
                {"name": "AES128-SHA", "details": "", "strength": "medium"},
                {"name": "TLS_AES_256_GCM_SHA384"},
                {"name": "X", "strength": "legendary", "details": "x 1337"}
            ]"#,
        )
        .unwrap();
        assert_eq!(ciphers[0].strength, Strength::Weak);
        assert_eq!(ciphers[1].display_name(), "AES128-SHA");
        assert_eq!(ciphers[2].strength, Strength::Strong);
        assert_eq!(ciphers[3].strength, Strength::Strong);
        assert_eq!(ciphers[3].display_name(), "x 1337");
    }

    #[test]
    fn summary_tolerates_missing_created_at() {
        let list: Vec<ScanSummary> = serde_json::from_str(
            r#"[
                {"id": "a", "host": "a.example", "port": 443, "status": "completed", "grade": "A+", "created_at": "2024-01-01T00:00:00"},
                {"id": "b", "host": "b.example", "port": 8443, "status": "queued"}
            ]"#,
        )
        .unwrap();
        assert!(list[0].created_at.is_some());
        assert!(list[1].created_at.is_none());
        assert_eq!(list[1].grade, None);
    }
}
