// src/core/report.rs

//! Turns a completed scan record into ordered, classified report sections.
//!
//! `build_report` is pure: the same scan always yields the same report. A
//! section whose source data is absent or empty is left out entirely.

use crate::core::models::{
    Cipher, HeaderFinding, OrderedMap, ProtocolSupport, Scan, ScanResults, Severity, Strength, Vulnerability,
};

/// Protocols in display order, oldest first.
pub const PROTOCOL_ORDER: [&str; 6] = ["SSLv2", "SSLv3", "TLS1", "TLS1_1", "TLS1_2", "TLS1_3"];

const LEGACY_PROTOCOLS: [&str; 4] = ["SSLv2", "SSLv3", "TLS1", "TLS1_1"];

/// Certificate fields that may carry the expiration text, by priority.
const EXPIRATION_FIELDS: [&str; 3] = ["cert_expirationStatus", "cert_validity", "cert_validityPeriod"];

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Header { target: String, grade: String },
    Protocols(Vec<ProtocolLine>),
    Vulnerabilities { items: Vec<VulnerabilityLine>, all_clear: bool },
    Certificate { expiration: String, severity: Severity },
    Ciphers(CipherSummary),
    ServerConfig(Vec<(String, String)>),
    Headers(Vec<HeaderLine>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFlag {
    /// A legacy protocol the server still accepts.
    Insecure,
    /// TLS 1.3 accepted.
    Modern,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLine {
    pub id: &'static str,
    pub name: String,
    pub supported: bool,
    pub flag: ProtocolFlag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VulnerabilityLine {
    pub name: String,
    pub vulnerable: bool,
    pub cve: Option<String>,
    pub finding: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CipherSummary {
    pub total: usize,
    pub weak: usize,
    pub groups: Vec<CipherGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CipherGroup {
    pub category: String,
    pub ciphers: Vec<CipherLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CipherLine {
    pub label: String,
    pub strength: Strength,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLine {
    pub name: String,
    pub finding: String,
    pub ok: bool,
}

pub fn build_report(scan: &Scan) -> Report {
    let grade = scan
        .grade
        .as_deref()
        .filter(|g| !g.is_empty())
        .unwrap_or("N/A")
        .to_string();

    let mut sections = vec![Section::Header { target: format!("{}:{}", scan.host, scan.port), grade }];

    if let Some(results) = &scan.results {
        sections.extend(result_sections(results));
    }

    Report { sections }
}

fn result_sections(results: &ScanResults) -> Vec<Section> {
    [
        results.protocols.as_ref().and_then(protocols_section),
        results.vulnerabilities.as_ref().and_then(vulnerabilities_section),
        results.certificate.as_ref().and_then(certificate_section),
        results.ciphers.as_ref().and_then(ciphers_section),
        results.server_defaults.as_ref().and_then(server_config_section),
        results.headers.as_ref().and_then(headers_section),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn protocols_section(protocols: &OrderedMap<ProtocolSupport>) -> Option<Section> {
    let lines: Vec<ProtocolLine> = PROTOCOL_ORDER
        .iter()
        .filter_map(|&id| {
            let protocol = protocols.get(id)?;
            Some(ProtocolLine {
                id,
                name: protocol.name.clone(),
                supported: protocol.supported,
                flag: protocol_flag(id, protocol.supported),
            })
        })
        .collect();

    (!lines.is_empty()).then_some(Section::Protocols(lines))
}

pub fn protocol_flag(id: &str, supported: bool) -> ProtocolFlag {
    match (supported, id) {
        (true, id) if LEGACY_PROTOCOLS.contains(&id) => ProtocolFlag::Insecure,
        (true, "TLS1_3") => ProtocolFlag::Modern,
        _ => ProtocolFlag::Neutral,
    }
}

fn vulnerabilities_section(vulns: &OrderedMap<Vulnerability>) -> Option<Section> {
    if vulns.is_empty() {
        return None;
    }
    let items: Vec<VulnerabilityLine> = vulns
        .iter()
        .map(|(name, v)| VulnerabilityLine {
            name: name.to_string(),
            vulnerable: v.vulnerable,
            cve: v.cve.clone().filter(|c| !c.is_empty()),
            finding: v.finding.clone(),
        })
        .collect();
    let all_clear = items.iter().all(|v| !v.vulnerable);
    Some(Section::Vulnerabilities { items, all_clear })
}

fn certificate_section(certificate: &OrderedMap<serde_json::Value>) -> Option<Section> {
    let expiration = EXPIRATION_FIELDS
        .iter()
        .filter_map(|field| certificate.get(field)?.as_str())
        .find(|text| !text.is_empty())?;

    Some(Section::Certificate {
        expiration: expiration.to_string(),
        severity: classify_expiration(expiration),
    })
}

/// Classifies certificate expiration text by its wording.
pub fn classify_expiration(text: &str) -> Severity {
    if text.contains("expired") {
        Severity::Critical
    } else if text.contains("expires <") && text.contains("< 30 days") {
        Severity::Critical
    } else if text.contains("expires <") && text.contains("< 60 days") {
        Severity::Warning
    } else {
        Severity::Safe
    }
}

fn ciphers_section(categories: &OrderedMap<Vec<Cipher>>) -> Option<Section> {
    let groups: Vec<CipherGroup> = categories
        .iter()
        .filter(|(_, ciphers)| !ciphers.is_empty())
        .map(|(category, ciphers)| CipherGroup {
            category: category.to_string(),
            ciphers: ciphers
                .iter()
                .map(|c| CipherLine { label: c.display_name().to_string(), strength: c.strength })
                .collect(),
        })
        .collect();

    if groups.is_empty() {
        return None;
    }

    let all = || groups.iter().flat_map(|g| g.ciphers.iter());
    let total = all().count();
    let weak = all().filter(|c| c.strength == Strength::Weak).count();
    Some(Section::Ciphers(CipherSummary { total, weak, groups }))
}

fn server_config_section(defaults: &OrderedMap<serde_json::Value>) -> Option<Section> {
    if defaults.is_empty() {
        return None;
    }
    let rows = defaults
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (humanize_key(key), value)
        })
        .collect();
    Some(Section::ServerConfig(rows))
}

/// `session_ticket` becomes `Session Ticket`: underscores turn into spaces and
/// every word starts upper-case.
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut at_word_start = true;
    for c in key.replace('_', " ").chars() {
        if at_word_start && c.is_alphanumeric() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    label
}

fn headers_section(headers: &OrderedMap<HeaderFinding>) -> Option<Section> {
    if headers.is_empty() {
        return None;
    }
    let lines = headers
        .iter()
        .map(|(name, h)| HeaderLine { name: name.to_string(), finding: h.finding.clone(), ok: h.severity == "OK" })
        .collect();
    Some(Section::Headers(lines))
}
