//! Run summary produced by the extraction driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A work item that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub key: String,
    pub url: String,
    pub reason: String,
}

/// An asset download that failed after its record was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    /// Record label, e.g. the person identifier
    pub label: String,
    pub key: String,
    pub url: String,
    pub reason: String,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Items produced by the work-list resolver
    pub discovered: usize,
    /// Items skipped because the ledger already held them
    pub skipped: usize,
    /// Records handed to the persister
    pub added: usize,
    /// Discovery stopped early with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_error: Option<String>,
    pub failures: Vec<ItemFailure>,
    pub asset_failures: Vec<AssetFailure>,
}

impl RunReport {
    pub fn new(source: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            source: source.into(),
            start_time: now,
            end_time: now,
            discovered: 0,
            skipped: 0,
            added: 0,
            discovery_error: None,
            failures: Vec::new(),
            asset_failures: Vec::new(),
        }
    }

    /// Share of attempted items that produced a record.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.added + self.failures.len();
        if attempted == 0 {
            1.0
        } else {
            self.added as f64 / attempted as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let mut report = RunReport::new("movies");
        assert_eq!(report.success_rate(), 1.0);

        report.added = 3;
        report.failures.push(ItemFailure {
            key: "tt1".into(),
            url: "https://example.com/tt1".into(),
            reason: "missing title".into(),
        });
        assert!((report.success_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = RunReport::new("wanted");
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("discovery_error"));
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source, "wanted");
    }
}
