//! GC run report.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Outcome of a single collector run.
///
/// Counters reflect partial progress even when errors occurred; a run
/// never throws away the work it managed to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcReport {
    /// False as soon as any failure is recorded.
    pub success: bool,
    pub files_deleted: u64,
    pub folders_deleted: u64,
    pub shares_purged: u64,
    pub link_shares_purged: u64,
    pub stars_purged: u64,
    pub blobs_deleted: u64,
    /// Per-item failures, in the order they occurred.
    pub errors: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
}

impl GcReport {
    pub fn new(started_at: OffsetDateTime) -> Self {
        Self {
            success: true,
            files_deleted: 0,
            folders_deleted: 0,
            shares_purged: 0,
            link_shares_purged: 0,
            stars_purged: 0,
            blobs_deleted: 0,
            errors: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    /// Whether the run completed without recording any failure.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Total records removed across all collections.
    pub fn total_deleted(&self) -> u64 {
        self.files_deleted
            + self.folders_deleted
            + self.shares_purged
            + self.link_shares_purged
            + self.stars_purged
    }

    pub fn record_error(&mut self, context: &str, error: impl std::fmt::Display) {
        self.success = false;
        self.errors.push(format!("{context}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_report_is_success() {
        let report = GcReport::new(OffsetDateTime::now_utc());
        assert!(report.success());
        assert_eq!(report.total_deleted(), 0);
    }

    #[test]
    fn recorded_error_flips_success() {
        let mut report = GcReport::new(OffsetDateTime::now_utc());
        report.record_error("file 123", "store unavailable");
        assert!(!report.success());
        assert_eq!(report.errors[0], "file 123: store unavailable");
    }

    #[test]
    fn serializes_timestamps_as_rfc3339() {
        let report = GcReport::new(OffsetDateTime::now_utc());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("started_at"));
        let decoded: GcReport = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.started_at, report.started_at);
    }
}
