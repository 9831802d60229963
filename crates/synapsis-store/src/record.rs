//! Stored map metadata and report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Metadata for one rendered map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    /// UUID v4 string
    pub id: String,
    /// Topic the map was generated for
    pub topic: String,
    /// Artifact file name
    pub file_name: String,
    /// Artifact path
    pub path: PathBuf,
    /// Artifact size when saved
    pub size_bytes: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Storage usage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of records
    pub total_maps: usize,
    /// Combined size of artifacts still on disk
    pub total_size_bytes: u64,
    /// `total_size_bytes` in MiB, two decimals
    pub total_size_mb: f64,
    /// Configured limit
    pub max_maps: usize,
}

/// What a cleanup pass removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupKind {
    /// Older than the retention window
    Expired,
    /// Record without artifact
    Orphaned,
}

impl fmt::Display for CleanupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::Orphaned => write!(f, "orphaned"),
        }
    }
}

/// Outcome of one cleanup pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Pass kind
    pub kind: CleanupKind,
    /// Number of records removed
    pub removed: usize,
    /// Ids of removed records
    pub ids: Vec<String>,
    /// Retention window, only for expiry passes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
}

impl CleanupReport {
    pub(crate) fn new(kind: CleanupKind, ids: Vec<String>, retention_days: Option<u32>) -> Self {
        Self {
            kind,
            removed: ids.len(),
            ids,
            retention_days,
        }
    }
}

/// Cleaner state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerStatus {
    /// Background thread is active
    pub running: bool,
    /// Retention window in days
    pub retention_days: u32,
    /// Directory being cleaned
    pub data_dir: PathBuf,
}

/// Bytes to MiB rounded to two decimals
#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes_round_to_two_decimals() {
        assert!((to_megabytes(0) - 0.0).abs() < f64::EPSILON);
        assert!((to_megabytes(1024 * 1024) - 1.0).abs() < f64::EPSILON);
        assert!((to_megabytes(1_572_864) - 1.5).abs() < f64::EPSILON);
        assert!((to_megabytes(12_345) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn report_counts_ids() {
        let ids = vec!["a".into(), "b".into()];
        let report = CleanupReport::new(CleanupKind::Expired, ids, Some(30));
        assert_eq!(report.removed, 2);
        assert_eq!(serde_json::to_value(&report).unwrap()["kind"], "expired");
    }

    #[test]
    fn orphan_report_omits_retention() {
        let report = CleanupReport::new(CleanupKind::Orphaned, Vec::new(), None);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("retention_days").is_none());
        assert_eq!(CleanupKind::Orphaned.to_string(), "orphaned");
    }
}
