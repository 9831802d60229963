//! Error types for map storage

use std::path::{Path, PathBuf};
use synapsis_core::PipelineError;

/// Storage, cleanup and service errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Metadata file could not be read or written as JSON
    #[error("metadata error at {path}: {source}")]
    Metadata {
        /// Metadata file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// No map with this id
    #[error("map not found: {0}")]
    NotFound(String),

    /// Record exists but its artifact is gone
    #[error("artifact for map {id} missing at {path}")]
    FileMissing {
        /// Map id
        id: String,
        /// Expected artifact path
        path: PathBuf,
    },

    /// Store already holds the maximum number of maps
    #[error("map limit of {0} reached")]
    LimitReached(usize),

    /// Topic is empty or too long
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    /// Cleaner thread already running
    #[error("cleaner already running")]
    CleanerRunning,

    /// Generation pipeline failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl StoreError {
    /// Create I/O error with path context
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create metadata error with path context
    pub fn metadata_error(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Metadata {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Check if the caller's input was at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidTopic(_)
                | Self::LimitReached(_)
                | Self::FileMissing { .. }
        )
    }
}
