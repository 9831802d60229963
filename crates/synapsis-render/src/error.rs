//! Error types for rendering

use std::path::PathBuf;

/// Errors while turning validated text into an artifact on disk
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Input text is not YAML
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Tree could not be expressed as a JSON payload (e.g. non-scalar map keys)
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Document skeleton failed to render
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// IO error while creating directories or writing the document
    #[error("io error writing {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
