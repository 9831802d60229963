//! Error types for the pipeline
//!
//! Covers:
//! - Generation backend failures (passed through unchanged)
//! - Syntax and schema violations in generated content
//! - Rendering with nothing in the buffer
//! - Parse, encode and write failures while rendering

use crate::generator::GenerationError;
use synapsis_render::RenderError;
use synapsis_schema::ValidationError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The injected generator failed
    #[error("generation failed: {0}")]
    Generation(#[source] GenerationError),

    /// Generated content does not parse or breaks the tree schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation called in a state that cannot satisfy it
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Rendering or writing the artifact failed
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Wrap a generator error without altering it
    #[inline]
    #[must_use]
    pub fn generation(source: GenerationError) -> Self {
        Self::Generation(source)
    }

    /// Check if running the pipeline again could succeed
    ///
    /// Generators are non-deterministic, so a fresh response may parse and
    /// satisfy the schema where the last one did not.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::Validation(_))
    }

    /// Individual violation messages, empty for non-validation errors
    #[must_use]
    pub fn violations(&self) -> Vec<&str> {
        match self {
            Self::Validation(e) => e.messages(),
            _ => Vec::new(),
        }
    }

    /// Borrow the generator's original error
    #[must_use]
    pub fn generation_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Generation(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
