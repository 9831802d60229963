//! Injected text-generation capability
//!
//! The pipeline never talks to a model provider directly. It is handed a
//! [`TextGenerator`]: one synchronous, fallible call from prompt to response
//! text. Any backend (HTTP client, local model, test stub) plugs in here
//! without touching pipeline logic.
//!
//! Failures are opaque to the pipeline and pass through unchanged; timeouts
//! and retries belong to the implementation or its caller.

use std::fmt;
use std::sync::Arc;

/// Error produced by a generation backend, passed through untouched
pub type GenerationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Prompt in, response text out
pub trait TextGenerator {
    /// Produce a response for `prompt`
    ///
    /// # Errors
    /// Any backend failure; the pipeline propagates it as-is.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

/// Generator backed by a closure, see [`from_fn`]
#[derive(Clone)]
pub struct FnGenerator<F> {
    f: F,
}

impl<F> fmt::Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator").finish_non_exhaustive()
    }
}

impl<F> TextGenerator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (self.f)(prompt)
    }
}

/// Wrap a closure as a [`TextGenerator`]
///
/// ```rust
/// use synapsis_core::{from_fn, TextGenerator};
///
/// let echo = from_fn(|prompt: &str| Ok(format!("title: {}", prompt.len())));
/// assert_eq!(echo.generate("abc").unwrap(), "title: 3");
/// ```
pub fn from_fn<F>(f: F) -> FnGenerator<F>
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    FnGenerator { f }
}
