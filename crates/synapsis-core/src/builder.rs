//! Mind-map builder
//!
//! The primary interface of the pipeline. A builder owns one generator and a
//! single working buffer that each stage replaces:
//!
//! ```text
//! plan ──▶ expand ──▶ validate ──▶ render
//!  raw      raw       sanitized    artifact path
//! ```
//!
//! Stages run synchronously in call order. A failed stage leaves the buffer as
//! it was, so callers can inspect [`MindMapBuilder::text`] after an error.

use crate::agents::{Expander, Planner};
use crate::error::PipelineError;
use crate::generator::TextGenerator;
use std::path::{Path, PathBuf};
use synapsis_schema::clean_and_validate;

/// Builder for generating a validated mind map from a topic
///
/// Usage:
/// ```rust
/// use synapsis_core::{from_fn, MindMapBuilder};
///
/// let generator = from_fn(|_: &str| Ok("```yaml\ntitle: Go\n```".to_string()));
/// let mut builder = MindMapBuilder::new(generator);
/// builder.expand("Go", "")?.validate()?;
/// assert_eq!(builder.text(), "title: Go");
/// # Ok::<(), synapsis_core::PipelineError>(())
/// ```
#[derive(Debug)]
pub struct MindMapBuilder<G> {
    generator: G,
    buffer: Option<String>,
}

impl<G: TextGenerator> MindMapBuilder<G> {
    /// Create a new builder with an empty buffer
    #[inline]
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self { generator, buffer: None }
    }

    /// Borrow the injected generator
    #[inline]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Current buffer, or the empty string before any stage ran
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        self.buffer.as_deref().unwrap_or("")
    }

    /// Take the buffer out, leaving the builder empty
    pub fn take_text(&mut self) -> Option<String> {
        self.buffer.take()
    }

    /// Ask the planner for a concise outline of `topic`
    ///
    /// The raw response is stored untouched; it is neither sanitized nor
    /// validated here.
    ///
    /// # Errors
    /// [`PipelineError::Generation`] with the generator's error.
    #[tracing::instrument(skip(self))]
    pub fn plan(&mut self, topic: &str) -> Result<&mut Self, PipelineError> {
        let plan = Planner::new(&self.generator)
            .create(topic)
            .map_err(PipelineError::generation)?;
        tracing::debug!(bytes = plan.len(), "plan generated");
        self.buffer = Some(plan);
        Ok(self)
    }

    /// Ask the expander for a detailed tree of `topic`
    ///
    /// The current buffer, if any, is passed along as the prior plan. An empty
    /// `style` adds no style hint.
    ///
    /// # Errors
    /// [`PipelineError::Generation`] with the generator's error.
    #[tracing::instrument(skip(self))]
    pub fn expand(&mut self, topic: &str, style: &str) -> Result<&mut Self, PipelineError> {
        let prior = self.buffer.take().unwrap_or_default();
        let result = Expander::new(&self.generator).expand(topic, &prior, style);
        self.store_expansion(result, prior)
    }

    /// Expand `topic` with an explicit prior plan instead of the buffer
    ///
    /// # Errors
    /// [`PipelineError::Generation`] with the generator's error.
    #[tracing::instrument(skip(self, prior_plan))]
    pub fn expand_with_plan(
        &mut self,
        topic: &str,
        prior_plan: &str,
        style: &str,
    ) -> Result<&mut Self, PipelineError> {
        let result = Expander::new(&self.generator).expand(topic, prior_plan, style);
        let previous = self.buffer.take().unwrap_or_default();
        self.store_expansion(result, previous)
    }

    fn store_expansion(
        &mut self,
        result: Result<String, crate::generator::GenerationError>,
        previous: String,
    ) -> Result<&mut Self, PipelineError> {
        match result {
            Ok(expanded) => {
                tracing::debug!(bytes = expanded.len(), "expansion generated");
                self.buffer = Some(expanded);
                Ok(self)
            }
            Err(e) => {
                if !previous.is_empty() {
                    self.buffer = Some(previous);
                }
                tracing::warn!(error = %e, "generator failed");
                Err(PipelineError::generation(e))
            }
        }
    }

    /// Sanitize and validate the buffer
    ///
    /// On success the buffer holds the sanitized text. With nothing in the
    /// buffer this is a no-op.
    ///
    /// # Errors
    /// [`PipelineError::Validation`] carrying every violation found.
    #[tracing::instrument(skip(self))]
    pub fn validate(&mut self) -> Result<&mut Self, PipelineError> {
        let Some(raw) = self.buffer.as_deref().filter(|text| !text.is_empty()) else {
            return Ok(self);
        };

        match clean_and_validate(raw) {
            Ok(cleaned) => {
                tracing::info!("generated content passed validation");
                self.buffer = Some(cleaned);
                Ok(self)
            }
            Err(e) => {
                tracing::warn!(
                    violations = e.messages().len(),
                    error = %e,
                    "generated content rejected"
                );
                Err(e.into())
            }
        }
    }

    /// Render the buffer to an HTML artifact
    ///
    /// Writes to `output`, or `mindmap.html` in the working directory when
    /// absent. Returns the absolute path of the artifact.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidState`] if the buffer is empty
    /// - [`PipelineError::Render`] if the text does not parse or cannot be written
    #[tracing::instrument(skip(self))]
    pub fn render(&self, output: Option<&Path>) -> Result<PathBuf, PipelineError> {
        let text = self.text();
        if text.is_empty() {
            return Err(PipelineError::InvalidState("nothing to render"));
        }
        let path = synapsis_render::render_html(text, output)?;
        tracing::info!(path = %path.display(), "mind map rendered");
        Ok(path)
    }

    /// Expand then validate, returning the validated text
    ///
    /// Equivalent to `expand(topic, style)?.validate()?` followed by
    /// [`text`](Self::text).
    ///
    /// # Errors
    /// Any error from [`expand`](Self::expand) or [`validate`](Self::validate).
    pub fn plan_and_expand(&mut self, topic: &str, style: &str) -> Result<String, PipelineError> {
        self.expand(topic, style)?.validate()?;
        Ok(self.text().to_string())
    }
}

/// Options for [`generate`]
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Artifact path; `mindmap.html` in the working directory when `None`
    pub output: Option<PathBuf>,
    /// Style hint for the expander, empty for none
    pub style: String,
    /// Run a planning pass before expansion
    pub plan_first: bool,
    /// Validate before rendering
    pub validate: bool,
}

impl GenerateOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With output path
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// With style hint
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// With a planning pass before expansion
    #[inline]
    #[must_use]
    pub fn with_plan(mut self) -> Self {
        self.plan_first = true;
        self
    }

    /// Skip validation and render the raw expansion
    #[inline]
    #[must_use]
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: None,
            style: String::new(),
            plan_first: false,
            validate: true,
        }
    }
}

/// Generate a mind map for `topic` in one call
///
/// Runs expand, validate (unless disabled) and render with a fresh builder.
///
/// # Errors
/// Any [`PipelineError`] raised by the stages.
pub fn generate<G: TextGenerator>(
    topic: &str,
    generator: G,
    options: &GenerateOptions,
) -> Result<PathBuf, PipelineError> {
    tracing::info!(topic, "generating mind map");
    let mut builder = MindMapBuilder::new(generator);
    if options.plan_first {
        builder.plan(topic)?;
    }
    builder.expand(topic, &options.style)?;
    if options.validate {
        builder.validate()?;
    }
    builder.render(options.output.as_deref())
}
