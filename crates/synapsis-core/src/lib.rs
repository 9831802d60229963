//! Synapsis Core - mind-map pipeline orchestrator
//!
//! Turns a free-text topic into a rendered mind map by driving an injected
//! text generator through four stages.
//!
//! # Core Operations
//!
//! - **Plan**: concise 2-3 level outline from the planner prompt
//! - **Expand**: detailed 4-5 level tree, optionally seeded with the plan
//! - **Validate**: sanitize the raw response and check the full tree schema
//! - **Render**: write the standalone HTML artifact
//!
//! # Architecture
//!
//! ```text
//! topic ─▶ Planner/Expander ─▶ TextGenerator ─▶ raw text
//!                                                  │
//!                       synapsis-schema ◀──────────┘
//!                 (sanitize + collect violations)
//!                              │
//!                       synapsis-render ─▶ mindmap.html
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use synapsis_core::{from_fn, generate, GenerateOptions};
//!
//! let generator = from_fn(|_: &str| Ok("title: Go\nchildren:\n  - title: Channels".to_string()));
//! let path = generate("Go", generator, &GenerateOptions::new().with_output("go.html"))?;
//! println!("{}", path.display());
//! # Ok::<(), synapsis_core::PipelineError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod agents;
pub mod builder;
pub mod config;
pub mod error;
pub mod generator;

pub use agents::{expand_prompt, plan_prompt, Expander, Planner, TOPIC_MARKER};
pub use builder::{generate, GenerateOptions, MindMapBuilder};
pub use config::{ConfigError, LimitsConfig, LlmConfig, StorageConfig, SynapsisConfig};
pub use error::PipelineError;
pub use generator::{from_fn, FnGenerator, GenerationError, TextGenerator};

pub use synapsis_render::{RenderError, DEFAULT_OUTPUT};
pub use synapsis_schema::{ValidationError, ValidationReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running the pipeline
    pub use crate::builder::{generate, GenerateOptions, MindMapBuilder};
    pub use crate::error::PipelineError;
    pub use crate::generator::{from_fn, GenerationError, TextGenerator};
}
