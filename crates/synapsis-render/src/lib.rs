//! Synapsis Renderer
//!
//! Turns previously validated mind-map YAML into a standalone HTML artifact.
//!
//! # Document layout
//!
//! Every artifact is the same fixed skeleton (styles plus a recursive
//! `renderNode` script) with exactly one embedded data payload:
//!
//! ```text
//! <script>
//!     const DATA = {"title":"Rust","children":[...]};
//!     function renderNode(node, path, isRoot) { ... }
//! </script>
//! ```
//!
//! The payload is JSON with `<`, `>`, `&`, U+2028 and U+2029 escaped, so any
//! generated title can sit verbatim inside the script element. The renderer
//! re-parses its input instead of taking a typed tree, which keeps it usable on
//! its own for any text that passed validation earlier.
//!
//! # Example
//!
//! ```rust,no_run
//! use synapsis_render::render_html;
//! use std::path::Path;
//!
//! let path = render_html("title: Rust", Some(Path::new("out/rust.html")))?;
//! println!("written to {}", path.display());
//! # Ok::<(), synapsis_render::RenderError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod payload;
pub mod renderer;
mod template;

pub use error::RenderError;
pub use payload::{embedded_payload, encode_payload};
pub use renderer::{render_document, render_html, resolve_output, DEFAULT_OUTPUT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
