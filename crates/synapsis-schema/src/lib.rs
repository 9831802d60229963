//! Synapsis Tree Schema
//!
//! The trusted boundary between untrusted generated text and the mind-map
//! tree the rest of the pipeline works with.
//!
//! # Core Operations
//!
//! - **Sanitize**: strip code fences, whole-line comments and surrounding
//!   whitespace from raw model output ([`sanitize`])
//! - **Validate**: parse as YAML and walk the whole tree, collecting every
//!   schema violation with its node path ([`validate_schema`])
//! - **Clean and validate**: both steps in one call, failing with all
//!   violations at once ([`clean_and_validate`])
//!
//! # Architecture
//!
//! ```text
//! raw text → sanitize → serde_yaml::Value → depth-first walk → ValidationReport
//!                                                   ↓
//!                                     "root.children[2]: field 'title' required"
//! ```
//!
//! # Example
//!
//! ```rust
//! use synapsis_schema::{clean_and_validate, validate_schema};
//!
//! let report = validate_schema("title: Rust\nchildren:\n  - icon: x\n");
//! assert!(!report.valid);
//! assert_eq!(report.errors, vec!["root.children[0]: field 'title' required"]);
//!
//! let cleaned = clean_and_validate("```yaml\ntitle: Rust\n```").unwrap();
//! assert_eq!(cleaned, "title: Rust");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod node;
pub mod sanitize;
pub mod validate;

pub use error::ValidationError;
pub use node::Node;
pub use sanitize::sanitize;
pub use validate::{
    check, clean_and_validate, parse_document, validate_schema, ValidationReport, ROOT_PATH,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the tree schema
    pub use crate::error::ValidationError;
    pub use crate::node::Node;
    pub use crate::sanitize::sanitize;
    pub use crate::validate::{clean_and_validate, validate_schema, ValidationReport};
}
