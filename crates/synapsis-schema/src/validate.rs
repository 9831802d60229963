//! Recursive schema validation
//!
//! Parses text as a generic YAML document and walks every node depth-first.
//! The walk never stops at the first problem: each violation is recorded with
//! the path of the node it was found at, so a caller (or a re-prompt loop) gets
//! the complete list of corrections in one pass.

use crate::error::ValidationError;
use crate::sanitize::sanitize;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Path label of the root node in violation messages
pub const ROOT_PATH: &str = "root";

/// Message reported when the document root is not a mapping
pub const ROOT_NOT_MAPPING: &str = "root must be a mapping";

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when no violation was found
    pub valid: bool,
    /// Violations in walk order (empty when valid)
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report for a document without violations
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Report carrying the given violations
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationReport {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(ValidationError::Syntax { message }) => Self::from_errors(vec![message]),
            Err(ValidationError::Schema { violations }) => Self::from_errors(violations),
        }
    }
}

/// Validate `text` against the node schema
///
/// A parse failure yields a single syntax message and no further checks; a
/// non-mapping root yields `"root must be a mapping"`; otherwise every node is
/// visited.
#[must_use]
pub fn validate_schema(text: &str) -> ValidationReport {
    check(text).into()
}

/// Validate `text`, returning the typed error on failure
///
/// # Errors
/// - [`ValidationError::Syntax`] if `text` is not a single YAML document
/// - [`ValidationError::Schema`] with every violation found in the tree
pub fn check(text: &str) -> Result<(), ValidationError> {
    let document =
        parse_document(text).map_err(|e| ValidationError::syntax(format!("invalid YAML: {e}")))?;

    let Value::Mapping(root) = &document else {
        return Err(ValidationError::Schema {
            violations: vec![ROOT_NOT_MAPPING.to_string()],
        });
    };

    let mut violations = Vec::new();
    check_node(root, ROOT_PATH, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Schema { violations })
    }
}

/// Parse one YAML document with merge keys (`<<`) resolved
///
/// A mapping that repeats a key is rejected by the parser rather than keeping
/// the last value.
///
/// # Errors
/// Propagates the parser error.
pub fn parse_document(text: &str) -> Result<Value, serde_yaml::Error> {
    let mut document: Value = serde_yaml::from_str(text)?;
    document.apply_merge()?;
    Ok(document)
}

/// Sanitize then validate; returns the sanitized text on success
///
/// # Errors
/// Same as [`check`], evaluated on the sanitized text.
pub fn clean_and_validate(raw: &str) -> Result<String, ValidationError> {
    let cleaned = sanitize(raw);
    check(&cleaned)?;
    Ok(cleaned)
}

fn check_node(node: &Mapping, path: &str, violations: &mut Vec<String>) {
    if !node.contains_key("title") {
        violations.push(format!("{path}: field 'title' required"));
    }

    let Some(children) = node.get("children") else {
        return;
    };

    let Value::Sequence(children) = children else {
        violations.push(format!("{path}: 'children' must be a sequence"));
        return;
    };

    for (index, child) in children.iter().enumerate() {
        let child_path = format!("{path}.children[{index}]");
        match child {
            Value::Mapping(child) => check_node(child, &child_path, violations),
            _ => violations.push(format!("{child_path}: must be a mapping")),
        }
    }
}
