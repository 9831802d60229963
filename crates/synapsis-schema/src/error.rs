//! Error types for the tree schema
//!
//! Two failure kinds leave this crate:
//! - Syntax: the text is not YAML at all
//! - Schema: the text parses but breaks the node schema at one or more paths

/// Generated text was rejected by the schema validator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Text does not parse as structured data; no partial result exists
    #[error("invalid generated content: {message}")]
    Syntax {
        /// Parser message
        message: String,
    },

    /// Text parses but violates the schema; every violation is listed
    #[error("schema violations: {}", .violations.join("; "))]
    Schema {
        /// One message per offending node path, in walk order
        violations: Vec<String>,
    },
}

impl ValidationError {
    /// Create syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// All messages carried by this error, in order
    ///
    /// A syntax error yields its single parser message.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::Syntax { message } => vec![message.as_str()],
            Self::Schema { violations } => violations.iter().map(String::as_str).collect(),
        }
    }

    /// Check if the text failed to parse
    #[inline]
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_joins_all_violations() {
        let err = ValidationError::Schema {
            violations: vec![
                "root: field 'title' required".to_string(),
                "root.children[0]: must be a mapping".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "schema violations: root: field 'title' required; root.children[0]: must be a mapping"
        );
        assert_eq!(err.messages().len(), 2);
        assert!(!err.is_syntax());
    }

    #[test]
    fn syntax_error_display() {
        let err = ValidationError::syntax("invalid YAML: unexpected end");
        assert!(err.to_string().starts_with("invalid generated content"));
        assert_eq!(err.messages(), vec!["invalid YAML: unexpected end"]);
        assert!(err.is_syntax());
    }
}
