//! Typed mind-map node
//!
//! The pipeline moves trees around as text and validates them structurally;
//! [`Node`] is the typed view for callers that want to inspect or build a tree
//! in code. A tree is transient: built for one request, serialized, dropped.

use crate::error::ValidationError;
use crate::validate::{check, parse_document};
use serde::{Deserialize, Serialize};

/// One node of a mind map
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Node label (required at every depth)
    pub title: String,
    /// Decorative icon, usually an emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hex-like accent color; its syntax is never checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Initial visual state; absent means expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Ordered child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create leaf node with title
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// With color
    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// With explicit expanded state
    #[inline]
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    /// Append child
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the node starts expanded (default when unset)
    #[inline]
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded.unwrap_or(true)
    }

    /// Whether the node has any children
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of levels in this subtree (a leaf is 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Number of nodes in this subtree, including self
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Parse validated YAML into a typed tree
    ///
    /// Structural violations are reported the same way as
    /// [`validate_schema`](crate::validate_schema); a tree that is
    /// structurally valid but carries a non-string title or icon is reported
    /// as a syntax error.
    ///
    /// # Errors
    /// [`ValidationError`] if the text is not a schema-valid tree.
    pub fn from_yaml(text: &str) -> Result<Self, ValidationError> {
        check(text)?;
        let document = parse_document(text).map_err(|e| ValidationError::syntax(e.to_string()))?;
        serde_yaml::from_value(document).map_err(|e| ValidationError::syntax(e.to_string()))
    }

    /// Serialize to YAML
    ///
    /// # Errors
    /// Propagates the serializer error.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
