//! Embedded data payload
//!
//! The tree travels inside the document as one JSON literal assigned to
//! `DATA`. JSON is a subset of the script's value notation, but a raw `</script>`
//! or a U+2028 inside a string would still break out of the element or the
//! statement, so those characters are written as `\uXXXX` escapes. They can only
//! occur inside JSON strings, where the escape decodes to the same character.

use crate::error::RenderError;
use serde_yaml::Value;

/// Text immediately preceding the payload in the document
pub(crate) const PAYLOAD_PREFIX: &str = "const DATA = ";

/// Text immediately following the payload in the document
pub(crate) const PAYLOAD_SUFFIX: &str = ";\n";

/// Encode a parsed tree as a script-safe JSON literal
///
/// # Errors
/// [`RenderError::Encode`] if the tree has map keys JSON cannot express.
pub fn encode_payload(tree: &Value) -> Result<String, RenderError> {
    let json = serde_json::to_string(tree)?;
    Ok(escape_for_script(&json))
}

/// Extract and parse the payload from a rendered document
///
/// Returns `None` if the document carries no payload or it does not parse.
#[must_use]
pub fn embedded_payload(document: &str) -> Option<serde_json::Value> {
    let start = document.find(PAYLOAD_PREFIX)? + PAYLOAD_PREFIX.len();
    let len = document[start..].find(PAYLOAD_SUFFIX)?;
    serde_json::from_str(&document[start..start + len]).ok()
}

fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
