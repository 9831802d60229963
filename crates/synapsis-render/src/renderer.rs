//! Document rendering and artifact output

use crate::error::RenderError;
use crate::payload::encode_payload;
use crate::template::compose;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File name used when no output path is given, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "mindmap.html";

/// Render validated text to an HTML string without touching disk
///
/// # Errors
/// - [`RenderError::Parse`] if `validated` is not YAML
/// - [`RenderError::Encode`] if the tree cannot be expressed as JSON
/// - [`RenderError::Template`] if the skeleton fails to render
pub fn render_document(validated: &str) -> Result<String, RenderError> {
    let mut tree: Value = serde_yaml::from_str(validated)?;
    tree.apply_merge()?;
    let payload = encode_payload(&tree)?;
    compose(&payload)
}

/// Render validated text and write the artifact
///
/// Writes to `output` or, when absent, to [`DEFAULT_OUTPUT`] in the current
/// working directory. Missing parent directories are created. The write is a
/// single `fs::write`; an interrupted write leaves a partial file, which is
/// acceptable because artifacts are regenerable.
///
/// # Returns
/// Absolute path of the written artifact.
///
/// # Errors
/// - [`RenderError::Parse`] / [`RenderError::Encode`] from [`render_document`]
/// - [`RenderError::Io`] if the directory or file cannot be written
pub fn render_html(validated: &str, output: Option<&Path>) -> Result<PathBuf, RenderError> {
    let document = render_document(validated)?;
    let target = resolve_output(output)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| RenderError::io_error(parent, e))?;
    }
    fs::write(&target, document.as_bytes()).map_err(|e| RenderError::io_error(&target, e))?;

    tracing::debug!(path = %target.display(), bytes = document.len(), "artifact written");
    Ok(target)
}

/// Absolute artifact path for an optional caller-supplied path
///
/// # Errors
/// [`RenderError::Io`] if the current directory cannot be determined.
pub fn resolve_output(output: Option<&Path>) -> Result<PathBuf, RenderError> {
    let path = output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), Path::to_path_buf);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|e| RenderError::io_error(&path, e))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::embedded_payload;

    #[test]
    fn render_document_embeds_tree() {
        let document = render_document("title: Go\nchildren:\n  - title: Channels").unwrap();
        assert!(document.starts_with("<!DOCTYPE html>"));
        let payload = embedded_payload(&document).unwrap();
        assert_eq!(payload["title"], "Go");
        assert_eq!(payload["children"][0]["title"], "Channels");
    }

    #[test]
    fn render_document_rejects_non_yaml() {
        let err = render_document("title: [broken").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn render_document_rejects_complex_keys() {
        let err = render_document("? [a, b]\n: value\ntitle: x").unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }

    #[test]
    fn render_document_applies_merge_keys() {
        let document = render_document("base: &base\n  icon: x\n<<: *base\ntitle: Go").unwrap();
        let payload = embedded_payload(&document).unwrap();
        assert_eq!(payload["title"], "Go");
        assert_eq!(payload["icon"], "x");
        assert!(payload.get("<<").is_none());
    }

    #[test]
    fn writes_to_explicit_path_creating_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/map.html");

        let written = render_html("title: Nested", Some(target.as_path())).unwrap();

        assert_eq!(written, target);
        assert!(written.is_absolute());
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.contains("\"title\":\"Nested\""));
    }

    #[test]
    fn resolves_relative_path_against_cwd() {
        let resolved = resolve_output(Some(Path::new("maps/a.html"))).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("maps/a.html"));

        let default = resolve_output(None).unwrap();
        assert!(default.ends_with(DEFAULT_OUTPUT));
    }
}
