//! Generation artifact cleanup
//!
//! Models wrap their answer in Markdown fences and sprinkle `#` comment lines
//! even when told not to. [`sanitize`] removes both before parsing.
//!
//! Comment removal is whole-line only: a `#` after other content on the same
//! line (a trailing comment, or a `#` inside a quoted color) is kept. Trailing
//! comments are valid YAML anyway, and tightening this could reject text that
//! is accepted today.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with optional language tag, up to and including the newline
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[\w+.-]*[ \t]*\r?\n").expect("opening fence pattern"));

/// Closing fence, optionally preceded by a newline
static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n)?```[ \t]*$").expect("closing fence pattern"));

/// Strip code fences, whole-line comments and surrounding whitespace
///
/// Total: never fails. The cleanup pass is repeated until the text stops
/// changing, so a doubly fenced answer is fully unwrapped and
/// `sanitize(sanitize(x)) == sanitize(x)` holds for every input.
///
/// ```rust
/// use synapsis_schema::sanitize;
///
/// assert_eq!(sanitize("```yaml\ntitle: X\n```"), "title: X");
/// assert_eq!(sanitize("# note\ntitle: X"), "title: X");
/// assert_eq!(sanitize("color: \"#667eea\""), "color: \"#667eea\"");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_pass(raw);
    loop {
        let next = sanitize_pass(&current);
        // Every step only removes text, so an unchanged length means a fixpoint.
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(raw: &str) -> String {
    let text = raw.trim();
    let text = OPENING_FENCE.replace(text, "");
    let text = CLOSING_FENCE.replace(&text, "");

    text.split('\n')
        .filter(|line| !is_comment_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[inline]
fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
