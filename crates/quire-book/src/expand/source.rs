//! Text transformations for included source files.
//!
//! These work on file contents only; the directives in [`super::files`] do
//! the reading and path resolution.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use quire_renderer::directive::DirectiveError;
use regex::{NoExpand, Regex};

static ESLINT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\s*//\s*eslint-disable-line.*$").unwrap());

static ESLINT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\s*/\*\s*eslint-disable\s+.*\*/\s*$").unwrap());

static PYTHON_LINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)[ \t]*#[ \t]*(?:noqa\b|pylint:[ \t]*disable\b).*$").unwrap()
});

/// Languages whose linter suppression comments are removed from listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LintFamily {
    JavaScript,
    Python,
}

impl LintFamily {
    fn for_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            _ => None,
        }
    }
}

/// `language-EXT` class for a code block showing `file`.
///
/// A file without an extension gives `language-`.
#[must_use]
pub fn code_class(file: &str) -> String {
    let ext = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    format!("language-{ext}")
}

/// Escape `&`, `>` and `<` for display inside `<pre>`.
///
/// Quotes are left alone: listings never end up in attribute values.
#[must_use]
pub fn escape_code(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

/// Remove linter suppression comments from the contents of `path`.
///
/// Files of unrecognised types are returned unchanged.
#[must_use]
pub fn strip_lint<'a>(text: &'a str, path: &Path) -> Cow<'a, str> {
    match LintFamily::for_path(path) {
        Some(LintFamily::JavaScript) => {
            let text = ESLINT_LINE_RE.replace_all(text, "");
            if !ESLINT_BLOCK_RE.is_match(&text) {
                return text;
            }
            Cow::Owned(ESLINT_BLOCK_RE.replace_all(&text, "").into_owned())
        }
        Some(LintFamily::Python) => PYTHON_LINT_RE.replace_all(text, ""),
        None => Cow::Borrowed(text),
    }
}

/// Text between the `// <TAG>` line and the `// </TAG>` marker.
///
/// Trailing whitespace before the closing marker is dropped. Returns `None`
/// when the tag pair is absent.
#[must_use]
pub fn slice(text: &str, tag: &str) -> Option<String> {
    let tag = regex::escape(tag);
    let re = Regex::new(&format!(r"(?s)//\s*<{tag}>\s*\n(.+?)\s*//\s*</{tag}>")).ok()?;
    re.captures(text).map(|caps| caps[1].to_owned())
}

/// Replace the lines from `// <TAG>` through `// </TAG>` with `...`.
///
/// Text without the tag pair is returned unchanged.
#[must_use]
pub fn erase<'a>(text: &'a str, tag: &str) -> Cow<'a, str> {
    let tag = regex::escape(tag);
    match Regex::new(&format!(r"(?ms)^\s*//\s*<{tag}>.+//\s*</{tag}>\s*$")) {
        Ok(re) => re.replacen(text, 1, NoExpand("...")),
        Err(_) => Cow::Borrowed(text),
    }
}

/// Replace the first occurrence of `marker` in `text`.
pub fn replace_marker(
    text: &str,
    marker: &str,
    replacement: &str,
) -> Result<String, DirectiveError> {
    if marker.is_empty() || !text.contains(marker) {
        return Err(DirectiveError::MarkerNotFound {
            marker: marker.to_owned(),
        });
    }
    Ok(text.replacen(marker, replacement, 1))
}
