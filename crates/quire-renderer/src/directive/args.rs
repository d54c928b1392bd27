//! Directive argument parsing.
//!
//! Parses the `[content]{#id .class key="value"}` tail of a directive.

use std::collections::HashMap;

use super::DirectiveError;

/// Parsed arguments from directive syntax.
///
/// For `::slice[code/walk.js]{tag=loop}` the content is `code/walk.js` and
/// the attribute `tag` is `loop`.
///
/// # Example
///
/// ```
/// use quire_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("walk.js", r#"#sample .wide tag="loop""#);
/// assert_eq!(args.content, "walk.js");
/// assert_eq!(args.id, Some("sample".to_string()));
/// assert_eq!(args.classes, vec!["wide"]);
/// assert_eq!(args.get("tag"), Some("loop"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Content from brackets: `[content]` (empty string if not provided).
    pub content: String,
    /// ID from attributes: `{#id}`.
    pub id: Option<String>,
    /// Classes from attributes: `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes: `{key="value"}`.
    pub attrs: HashMap<String, String>,
}

impl DirectiveArgs {
    /// Parse content and attributes string into structured arguments.
    ///
    /// `attrs_str` is the text between the braces, without the braces.
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            content: content.trim().to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let (id, rest) = split_name(rest);
                args.id = Some(id.to_owned());
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let (class, rest) = split_name(rest);
                args.classes.push(class.to_owned());
                remaining = rest;
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Skip one unrecognized character
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = &remaining[skip..];
            }
            remaining = remaining.trim_start();
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Get an attribute value, failing when it is absent or empty.
    pub fn require(&self, key: &str) -> Result<&str, DirectiveError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(DirectiveError::MissingArgument(key.to_owned())),
        }
    }

    /// Get the bracket content, failing when it is empty.
    ///
    /// `what` names the argument in the error (`file`, `slug`, ...).
    pub fn require_content(&self, what: &str) -> Result<&str, DirectiveError> {
        if self.content.is_empty() {
            return Err(DirectiveError::MissingArgument(what.to_owned()));
        }
        Ok(&self.content)
    }
}

/// Split an `#id` or `.class` name from the rest of the attribute string.
fn split_name(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            let end_quote = stripped.find(quote)?;
            return Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}
