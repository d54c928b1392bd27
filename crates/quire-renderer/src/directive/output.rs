//! Directive output types.

/// Output from directive processing.
///
/// - [`Html`](Self::Html): text inserted verbatim and never rescanned
/// - [`Markdown`](Self::Markdown): text expanded again at the same location
/// - [`Skip`](Self::Skip): the directive is left in place unchanged
///
/// # Example
///
/// ```
/// use quire_renderer::directive::DirectiveOutput;
///
/// let escaped = DirectiveOutput::html("a &lt; b");
/// let nested = DirectiveOutput::markdown("See :number[intro].");
/// assert!(matches!(escaped, DirectiveOutput::Html(_)));
/// assert!(matches!(nested, DirectiveOutput::Markdown(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutput {
    /// Final text for the page.
    Html(String),
    /// Text that may contain further directives.
    Markdown(String),
    /// Don't handle this directive (pass through unchanged).
    Skip,
}

impl DirectiveOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    /// Create a markdown output for recursive expansion.
    #[must_use]
    pub fn markdown(s: impl Into<String>) -> Self {
        Self::Markdown(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html() {
        let output = DirectiveOutput::html("<p>test</p>");
        assert_eq!(output, DirectiveOutput::Html("<p>test</p>".to_owned()));
    }

    #[test]
    fn test_markdown() {
        let output = DirectiveOutput::markdown(String::from("# Heading"));
        assert_eq!(output, DirectiveOutput::Markdown("# Heading".to_owned()));
    }
}
