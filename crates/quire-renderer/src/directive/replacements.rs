//! Deferred string replacement.
//!
//! Some directive output can only be produced after the whole page is
//! expanded (for instance the list of glossary terms a page uses). Such
//! directives emit a placeholder, and the final text is substituted once.

/// Collects string replacements and applies them in registration order.
///
/// # Example
///
/// ```
/// use quire_renderer::directive::Replacements;
///
/// let mut html = "<p>Terms: <!--quire:terms--></p>".to_string();
/// let mut replacements = Replacements::new();
/// replacements.add("<!--quire:terms-->", "<a href=\"#ast\">AST</a>");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<p>Terms: <a href=\"#ast\">AST</a></p>");
/// ```
#[derive(Debug, Default)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    /// Create a new empty replacements collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a replacement: all occurrences of `from` will be replaced with `to`.
    ///
    /// Empty patterns are ignored.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        if !from.is_empty() {
            self.items.push((from, to.into()));
        }
    }

    /// Apply all registered replacements, consuming the collector.
    pub fn apply(self, text: &mut String) {
        for (from, to) in self.items {
            if text.contains(&from) {
                *text = text.replace(&from, &to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replacements() {
        let mut html = "unchanged".to_owned();
        Replacements::new().apply(&mut html);
        assert_eq!(html, "unchanged");
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let mut html = "/home/me/book/a and /home/me/book/b".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("/home/me/book", "/u/quire");
        replacements.apply(&mut html);
        assert_eq!(html, "/u/quire/a and /u/quire/b");
    }

    #[test]
    fn test_empty_pattern_ignored() {
        let mut replacements = Replacements::new();
        replacements.add("", "x");
        let mut html = "text".to_owned();
        replacements.apply(&mut html);
        assert_eq!(html, "text");
    }

    #[test]
    fn test_replacement_order() {
        let mut html = "aaa".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("a", "bb");
        replacements.add("bb", "c");
        replacements.apply(&mut html);
        assert_eq!(html, "ccc");
    }
}
