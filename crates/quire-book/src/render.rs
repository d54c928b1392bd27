//! Page rendering: expansion, glossary checks and markdown conversion.

use std::fmt::Write as _;
use std::sync::Arc;

use quire_renderer::MarkdownRenderer;
use quire_renderer::directive::Replacements;

use crate::BookError;
use crate::context::PageScope;
use crate::expand::{TERMS_PLACEHOLDER, page_processor};
use crate::glossary::{glossary_references, unique_references};

/// Default limit on nested includes.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Renders catalog pages to HTML.
pub struct PageRenderer {
    markdown: MarkdownRenderer,
    max_include_depth: usize,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(MarkdownRenderer::new())
    }
}

impl PageRenderer {
    #[must_use]
    pub fn new(markdown: MarkdownRenderer) -> Self {
        Self {
            markdown,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Render the page in `scope`.
    ///
    /// The link table is appended to the page before expansion. Every
    /// glossary reference in the expanded text must be defined.
    pub fn render(&self, scope: &Arc<PageScope>) -> Result<String, BookError> {
        let book = scope.book();
        let page = scope.page();

        let text = format!("{}\n\n{}", page.content, book.links.reference_definitions());
        let expanded = page_processor(scope, self.max_include_depth)
            .process(&text)
            .map_err(|source| BookError::Directive {
                page: page.slug.clone(),
                source,
            })?;

        let references = glossary_references(&expanded);
        let unresolved: Vec<String> = unique_references(&references)
            .into_iter()
            .filter(|key| !book.glossary.contains(key))
            .map(str::to_owned)
            .collect();
        if !unresolved.is_empty() {
            return Err(BookError::UnresolvedGlossary {
                page: page.slug.clone(),
                keys: unresolved,
            });
        }

        let mut html = self.markdown.render(&expanded);
        let mut replacements = Replacements::new();
        replacements.add(TERMS_PLACEHOLDER, terms_list(scope, &references));
        replacements.apply(&mut html);

        tracing::debug!(
            page = %page.slug,
            references = references.len(),
            bytes = html.len(),
            "Rendered page"
        );
        Ok(html)
    }
}

/// Paragraph linking each referenced term to its glossary entry.
///
/// Empty when the page references no terms.
fn terms_list(scope: &PageScope, references: &[String]) -> String {
    let keys = unique_references(references);
    if keys.is_empty() {
        return String::new();
    }

    let book = scope.book();
    let glossary_output = book.catalog.get(&book.glossary_page).map_or_else(
        || format!("{}/index.html", book.glossary_page),
        |page| page.output.clone(),
    );
    let href = scope.href(&glossary_output);

    let mut html = String::from("<p class=\"terms\">Terms defined: ");
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            html.push_str(", ");
        }
        let text = book.glossary.get(key).unwrap_or(key);
        let _ = write!(html, "<a class=\"gl-ref\" href=\"{href}#{key}\">{text}</a>");
    }
    html.push_str("</p>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PageKind;
    use crate::context::BookContext;
    use crate::context::fixtures::book;
    use pretty_assertions::assert_eq;

    fn render(book: &Arc<BookContext>, index: usize) -> Result<String, BookError> {
        let scope = Arc::new(PageScope::new(Arc::clone(book), index).unwrap());
        PageRenderer::default().render(&scope)
    }

    fn book_with_content(slug: &str, content: &str) -> (Arc<BookContext>, usize) {
        let mut book = Arc::unwrap_or_clone(book());
        let index = book.catalog.get(slug).unwrap().index;
        book.catalog.pages_mut()[index].content = content.to_owned();
        (Arc::new(book), index)
    }

    #[test]
    fn test_render_expands_and_converts() {
        let (book, index) = book_with_content("intro", "# Chapter :number[]\n\nSee :xref[tools].");
        let html = render(&book, index).unwrap();
        assert!(html.contains(r#"<h1 id="chapter-3">Chapter 3</h1>"#));
        assert!(html.contains(r#"<a href="../tools/index.html">Appendix A</a>"#));
    }

    #[test]
    fn test_links_table_appended() {
        let mut book = Arc::unwrap_or_clone(book());
        book.links = crate::links::LinkTable::new(vec![crate::links::LinkEntry {
            slug: "node".to_owned(),
            url: "https://nodejs.org/".to_owned(),
        }]);
        let index = book.catalog.get("preface").unwrap().index;
        book.catalog.pages_mut()[index].content = "Use [Node][node].".to_owned();

        let html = render(&Arc::new(book), index).unwrap();
        assert_eq!(html, "<p>Use <a href=\"https://nodejs.org/\">Node</a>.</p>\n");
    }

    #[test]
    fn test_terms_list() {
        let (book, index) = book_with_content(
            "parse",
            "Build an <g key=\"ast\">AST</g> in a <g key=\"repl\">REPL</g>, then another <g key=\"ast\">AST</g>.\n\n::terms",
        );
        let html = render(&book, index).unwrap();
        assert!(html.contains(
            "<p class=\"terms\">Terms defined: \
             <a class=\"gl-ref\" href=\"../glossary/index.html#ast\">abstract syntax tree</a>, \
             <a class=\"gl-ref\" href=\"../glossary/index.html#repl\">read-eval-print loop</a></p>"
        ));
        assert!(!html.contains(TERMS_PLACEHOLDER));
    }

    #[test]
    fn test_terms_empty_without_references() {
        let (book, index) = book_with_content("parse", "No terms.\n\n::terms\n");
        let html = render(&book, index).unwrap();
        assert_eq!(html.trim_end(), "<p>No terms.</p>");
    }

    #[test]
    fn test_unresolved_glossary_reference() {
        let (book, index) = book_with_content(
            "intro",
            "<g key=\"ast\">x</g> <g key=\"gpu\">y</g> <g key=\"cpu\">z</g> <g key=\"gpu\">w</g>",
        );
        let err = render(&book, index).unwrap_err();
        match err {
            BookError::UnresolvedGlossary { page, keys } => {
                assert_eq!(page, "intro");
                assert_eq!(keys, vec!["gpu", "cpu"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directive_failure_names_page() {
        let (book, index) = book_with_content("tools", "::raw[/definitely/missing.txt]");
        let err = render(&book, index).unwrap_err();
        assert!(err.to_string().starts_with("cannot expand page 'tools': "));
        assert_eq!(book.catalog.page(index).unwrap().kind, PageKind::Appendix);
    }
}
