//! Page loading.
//!
//! Reads every page source before anything is expanded, so cross-references
//! can see the fields of all pages.

use quire_renderer::unclosed_fence;

use crate::BookError;
use crate::catalog::{Catalog, PageRecord};
use crate::frontmatter::split_front_matter;

/// Header and footer include targets wrapped around every page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFrame {
    pub header: String,
    pub footer: String,
}

impl PageFrame {
    #[must_use]
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// `body` between the header and footer include directives.
    ///
    /// A code fence left open by `body` is closed first, so the footer is
    /// still expanded.
    #[must_use]
    pub fn wrap(&self, body: &str) -> String {
        let closing = unclosed_fence(body)
            .map(|fence| format!("\n{fence}"))
            .unwrap_or_default();
        format!(
            "::include[{}]\n{body}{closing}\n::include[{}]",
            self.header, self.footer
        )
    }
}

/// Load the source of every page in `catalog`.
pub fn load_pages(catalog: &mut Catalog, frame: &PageFrame) -> Result<(), BookError> {
    for page in catalog.pages_mut() {
        load_page(page, frame)?;
    }
    tracing::debug!(pages = catalog.len(), "Loaded page sources");
    Ok(())
}

/// Read one page, merge its front matter and set its framed content.
///
/// Front matter keys override keys from the page descriptor.
pub fn load_page(page: &mut PageRecord, frame: &PageFrame) -> Result<(), BookError> {
    let text =
        std::fs::read_to_string(&page.source).map_err(|e| BookError::io(&page.source, e))?;
    let document = split_front_matter(&text).map_err(|message| BookError::FrontMatter {
        path: page.source.clone(),
        message,
    })?;

    if unclosed_fence(document.body).is_some() {
        tracing::warn!(path = %page.source.display(), "Page ends inside a code fence");
    }
    page.fields.extend(document.fields);
    page.content = frame.wrap(document.body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PageKind;
    use pretty_assertions::assert_eq;
    use quire_config::PageDescriptor;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_wrap() {
        let frame = PageFrame::new("/_inc/head.html", "/_inc/foot.html");
        assert_eq!(
            frame.wrap("# Intro"),
            "::include[/_inc/head.html]\n# Intro\n::include[/_inc/foot.html]"
        );
    }

    #[test]
    fn test_wrap_closes_open_fence() {
        let frame = PageFrame::new("/h.html", "/f.html");
        assert_eq!(
            frame.wrap("```js\nconst x = 1\n"),
            "::include[/h.html]\n```js\nconst x = 1\n\n```\n::include[/f.html]"
        );
    }

    #[test]
    fn test_load_pages_merges_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("intro")).unwrap();
        fs::write(
            dir.path().join("intro/index.md"),
            "---\ntitle: From Page\nlede: Hello\n---\nBody text\n",
        )
        .unwrap();

        let mut descriptor = PageDescriptor {
            slug: Some("intro".to_owned()),
            ..PageDescriptor::default()
        };
        descriptor
            .fields
            .insert("title".to_owned(), json!("From Config"));
        descriptor.fields.insert("tag".to_owned(), json!("kept"));

        let descriptors = [descriptor];
        let mut catalog =
            Catalog::build(dir.path(), &[(PageKind::Chapter, descriptors.as_slice())]).unwrap();
        load_pages(&mut catalog, &PageFrame::new("/h.html", "/f.html")).unwrap();

        let page = catalog.get("intro").unwrap();
        assert_eq!(page.title(), Some("From Page"));
        assert_eq!(page.fields["lede"], json!("Hello"));
        assert_eq!(page.fields["tag"], json!("kept"));
        assert_eq!(page.content, "::include[/h.html]\nBody text\n\n::include[/f.html]");
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let descriptors = [PageDescriptor {
            slug: Some("ghost".to_owned()),
            ..PageDescriptor::default()
        }];
        let mut catalog =
            Catalog::build(dir.path(), &[(PageKind::Extra, descriptors.as_slice())]).unwrap();
        let err = load_pages(&mut catalog, &PageFrame::new("/h", "/f")).unwrap_err();
        assert!(matches!(err, BookError::Io { ref path, .. } if path.ends_with("ghost/index.md")));
    }

    #[test]
    fn test_bad_front_matter_names_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), "---\n[oops\n---\n").unwrap();
        let descriptors = [PageDescriptor {
            slug: Some("bad".to_owned()),
            source: Some("bad.md".to_owned()),
            ..PageDescriptor::default()
        }];
        let mut catalog =
            Catalog::build(dir.path(), &[(PageKind::Extra, descriptors.as_slice())]).unwrap();
        let err = load_pages(&mut catalog, &PageFrame::new("/h", "/f")).unwrap_err();
        assert!(matches!(err, BookError::FrontMatter { ref path, .. } if path.ends_with("bad.md")));
    }
}
