//! Document catalog.
//!
//! Turns the `extras`, `chapters` and `appendices` descriptor lists into one
//! ordered list of [`PageRecord`]s with resolved paths and sequence links.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quire_config::{Config, PageDescriptor};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::BookError;

/// Which configuration list a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Extra,
    Chapter,
    Appendix,
}

impl PageKind {
    /// Name of the configuration list.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            Self::Extra => "extras",
            Self::Chapter => "chapters",
            Self::Appendix => "appendices",
        }
    }
}

/// An exercise listed under a chapter's `exercises` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Exercise {
    pub slug: String,
    pub title: String,
}

/// One page of the book.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub slug: String,
    /// Source document.
    pub source: PathBuf,
    /// Output document, relative to the output directory, `/`-separated.
    pub output: String,
    /// Position in the catalog.
    pub index: usize,
    pub kind: PageKind,
    /// Catalog index of the preceding chapter or appendix.
    pub previous: Option<usize>,
    /// Catalog index of the following chapter or appendix.
    pub next: Option<usize>,
    /// Descriptor keys and front matter.
    pub fields: Map<String, Value>,
    /// Body wrapped in header and footer includes, set by the loader.
    pub content: String,
}

impl PageRecord {
    #[must_use]
    pub fn is_chapter(&self) -> bool {
        self.kind == PageKind::Chapter
    }

    /// Whether the page takes part in previous/next navigation.
    #[must_use]
    pub fn is_numbered(&self) -> bool {
        self.kind != PageKind::Extra
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Exercises declared for this page, in order.
    ///
    /// A page without an `exercises` key has none.
    pub fn exercises(&self) -> Result<Vec<Exercise>, serde_json::Error> {
        match self.fields.get("exercises") {
            Some(value) => Vec::<Exercise>::deserialize(value),
            None => Ok(Vec::new()),
        }
    }

    /// Relative path from this page's output location to the site root.
    #[must_use]
    pub fn to_root(&self) -> String {
        to_root(&self.output)
    }
}

/// Relative path from the directory of `output` to the site root.
///
/// `index.html` gives `.`, `intro/index.html` gives `..` and
/// `a/b/index.html` gives `../..`.
#[must_use]
pub fn to_root(output: &str) -> String {
    let dir = match output.rfind('/') {
        Some(pos) => &output[..pos],
        None => return ".".to_owned(),
    };
    let depth = dir
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .count();
    if depth == 0 {
        ".".to_owned()
    } else {
        vec![".."; depth].join("/")
    }
}

/// All pages in configured order: extras, chapters, appendices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    pages: Vec<PageRecord>,
}

impl Catalog {
    /// Build the catalog from the page lists in `config`.
    pub fn from_config(config: &Config) -> Result<Self, BookError> {
        Self::build(
            &config.paths.root_dir,
            &[
                (PageKind::Extra, config.extras.as_slice()),
                (PageKind::Chapter, config.chapters.as_slice()),
                (PageKind::Appendix, config.appendices.as_slice()),
            ],
        )
    }

    /// Build the catalog from descriptor lists, resolving sources under `root`.
    pub fn build(
        root: &Path,
        sections: &[(PageKind, &[PageDescriptor])],
    ) -> Result<Self, BookError> {
        let mut pages = Vec::new();
        let mut seen = HashSet::new();

        for (kind, descriptors) in sections {
            for (position, descriptor) in descriptors.iter().enumerate() {
                let slug = descriptor
                    .slug
                    .as_deref()
                    .filter(|slug| !slug.is_empty())
                    .ok_or(BookError::MissingSlug {
                        section: kind.section(),
                        position: position + 1,
                    })?;
                if !seen.insert(slug.to_owned()) {
                    return Err(BookError::DuplicateSlug(slug.to_owned()));
                }

                let source = match &descriptor.source {
                    Some(source) => root.join(source),
                    None => root.join(slug).join("index.md"),
                };
                let output = descriptor
                    .output
                    .clone()
                    .unwrap_or_else(|| format!("{slug}/index.html"));

                pages.push(PageRecord {
                    slug: slug.to_owned(),
                    source,
                    output,
                    index: pages.len(),
                    kind: *kind,
                    previous: None,
                    next: None,
                    fields: descriptor.fields.clone(),
                    content: String::new(),
                });
            }
        }

        link_numbered(&mut pages);
        Ok(Self { pages })
    }

    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub(crate) fn pages_mut(&mut self) -> &mut [PageRecord] {
        &mut self.pages
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.slug == slug)
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<&PageRecord> {
        self.pages.get(index)
    }

    #[must_use]
    pub fn previous(&self, page: &PageRecord) -> Option<&PageRecord> {
        page.previous.and_then(|index| self.page(index))
    }

    #[must_use]
    pub fn next(&self, page: &PageRecord) -> Option<&PageRecord> {
        page.next.and_then(|index| self.page(index))
    }

    /// Pages of one kind, in order.
    pub fn of_kind(&self, kind: PageKind) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(move |page| page.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Chain chapters and appendices together; extras stay unlinked.
fn link_numbered(pages: &mut [PageRecord]) {
    let numbered: Vec<usize> = pages
        .iter()
        .filter(|page| page.is_numbered())
        .map(|page| page.index)
        .collect();

    for (pos, &index) in numbered.iter().enumerate() {
        let page = &mut pages[index];
        page.previous = pos.checked_sub(1).map(|prev| numbered[prev]);
        page.next = numbered.get(pos + 1).copied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn descriptor(slug: &str) -> PageDescriptor {
        PageDescriptor {
            slug: Some(slug.to_owned()),
            ..PageDescriptor::default()
        }
    }

    fn build(sections: &[(PageKind, Vec<PageDescriptor>)]) -> Result<Catalog, BookError> {
        let borrowed: Vec<(PageKind, &[PageDescriptor])> = sections
            .iter()
            .map(|(kind, descriptors)| (*kind, descriptors.as_slice()))
            .collect();
        Catalog::build(Path::new("/book"), &borrowed)
    }

    fn sample() -> Catalog {
        build(&[
            (PageKind::Extra, vec![descriptor("preface")]),
            (PageKind::Chapter, vec![descriptor("intro"), descriptor("parse")]),
            (PageKind::Appendix, vec![descriptor("tools")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let catalog = sample();
        let intro = catalog.get("intro").unwrap();
        assert_eq!(intro.source, PathBuf::from("/book/intro/index.md"));
        assert_eq!(intro.output, "intro/index.html");
        assert_eq!(intro.index, 1);
        assert!(intro.is_chapter());
        assert!(!catalog.get("preface").unwrap().is_chapter());
        assert!(!catalog.get("tools").unwrap().is_chapter());
    }

    #[test]
    fn test_sequence_links_skip_extras() {
        let catalog = sample();
        let slugs = |index: Option<usize>| index.map(|i| catalog.pages()[i].slug.clone());

        let preface = catalog.get("preface").unwrap();
        assert_eq!((preface.previous, preface.next), (None, None));

        let intro = catalog.get("intro").unwrap();
        assert_eq!(slugs(intro.previous), None);
        assert_eq!(slugs(intro.next), Some("parse".to_owned()));

        let parse = catalog.get("parse").unwrap();
        assert_eq!(catalog.previous(parse).unwrap().slug, "intro");
        assert_eq!(catalog.next(parse).unwrap().slug, "tools");

        let tools = catalog.get("tools").unwrap();
        assert_eq!(slugs(tools.previous), Some("parse".to_owned()));
        assert_eq!(tools.next, None);
    }

    #[test]
    fn test_explicit_paths_and_fields() {
        let mut home = descriptor("home");
        home.source = Some("index.md".to_owned());
        home.output = Some("index.html".to_owned());
        home.fields.insert("title".to_owned(), json!("Home"));

        let catalog = build(&[(PageKind::Extra, vec![home])]).unwrap();
        let page = catalog.get("home").unwrap();
        assert_eq!(page.source, PathBuf::from("/book/index.md"));
        assert_eq!(page.output, "index.html");
        assert_eq!(page.title(), Some("Home"));
    }

    #[test]
    fn test_missing_slug() {
        let err = build(&[(
            PageKind::Chapter,
            vec![descriptor("intro"), PageDescriptor::default()],
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            BookError::MissingSlug {
                section: "chapters",
                position: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_slug_across_sections() {
        let err = build(&[
            (PageKind::Chapter, vec![descriptor("intro")]),
            (PageKind::Appendix, vec![descriptor("intro")]),
        ])
        .unwrap_err();
        assert!(matches!(err, BookError::DuplicateSlug(ref slug) if slug == "intro"));
    }

    #[test]
    fn test_exercises() {
        let mut intro = descriptor("intro");
        intro.fields.insert(
            "exercises".to_owned(),
            json!([{"slug": "loops", "title": "Loops"}, {"slug": "maps", "title": "Maps"}]),
        );
        let catalog = build(&[(PageKind::Chapter, vec![intro])]).unwrap();
        let exercises = catalog.get("intro").unwrap().exercises().unwrap();
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[1].title, "Maps");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_to_root() {
        assert_eq!(to_root("index.html"), ".");
        assert_eq!(to_root("./index.html"), ".");
        assert_eq!(to_root("intro/index.html"), "..");
        assert_eq!(to_root("a/b/index.html"), "../..");
    }
}
