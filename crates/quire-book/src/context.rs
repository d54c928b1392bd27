//! Read-only state shared by every page expansion.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::catalog::{Catalog, PageRecord};
use crate::glossary::Glossary;
use crate::links::LinkTable;
use crate::numbering::Numbering;

/// Book-wide tables, built once before any page is expanded.
#[derive(Debug, Clone)]
pub struct BookContext {
    pub catalog: Catalog,
    pub glossary: Glossary,
    pub links: LinkTable,
    pub numbering: Numbering,
    /// Site-wide values from unrecognised configuration keys.
    pub site: Map<String, Value>,
    /// Directory holding page sources.
    pub root_dir: PathBuf,
    /// Slug of the page that defines glossary terms.
    pub glossary_page: String,
}

/// The page currently being expanded, plus the book it belongs to.
#[derive(Debug, Clone)]
pub struct PageScope {
    book: Arc<BookContext>,
    index: usize,
    to_root: String,
}

impl PageScope {
    /// Scope for the catalog page at `index`, if there is one.
    #[must_use]
    pub fn new(book: Arc<BookContext>, index: usize) -> Option<Self> {
        let to_root = book.catalog.page(index)?.to_root();
        Some(Self {
            book,
            index,
            to_root,
        })
    }

    /// Scopes for every page, in catalog order.
    pub fn all(book: &Arc<BookContext>) -> impl Iterator<Item = Self> + '_ {
        book.catalog.pages().iter().map(move |page| Self {
            book: Arc::clone(book),
            index: page.index,
            to_root: page.to_root(),
        })
    }

    #[must_use]
    pub fn book(&self) -> &BookContext {
        &self.book
    }

    #[must_use]
    pub fn page(&self) -> &PageRecord {
        // The index was checked in `new` and the catalog never changes.
        &self.book.catalog.pages()[self.index]
    }

    /// Relative path from the page to the site root.
    #[must_use]
    pub fn to_root(&self) -> &str {
        &self.to_root
    }

    /// Link from this page to `output`, a path relative to the site root.
    #[must_use]
    pub fn href(&self, output: &str) -> String {
        format!("{}/{output}", self.to_root)
    }
}
