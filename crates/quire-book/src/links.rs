//! External link table.
//!
//! The links document is a YAML list of `{slug, url}` entries. Every page gets
//! the table appended as markdown reference definitions, so `[text][slug]`
//! works anywhere in the book.

use std::path::Path;

use serde::Deserialize;

use crate::BookError;

/// One external link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkEntry {
    pub slug: String,
    pub url: String,
}

/// Ordered link entries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkTable {
    entries: Vec<LinkEntry>,
}

impl LinkTable {
    #[must_use]
    pub fn new(entries: Vec<LinkEntry>) -> Self {
        Self { entries }
    }

    /// Parse a links document. An empty document gives an empty table.
    pub fn parse(text: &str, path: &Path) -> Result<Self, BookError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries = serde_yaml::from_str(text).map_err(|source| BookError::Links {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    /// Read and parse the links document at `path`.
    pub fn load(path: &Path) -> Result<Self, BookError> {
        let text = std::fs::read_to_string(path).map_err(|e| BookError::io(path, e))?;
        let table = Self::parse(&text, path)?;
        tracing::debug!(path = %path.display(), links = table.entries.len(), "Loaded links");
        Ok(table)
    }

    #[must_use]
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Markdown reference definitions, one `[slug]: url` per line.
    #[must_use]
    pub fn reference_definitions(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("[{}]: {}", entry.slug, entry.url))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
