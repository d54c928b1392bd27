//! Glossary index and term reference scanning.
//!
//! The glossary document defines terms as
//! `<dt id="KEY" class="glossary">TEXT</dt>`; pages cite them with
//! `<g key="KEY">...</g>`.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::BookError;

static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<dt\s+id="(.+?)"\s+class="glossary">(.+?)</dt>"#).unwrap());

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<g\s+key="(.+?)">"#).unwrap());

/// Mapping from glossary key to display text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Glossary {
    terms: HashMap<String, String>,
}

impl Glossary {
    /// Extract every definition from a glossary document.
    ///
    /// Text that is not a definition is ignored. A key defined twice is an
    /// error.
    pub fn parse(text: &str) -> Result<Self, BookError> {
        let mut terms = HashMap::new();
        for caps in DEFINITION_RE.captures_iter(text) {
            let key = caps[1].to_owned();
            if terms.contains_key(&key) {
                return Err(BookError::DuplicateGlossaryKey(key));
            }
            terms.insert(key, caps[2].to_owned());
        }
        Ok(Self { terms })
    }

    /// Read and parse the glossary document at `path`.
    pub fn load(path: &Path) -> Result<Self, BookError> {
        let text = std::fs::read_to_string(path).map_err(|e| BookError::io(path, e))?;
        let glossary = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), terms = glossary.len(), "Loaded glossary");
        Ok(glossary)
    }

    /// Display text for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.terms.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.terms.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Keys of every `<g key="...">` reference in `text`.
///
/// One entry per occurrence, in order of appearance. Repeated references are
/// kept; use [`unique_references`] for display.
#[must_use]
pub fn glossary_references(text: &str) -> Vec<String> {
    REFERENCE_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_owned())
        .collect()
}

/// Drop repeats from a reference list, keeping first-seen order.
#[must_use]
pub fn unique_references(references: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    references
        .iter()
        .map(String::as_str)
        .filter(|key| seen.insert(*key))
        .collect()
}
