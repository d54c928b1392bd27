//! Page numbering.
//!
//! Extras and chapters share one counter (`1`, `2`, ...); appendices are
//! lettered from `A`.

use serde_json::{Map, Value};

use crate::BookError;
use crate::catalog::{Catalog, PageKind};

/// Slug to label mapping in numbering order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Numbering {
    labels: Vec<(String, String)>,
}

impl Numbering {
    /// Number `numbered` slugs from 1 and letter `lettered` slugs from A.
    pub fn new<'a>(
        numbered: impl IntoIterator<Item = &'a str>,
        lettered: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, BookError> {
        let mut labels: Vec<(String, String)> = numbered
            .into_iter()
            .enumerate()
            .map(|(i, slug)| (slug.to_owned(), (i + 1).to_string()))
            .collect();

        let lettered: Vec<&str> = lettered.into_iter().collect();
        if lettered.len() > 26 {
            return Err(BookError::TooManyAppendices {
                count: lettered.len(),
            });
        }
        // Bounded by the check above.
        labels.extend(
            lettered
                .into_iter()
                .zip('A'..='Z')
                .map(|(slug, letter)| (slug.to_owned(), letter.to_string())),
        );

        Ok(Self { labels })
    }

    /// Number the pages of `catalog`.
    pub fn for_catalog(catalog: &Catalog) -> Result<Self, BookError> {
        let numbered = catalog
            .pages()
            .iter()
            .filter(|page| page.kind != PageKind::Appendix)
            .map(|page| page.slug.as_str());
        let lettered = catalog
            .of_kind(PageKind::Appendix)
            .map(|page| page.slug.as_str());
        Self::new(numbered, lettered)
    }

    /// Label of the page with `slug`.
    #[must_use]
    pub fn label(&self, slug: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(key, _)| key == slug)
            .map(|(_, label)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(|(slug, label)| (slug.as_str(), label.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// JSON object of all labels, in numbering order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .labels
            .iter()
            .map(|(slug, label)| (slug.clone(), Value::String(label.clone())))
            .collect();
        Value::Object(map)
    }

    /// Script text defining the labels for client-side code:
    /// `const NUMBERING = {"intro":"1",...}`.
    #[must_use]
    pub fn to_literal(&self) -> String {
        format!("const NUMBERING = {}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels() {
        let numbering = Numbering::new(["preface", "intro", "parse"], ["tools", "refs"]).unwrap();
        assert_eq!(numbering.label("preface"), Some("1"));
        assert_eq!(numbering.label("parse"), Some("3"));
        assert_eq!(numbering.label("tools"), Some("A"));
        assert_eq!(numbering.label("refs"), Some("B"));
        assert_eq!(numbering.label("missing"), None);
        assert_eq!(numbering.len(), 5);
    }

    #[test]
    fn test_literal_keeps_order() {
        let numbering = Numbering::new(["zeta", "alpha"], ["mu"]).unwrap();
        assert_eq!(
            numbering.to_literal(),
            r#"const NUMBERING = {"zeta":"1","alpha":"2","mu":"A"}"#
        );
    }

    #[test]
    fn test_empty() {
        let none: [&str; 0] = [];
        let numbering = Numbering::new(none, none).unwrap();
        assert!(numbering.is_empty());
        assert_eq!(numbering.to_literal(), "const NUMBERING = {}");
    }

    #[test]
    fn test_twenty_six_appendices() {
        let slugs: Vec<String> = (0..26).map(|i| format!("a{i}")).collect();
        let none: [&str; 0] = [];
        let numbering = Numbering::new(none, slugs.iter().map(String::as_str)).unwrap();
        assert_eq!(numbering.label("a25"), Some("Z"));
    }

    #[test]
    fn test_too_many_appendices() {
        let slugs: Vec<String> = (0..27).map(|i| format!("a{i}")).collect();
        let none: [&str; 0] = [];
        let err = Numbering::new(none, slugs.iter().map(String::as_str)).unwrap_err();
        assert!(matches!(err, BookError::TooManyAppendices { count: 27 }));
    }
}
