//! Heading anchor slugs.

use std::collections::HashSet;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves alone, besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turn heading text into an anchor.
///
/// Trims and lowercases the text, drops every character that is neither a
/// space nor an ASCII word character, turns space runs into single hyphens,
/// then percent-encodes the result.
///
/// # Examples
///
/// ```
/// use quire_renderer::slugify;
///
/// assert_eq!(slugify("  Hello, World! "), "hello-world");
/// assert_eq!(slugify("What's `next`?"), "whats-next");
/// assert_eq!(slugify("snake_case  and   spaces"), "snake_case-and-spaces");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_space = false;

    for c in lowered.chars() {
        if c == ' ' {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            in_space = false;
        }
    }

    utf8_percent_encode(&slug, URI_COMPONENT).to_string()
}

/// Hands out unique anchors within one page.
///
/// The first use of a slug is returned as-is; repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub(crate) struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub(crate) fn unique(&mut self, slug: String) -> String {
        let mut candidate = slug.clone();
        let mut suffix = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{slug}-{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
