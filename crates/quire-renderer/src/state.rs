//! Rendering state shared across markdown events.

use std::borrow::Cow;

use pulldown_cmark::Alignment;

use crate::slug::{SlugRegistry, slugify};

/// Escape text for HTML element content and attribute values.
///
/// # Examples
///
/// ```
/// use quire_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"a < b & "c""#), "a &lt; b &amp; &quot;c&quot;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Heading being collected: plain text for the anchor, HTML for the body.
#[derive(Debug)]
struct OpenHeading {
    level: u8,
    text: String,
    html: String,
}

/// Tracks the heading under construction and the anchors used so far.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    open: Option<OpenHeading>,
    slugs: SlugRegistry,
}

impl HeadingState {
    pub(crate) fn start(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    pub(crate) fn is_active(&self) -> bool {
        self.open.is_some()
    }

    /// Add text that counts toward the anchor.
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(open) = &mut self.open {
            open.text.push_str(text);
        }
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        if let Some(open) = &mut self.open {
            open.html.push_str(html);
        }
    }

    /// Finish the heading, returning (level, unique id, inner HTML).
    pub(crate) fn complete(&mut self) -> Option<(u8, String, String)> {
        let open = self.open.take()?;
        let id = self.slugs.unique(slugify(&open.text));
        Some((open.level, id, open.html))
    }
}

/// Column alignments and position within the current table.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell += 1;
    }

    pub(crate) fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    pub(crate) fn alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_ids_are_unique() {
        let mut state = HeadingState::default();

        state.start(2);
        state.push_text("Summary");
        state.push_html("Summary");
        assert_eq!(
            state.complete(),
            Some((2, "summary".to_owned(), "Summary".to_owned()))
        );

        state.start(3);
        state.push_text("Summary");
        let (_, id, _) = state.complete().unwrap();
        assert_eq!(id, "summary-1");
    }

    #[test]
    fn test_complete_without_heading() {
        let mut state = HeadingState::default();
        assert!(!state.is_active());
        assert_eq!(state.complete(), None);
    }

    #[test]
    fn test_table_alignment() {
        let mut table = TableState::default();
        table.start(vec![Alignment::None, Alignment::Right]);
        table.start_head();
        assert_eq!(table.cell_tag(), "th");
        assert_eq!(table.alignment_style(), "");
        table.next_cell();
        assert_eq!(table.alignment_style(), r#" style="text-align:right""#);
        table.end_head();
        table.start_row();
        assert_eq!(table.cell_tag(), "td");
    }
}
