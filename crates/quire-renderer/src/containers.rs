//! Named block containers.
//!
//! ```text
//! ::: callout
//! Markdown content
//! :::
//! ```
//!
//! becomes `<div class="callout">` around the rendered content. Lines are
//! rewritten before parsing, with blank lines around the wrapper tags so the
//! content between them is still parsed as markdown.

use crate::fence::FenceTracker;

/// Container names registered by default.
pub const DEFAULT_CONTAINERS: [&str; 5] = ["callout", "centered", "fixme", "hint", "unindented"];

/// Rewrite container fences for the given names into wrapper `<div>`s.
///
/// Containers with other names, and closing fences that belong to them, are
/// left as written. Containers still open at the end of the text are closed.
pub(crate) fn rewrite_containers(markdown: &str, names: &[String]) -> String {
    let mut fence = FenceTracker::new();
    // One entry per open container: whether we emitted a wrapper for it.
    let mut open: Vec<bool> = Vec::new();
    let mut output = String::with_capacity(markdown.len() + 64);

    for raw_line in markdown.split_inclusive('\n') {
        let body = raw_line.trim_end_matches(['\n', '\r']);

        fence.update(body);
        let marker = if fence.in_fence() {
            None
        } else {
            body.trim().strip_prefix(":::")
        };

        let Some(rest) = marker else {
            output.push_str(raw_line);
            continue;
        };

        let params = rest.trim_start_matches(':').trim();
        let name = params.split_whitespace().next().unwrap_or_default();

        if name.is_empty() {
            match open.pop() {
                Some(true) => output.push_str("\n</div>\n\n"),
                Some(false) | None => output.push_str(raw_line),
            }
        } else if names.iter().any(|known| known == name) {
            open.push(true);
            output.push_str("<div class=\"");
            output.push_str(name);
            output.push_str("\">\n\n");
        } else {
            open.push(false);
            output.push_str(raw_line);
        }
    }

    for wrapped in open.into_iter().rev() {
        if wrapped {
            tracing::warn!("Unclosed block container closed at end of page");
            output.push_str("\n\n</div>\n");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> Vec<String> {
        DEFAULT_CONTAINERS.iter().map(|&n| n.to_owned()).collect()
    }

    #[test]
    fn test_known_container() {
        let output = rewrite_containers("::: hint\nTry *this*.\n:::\nAfter\n", &defaults());
        assert_eq!(
            output,
            "<div class=\"hint\">\n\nTry *this*.\n\n</div>\n\nAfter\n"
        );
    }

    #[test]
    fn test_unknown_container_passthrough() {
        let input = "::: aside\ntext\n:::\n";
        assert_eq!(rewrite_containers(input, &defaults()), input);
    }

    #[test]
    fn test_nested_known_inside_unknown() {
        let input = "::: aside\n::: fixme\nx\n:::\n:::\n";
        let output = rewrite_containers(input, &defaults());
        assert_eq!(
            output,
            "::: aside\n<div class=\"fixme\">\n\nx\n\n</div>\n\n:::\n"
        );
    }

    #[test]
    fn test_fenced_markers_ignored() {
        let input = "```\n::: callout\n```\n";
        assert_eq!(rewrite_containers(input, &defaults()), input);
    }

    #[test]
    fn test_unclosed_container_closed() {
        let output = rewrite_containers("::: centered\nbody", &defaults());
        assert_eq!(output, "<div class=\"centered\">\n\nbody\n\n</div>\n");
    }

    #[test]
    fn test_stray_close_passthrough() {
        assert_eq!(rewrite_containers(":::\n", &defaults()), ":::\n");
    }

    #[test]
    fn test_name_takes_first_word() {
        let output = rewrite_containers("::: callout extra words\n:::\n", &defaults());
        assert!(output.starts_with("<div class=\"callout\">"));
    }
}
