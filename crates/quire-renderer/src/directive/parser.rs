//! Directive syntax parsing.
//!
//! Recognises inline `:name[content]{attrs}` and leaf `::name[content]{attrs}`
//! directives. Runs of three or more colons belong to block containers and
//! are never parsed here, and neither is anything inside a backtick code span.

use std::ops::Range;

use super::DirectiveArgs;

/// Directive flavour, decided by the number of leading colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectiveKind {
    /// `:name`
    Inline,
    /// `::name`
    Leaf,
}

/// Directive found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDirective {
    pub kind: DirectiveKind,
    pub name: String,
    pub args: DirectiveArgs,
    /// Byte offset of the first colon.
    pub start: usize,
    /// Byte offset one past the directive.
    pub end: usize,
}

/// Find the first directive in `line`.
///
/// Colons that do not start a directive (`Note:`, `https://`, `a::b`) are
/// skipped and scanning continues after them. Colons inside a code span
/// (`` `:root` ``) are skipped as well.
pub(crate) fn parse_line(line: &str) -> Option<ParsedDirective> {
    let bytes = line.as_bytes();
    let spans = code_spans(line);
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find(':') {
        let start = search_from + offset;
        if let Some(span) = spans.iter().find(|span| span.contains(&start)) {
            search_from = span.end;
            continue;
        }
        let colon_count = bytes[start..].iter().take_while(|&&b| b == b':').count();
        search_from = start + colon_count;

        // A directive never continues a word: `std::fs`, `a:b`.
        let preceded_by_word = line[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if preceded_by_word {
            continue;
        }

        let kind = match colon_count {
            1 => DirectiveKind::Inline,
            2 => DirectiveKind::Leaf,
            _ => continue,
        };

        if let Some(directive) = parse_at(line, start, colon_count, kind) {
            return Some(directive);
        }
    }

    None
}

fn parse_at(
    line: &str,
    start: usize,
    colon_count: usize,
    kind: DirectiveKind,
) -> Option<ParsedDirective> {
    let mut pos = start + colon_count;
    let after_colons = &line[pos..];

    let name_end = after_colons
        .find(|c: char| !is_name_char(c))
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if name.is_empty() || !name.starts_with(|c: char| c.is_alphabetic()) {
        return None;
    }
    pos += name_end;

    let (content, content_consumed) = parse_delimited(&line[pos..], '[', ']');
    pos += content_consumed;

    let (attrs, attrs_consumed) = parse_delimited(&line[pos..], '{', '}');
    pos += attrs_consumed;

    Some(ParsedDirective {
        kind,
        name: name.to_owned(),
        args: DirectiveArgs::parse(content, attrs),
        start,
        end: pos,
    })
}

/// Byte ranges of the backtick code spans in `line`.
///
/// A run of backticks opens a span that the next run of the same length
/// closes. A run without a partner is literal text.
fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let run_at = |pos: usize| bytes[pos..].iter().take_while(|&&b| b == b'`').count();

    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(offset) = line[pos..].find('`') {
        let open = pos + offset;
        let len = run_at(open);
        pos = open + len;

        let mut search = pos;
        while let Some(offset) = line[search..].find('`') {
            let close = search + offset;
            let close_len = run_at(close);
            if close_len == len {
                spans.push(open..close + close_len);
                pos = close + close_len;
                break;
            }
            search = close + close_len;
        }
    }
    spans
}

/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Parse a bracketed section, handling nesting and quoted strings.
///
/// Returns (inner text, bytes consumed). An unclosed section consumes nothing.
fn parse_delimited(s: &str, open: char, close: char) -> (&str, usize) {
    if !s.starts_with(open) {
        return ("", 0);
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if open == '{' => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return (&s[open.len_utf8()..i], i + close.len_utf8());
                }
            }
            _ => {}
        }
    }

    ("", 0)
}
