//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::containers::{DEFAULT_CONTAINERS, rewrite_containers};
use crate::directive::Replacements;
use crate::state::{HeadingState, TableState, escape_html};

/// Markdown renderer producing HTML fragments.
///
/// Raw HTML passes through untouched, every heading gets a unique anchor id,
/// and named `:::` block containers become `<div>` wrappers.
///
/// # Example
///
/// ```
/// use quire_renderer::MarkdownRenderer;
///
/// let html = MarkdownRenderer::new().render("## Big Picture\n\n::: hint\nRead *this*.\n:::\n");
/// assert!(html.contains(r#"<h2 id="big-picture">Big Picture</h2>"#));
/// assert!(html.contains(r#"<div class="hint">"#));
/// assert!(html.contains("<em>this</em>"));
/// ```
pub struct MarkdownRenderer {
    containers: Vec<String>,
    path_rewrite: Option<(String, String)>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with the default block containers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: DEFAULT_CONTAINERS.iter().map(|&n| n.to_owned()).collect(),
            path_rewrite: None,
        }
    }

    /// Register an additional block container name.
    #[must_use]
    pub fn with_container(mut self, name: impl Into<String>) -> Self {
        self.containers.push(name.into());
        self
    }

    /// Replace every occurrence of `from` in the rendered HTML with `to`.
    ///
    /// Used to publish machine-specific paths under a canonical directory.
    #[must_use]
    pub fn with_path_rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.path_rewrite = Some((from.into(), to.into()));
        self
    }

    /// Parser options: tables and strikethrough.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let source = rewrite_containers(markdown, &self.containers);
        let parser = Parser::new_ext(&source, Self::parser_options());

        let mut writer = HtmlWriter::default();
        for event in parser {
            writer.process_event(event);
        }
        let mut html = writer.output;

        if let Some((from, to)) = &self.path_rewrite {
            let mut replacements = Replacements::new();
            replacements.add(from.as_str(), to.as_str());
            replacements.apply(&mut html);
        }

        html
    }
}

/// Event-by-event HTML output for one document.
#[derive(Default)]
struct HtmlWriter {
    output: String,
    heading: HeadingState,
    table: TableState,
    /// Language of the open code block; `Some(None)` for a block without one.
    code: Option<Option<String>>,
    code_buffer: String,
    /// Alt text collected for the open image.
    image_alt: Option<String>,
    pending_image: Option<(String, String)>,
}

impl HtmlWriter {
    /// Push inline content to the heading buffer or output.
    fn push_inline(&mut self, content: &str) {
        if self.image_alt.is_some() {
            // Markup inside alt text is dropped
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.push_inline("\n"),
            Event::HardBreak => self.push_inline("<br />\n"),
            Event::Rule => self.output.push_str("<hr />\n"),
            Event::TaskListMarker(checked) => {
                let state = if checked { " checked=\"\"" } else { "" };
                let _ = write!(
                    self.output,
                    r#"<input disabled="" type="checkbox"{state} />"#
                );
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in parser options
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => self.heading.start(heading_level_to_num(level)),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(lang);
                self.code_buffer.clear();
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>\n"),
            Tag::List(Some(start)) => {
                let _ = writeln!(self.output, r#"<ol start="{start}">"#);
            }
            Tag::List(None) => self.output.push_str("<ul>\n"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>\n");
            }
            Tag::TableCell => {
                let _ = write!(
                    self.output,
                    "<{}{}>",
                    self.table.cell_tag(),
                    self.table.alignment_style()
                );
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    let _ = write!(link, r#" title="{}""#, escape_html(&title));
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image_alt = Some(String::new());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete() {
                    let _ = writeln!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let lang = self.code.take().flatten();
                code_block(lang.as_deref(), &self.code_buffer, &mut self.output);
                self.code_buffer.clear();
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::Table => self.output.push_str("</tbody>\n</table>\n"),
            TagEnd::TableHead => {
                self.output.push_str("</tr>\n</thead>\n<tbody>\n");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                let _ = writeln!(self.output, "</{}>", self.table.cell_tag());
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image_alt.take().unwrap_or_default();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut img = format!(
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    if !title.is_empty() {
                        let _ = write!(img, r#" title="{}""#, escape_html(&title));
                    }
                    img.push_str(" />");
                    self.push_inline(&img);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_some() {
            self.code_buffer.push_str(text);
        } else if let Some(alt) = &mut self.image_alt {
            alt.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(alt) = &mut self.image_alt {
            alt.push_str(code);
            return;
        }
        self.heading.push_text(code);
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }
}

/// Write a code block with an optional `language-*` class.
fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    match lang {
        Some(lang) => {
            let _ = writeln!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            );
        }
        None => {
            let _ = writeln!(out, "<pre><code>{}</code></pre>", escape_html(content));
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_heading_with_id() {
        assert_eq!(
            render("## Section Title"),
            "<h2 id=\"section-title\">Section Title</h2>\n"
        );
    }

    #[test]
    fn test_every_heading_level_anchored() {
        let html = render("# Top\n\n###### Deep");
        assert!(html.contains(r#"<h1 id="top">Top</h1>"#));
        assert!(html.contains(r#"<h6 id="deep">Deep</h6>"#));
    }

    #[test]
    fn test_duplicate_headings() {
        let html = render("## FAQ\n\n## FAQ\n\n## FAQ");
        assert!(html.contains(r#"<h2 id="faq">FAQ</h2>"#));
        assert!(html.contains(r#"<h2 id="faq-1">FAQ</h2>"#));
        assert!(html.contains(r#"<h2 id="faq-2">FAQ</h2>"#));
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let html = render("## The `walk` *function*");
        assert_eq!(
            html,
            "<h2 id=\"the-walk-function\">The <code>walk</code> <em>function</em></h2>\n"
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let html = render("```js\nconst a = 1 < 2\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-js\">const a = 1 &lt; 2\n</code></pre>\n"
        );
    }

    #[test]
    fn test_raw_html_passthrough() {
        let input = "<pre title=\"a.js\"><code class=\"language-js\">a &amp;&amp; b\n\nc</code></pre>\n";
        let html = render(input);
        assert_eq!(html, input);
    }

    #[test]
    fn test_glossary_reference_tag_passthrough() {
        let html = render("An <g key=\"ast\">abstract syntax tree</g> is built.");
        assert_eq!(
            html,
            "<p>An <g key=\"ast\">abstract syntax tree</g> is built.</p>\n"
        );
    }

    #[test]
    fn test_reference_links_resolve() {
        let html = render("See [Node][node].\n\n[node]: https://nodejs.org/");
        assert_eq!(html, "<p>See <a href=\"https://nodejs.org/\">Node</a>.</p>\n");
    }

    #[test]
    fn test_callout_container() {
        let html = render("::: callout\n### Why?\n\nBecause.\n:::\n");
        assert_eq!(
            html,
            "<div class=\"callout\">\n<h3 id=\"why\">Why?</h3>\n<p>Because.</p>\n</div>\n"
        );
    }

    #[test]
    fn test_table() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert!(html.contains("<th style=\"text-align:left\">a</th>"));
        assert!(html.contains("<td style=\"text-align:right\">2</td>"));
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~"), "<p><s>gone</s></p>\n");
    }

    #[test]
    fn test_image_alt_text() {
        let html = render("![A *diagram*](fig.svg \"Figure\")");
        assert_eq!(
            html,
            "<p><img src=\"fig.svg\" alt=\"A diagram\" title=\"Figure\" /></p>\n"
        );
    }

    #[test]
    fn test_lists() {
        let html = render("1. one\n2. two\n\n- x");
        assert!(html.contains("<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n"));
        assert!(html.contains("<ul>\n<li>x</li>\n</ul>\n"));
    }

    #[test]
    fn test_path_rewrite() {
        let html = MarkdownRenderer::new()
            .with_path_rewrite("/home/me/book", "/u/quire")
            .render("Run `/home/me/book/bin/tool` in /home/me/book.");
        assert!(html.contains("<code>/u/quire/bin/tool</code>"));
        assert!(html.contains("in /u/quire."));
        assert!(!html.contains("/home/me"));
    }

    #[test]
    fn test_custom_container() {
        let html = MarkdownRenderer::new()
            .with_container("aside")
            .render("::: aside\nx\n:::\n");
        assert!(html.starts_with("<div class=\"aside\">"));
    }
}
