//! Directive expansion and markdown rendering for quire.
//!
//! Two stages turn a page source into HTML:
//!
//! 1. [`directive::DirectiveProcessor`] resolves `:name[...]` and `::name[...]`
//!    directives, recursing into the files they include.
//! 2. [`MarkdownRenderer`] renders the expanded text with heading anchors and
//!    named block containers.
//!
//! # Example
//!
//! ```
//! use quire_renderer::MarkdownRenderer;
//! use quire_renderer::directive::DirectiveProcessor;
//!
//! let expanded = DirectiveProcessor::new().process("# Intro\n\n:unknown[kept]").unwrap();
//! let html = MarkdownRenderer::new().render(&expanded);
//! assert!(html.contains(r#"<h1 id="intro">Intro</h1>"#));
//! assert!(html.contains(":unknown[kept]"));
//! ```

mod containers;
pub mod directive;
mod fence;
mod renderer;
mod slug;
mod state;

pub use containers::DEFAULT_CONTAINERS;
pub use fence::unclosed_fence;
pub use renderer::MarkdownRenderer;
pub use slug::slugify;
pub use state::escape_html;
