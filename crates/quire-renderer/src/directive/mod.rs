//! Directive expansion for book sources.
//!
//! Page sources embed directives that are resolved to text before markdown
//! rendering:
//!
//! - **Inline** ([`InlineDirective`]): `:name[content]{attrs}`, e.g. `:number[intro]`
//! - **Leaf** ([`LeafDirective`]): `::name[content]{attrs}`, e.g. `::slice[walk.js]{tag=loop}`
//!
//! Block containers (`::: callout`) are not directives here; the markdown
//! renderer turns them into wrapper elements.
//!
//! Handlers receive a [`DirectiveContext`] that can expand nested text with
//! the same processor, so an included file may include further files up to
//! the configured depth.
//!
//! # Example
//!
//! ```
//! use quire_renderer::directive::{
//!     DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput,
//!     DirectiveProcessor, DirectiveProcessorConfig, LeafDirective,
//! };
//!
//! struct Greeting;
//!
//! impl LeafDirective for Greeting {
//!     fn name(&self) -> &str { "greeting" }
//!
//!     fn process(
//!         &self,
//!         args: DirectiveArgs,
//!         ctx: &DirectiveContext<'_>,
//!     ) -> Result<DirectiveOutput, DirectiveError> {
//!         ctx.expand(&format!("Hello, ::name[{}]", args.content))
//!             .map(DirectiveOutput::html)
//!     }
//! }
//!
//! struct Name;
//!
//! impl LeafDirective for Name {
//!     fn name(&self) -> &str { "name" }
//!
//!     fn process(
//!         &self,
//!         args: DirectiveArgs,
//!         _ctx: &DirectiveContext<'_>,
//!     ) -> Result<DirectiveOutput, DirectiveError> {
//!         Ok(DirectiveOutput::html(args.content.to_uppercase()))
//!     }
//! }
//!
//! let processor = DirectiveProcessor::with_config(DirectiveProcessorConfig::new())
//!     .with_leaf(Greeting)
//!     .with_leaf(Name);
//!
//! assert_eq!(processor.process("::greeting[reader]").unwrap(), "Hello, READER");
//! ```

mod args;
mod context;
mod error;
mod inline;
mod leaf;
mod output;
mod parser;
mod processor;
mod replacements;

pub use args::DirectiveArgs;
pub use context::DirectiveContext;
pub use error::DirectiveError;
pub use inline::InlineDirective;
pub use leaf::LeafDirective;
pub use output::DirectiveOutput;
pub use processor::{DirectiveProcessor, DirectiveProcessorConfig, ReadFileFn};
pub use replacements::Replacements;
