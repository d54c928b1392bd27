//! Inline directive trait.
//!
//! Inline directives use single-colon syntax: `:name[content]{attrs}`

use super::{DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput};

/// Handler for inline directives: `:name[content]{attrs}`
///
/// Inline directives produce short values inside running text or attribute
/// values, such as a chapter number or a relative path.
///
/// # Example
///
/// ```
/// use quire_renderer::directive::{
///     DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput, InlineDirective,
/// };
///
/// struct KbdDirective;
///
/// impl InlineDirective for KbdDirective {
///     fn name(&self) -> &str { "kbd" }
///
///     fn process(
///         &self,
///         args: DirectiveArgs,
///         _ctx: &DirectiveContext<'_>,
///     ) -> Result<DirectiveOutput, DirectiveError> {
///         Ok(DirectiveOutput::html(format!("<kbd>{}</kbd>", args.content)))
///     }
/// }
/// ```
pub trait InlineDirective: Send + Sync {
    /// Directive name matched against `:name`.
    fn name(&self) -> &str;

    /// Process the inline directive.
    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError>;
}
