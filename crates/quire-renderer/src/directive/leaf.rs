//! Leaf directive trait.
//!
//! Leaf directives use double-colon syntax: `::name[content]{attrs}`

use super::{DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput};

/// Handler for leaf directives: `::name[content]{attrs}`
///
/// Leaf directives are self-contained blocks such as file inclusions. They
/// return either finished text ([`DirectiveOutput::Html`]) or text that needs
/// another expansion pass ([`DirectiveOutput::Markdown`]).
///
/// Handlers are shared by reference while nested includes are expanded, so
/// `process` takes `&self`.
pub trait LeafDirective: Send + Sync {
    /// Directive name matched against `::name`.
    fn name(&self) -> &str;

    /// Process the leaf directive.
    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError>;
}
