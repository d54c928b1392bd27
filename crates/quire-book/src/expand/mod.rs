//! Template expansion for book pages.
//!
//! [`page_processor`] builds a [`DirectiveProcessor`] for one page with every
//! book directive registered. File directives live in [`files`], directives
//! that read book tables in [`book`], and the text transforms they share in
//! [`source`].

pub mod book;
pub mod files;
pub mod source;

use std::sync::Arc;

use quire_renderer::directive::{DirectiveProcessor, DirectiveProcessorConfig};

use crate::context::PageScope;

pub use book::TERMS_PLACEHOLDER;

/// Processor that expands the page in `scope`.
///
/// Relative paths resolve against the page source's directory and
/// `/`-prefixed paths against the book's root directory.
#[must_use]
pub fn page_processor(scope: &Arc<PageScope>, max_include_depth: usize) -> DirectiveProcessor {
    let config = DirectiveProcessorConfig::new()
        .with_base_dir(&scope.book().root_dir)
        .with_root_dir(&scope.book().root_dir)
        .with_source_path(&scope.page().source)
        .with_max_include_depth(max_include_depth);

    DirectiveProcessor::with_config(config)
        .with_leaf(files::IncludeDirective)
        .with_leaf(files::RawDirective)
        .with_leaf(files::EmbedDirective)
        .with_leaf(files::FileDirective)
        .with_leaf(files::SliceDirective)
        .with_leaf(files::EraseDirective)
        .with_leaf(book::ExerciseDirective::new(Arc::clone(scope)))
        .with_leaf(book::ExercisesDirective::new(Arc::clone(scope)))
        .with_leaf(book::NumberingDirective::new(Arc::clone(scope)))
        .with_leaf(book::TermsDirective)
        .with_inline(files::CodeClassDirective)
        .with_inline(book::NumberDirective::new(Arc::clone(scope)))
        .with_inline(book::XrefDirective::new(Arc::clone(scope)))
        .with_inline(book::PageFieldDirective::new(Arc::clone(scope)))
        .with_inline(book::SiteFieldDirective::new(Arc::clone(scope)))
        .with_inline(book::RootDirective::new(Arc::clone(scope)))
        .with_inline(book::NavDirective::new(Arc::clone(scope)))
}
