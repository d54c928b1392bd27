//! Book assembly for quire.
//!
//! Turns a configured set of page sources into a cross-linked HTML site:
//!
//! - [`Glossary`], [`LinkTable`] and [`Numbering`]: book-wide tables built
//!   before any page is expanded
//! - [`Catalog`]: ordered [`PageRecord`]s with paths and previous/next links
//! - [`loader`]: front matter and header/footer framing for each page
//! - [`expand`]: the directives available in page sources
//! - [`PageRenderer`]: expansion, glossary checks and markdown rendering
//! - [`OutputWriter`] and [`AssetFinalizer`]: files on disk
//! - [`BookBuilder`]: all of the above in order
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use quire_book::BookBuilder;
//! use quire_config::Config;
//!
//! let config = Config::load(None, None)?;
//! let report = BookBuilder::new(config).build()?;
//! assert!(report.pages > 0);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod builder;
pub mod catalog;
pub mod context;
mod error;
pub mod expand;
pub mod frontmatter;
pub mod glossary;
pub mod links;
pub mod loader;
pub mod numbering;
pub mod render;
pub mod writer;

pub use assets::{AssetFinalizer, AssetRules};
pub use builder::{BookBuilder, BuildReport};
pub use catalog::{Catalog, Exercise, PageKind, PageRecord, to_root};
pub use context::{BookContext, PageScope};
pub use error::BookError;
pub use glossary::{Glossary, glossary_references, unique_references};
pub use links::{LinkEntry, LinkTable};
pub use numbering::Numbering;
pub use render::PageRenderer;
pub use writer::OutputWriter;
