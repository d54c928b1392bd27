//! Build failure types.

use std::path::PathBuf;

use quire_config::ConfigError;
use quire_renderer::directive::DirectiveError;

/// Error returned when a book cannot be built.
///
/// Every variant aborts the build; nothing is written after the first error.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A page descriptor has no slug.
    #[error("{section} entry {position} has no slug")]
    MissingSlug {
        section: &'static str,
        position: usize,
    },
    /// Two page descriptors share a slug.
    #[error("duplicate page slug '{0}'")]
    DuplicateSlug(String),
    /// Appendix letters ran out.
    #[error("{count} appendices configured, at most 26 can be lettered")]
    TooManyAppendices { count: usize },
    /// The glossary defines a key twice.
    #[error("duplicate glossary key '{0}'")]
    DuplicateGlossaryKey(String),
    /// A page references glossary keys that are not defined.
    #[error("page '{page}' references undefined glossary terms: {}", keys.join(", "))]
    UnresolvedGlossary { page: String, keys: Vec<String> },
    /// Front matter is not valid YAML or not a mapping.
    #[error("bad front matter in {}: {message}", path.display())]
    FrontMatter { path: PathBuf, message: String },
    /// The links document is not a list of `{slug, url}` entries.
    #[error("bad links file {}: {source}", path.display())]
    Links {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// A copy, source or exclude pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// Clearing the output directory would delete book sources.
    #[error(
        "refusing to clear output directory {} because it contains the root directory {}",
        output.display(),
        root.display()
    )]
    UnsafeOutputDir { output: PathBuf, root: PathBuf },
    /// Directive expansion failed on a page.
    #[error("cannot expand page '{page}': {source}")]
    Directive {
        page: String,
        #[source]
        source: DirectiveError,
    },
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
