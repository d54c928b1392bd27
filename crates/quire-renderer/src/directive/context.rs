//! Directive processing context.
//!
//! Gives handlers the location of the directive, file access, and a way back
//! into the processor for nested expansion.

use std::path::{Path, PathBuf};

use super::{DirectiveError, DirectiveProcessor};

/// Context provided to directive handlers.
///
/// Created by [`DirectiveProcessor`] for each directive. Besides location
/// information it carries the processor itself, so a handler that loads a
/// file can expand it with [`expand_file`](Self::expand_file) and the
/// included file's own directives resolve relative to that file.
pub struct DirectiveContext<'a> {
    /// File containing the directive, when known.
    pub source_path: Option<&'a Path>,
    /// Directory for resolving relative paths.
    pub base_dir: &'a Path,
    /// Directory that `/`-prefixed paths resolve against.
    pub root_dir: &'a Path,
    /// Line number where the directive appears (1-indexed).
    pub line: usize,
    pub(crate) depth: usize,
    pub(crate) processor: &'a DirectiveProcessor,
}

impl DirectiveContext<'_> {
    /// Resolve a path written in a directive.
    ///
    /// `/_inc/head.html` resolves against the root directory, anything else
    /// against the directory of the including file.
    #[must_use]
    pub fn resolve_path(&self, target: &str) -> PathBuf {
        match target.strip_prefix('/') {
            Some(rooted) => self.root_dir.join(rooted),
            None => self.base_dir.join(target),
        }
    }

    /// Read a file through the processor's reader.
    pub fn read(&self, path: &Path) -> Result<String, DirectiveError> {
        self.processor
            .read_file(path)
            .map_err(|source| DirectiveError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Expand directives in `text` as if it appeared at this directive.
    pub fn expand(&self, text: &str) -> Result<String, DirectiveError> {
        self.processor
            .expand_at(text, self.source_path, self.depth + 1)
    }

    /// Expand directives in `text` that was loaded from `path`.
    pub fn expand_as(&self, path: &Path, text: &str) -> Result<String, DirectiveError> {
        self.processor.expand_at(text, Some(path), self.depth + 1)
    }

    /// Read `path` and expand its directives relative to its own location.
    pub fn expand_file(&self, path: &Path) -> Result<String, DirectiveError> {
        let text = self.read(path)?;
        self.expand_as(path, &text)
    }

    /// Path of the including file for messages.
    #[must_use]
    pub fn source_display(&self) -> PathBuf {
        self.source_path
            .map_or_else(|| PathBuf::from("<input>"), Path::to_path_buf)
    }
}
