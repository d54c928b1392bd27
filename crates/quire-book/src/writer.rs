//! Output directory management.

use std::fs;
use std::path::{Path, PathBuf};

use crate::BookError;

/// Writes generated files below one output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Remove the output directory and everything in it.
    ///
    /// Refuses when the directory is, or contains, `root_dir`. A missing
    /// directory is not an error.
    pub fn clear(&self, root_dir: &Path) -> Result<(), BookError> {
        if !self.output_dir.exists() {
            return Ok(());
        }

        let output = canonical(&self.output_dir);
        if canonical(root_dir).starts_with(&output) {
            return Err(BookError::UnsafeOutputDir {
                output: self.output_dir.clone(),
                root: root_dir.to_path_buf(),
            });
        }

        fs::remove_dir_all(&self.output_dir).map_err(|e| BookError::io(&self.output_dir, e))?;
        tracing::info!(dir = %self.output_dir.display(), "Cleared output directory");
        Ok(())
    }

    /// Write `contents` to `relative` below the output directory, creating
    /// parent directories as needed.
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf, BookError> {
        let path = self.output_dir.join(relative);
        ensure_parent(&path)?;
        fs::write(&path, contents).map_err(|e| BookError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote page");
        Ok(path)
    }
}

/// Create the parent directory of `path`.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), BookError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| BookError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Absolute form of `path` when it exists, otherwise `path` itself.
pub(crate) fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
