//! Directive failure types.

use std::io;
use std::path::PathBuf;

/// Error raised while expanding a directive.
///
/// Handler errors are wrapped in [`Located`](Self::Located) by the processor,
/// so a failure deep inside nested includes reports every step of the chain.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A required argument or attribute is missing.
    #[error("missing argument '{0}'")]
    MissingArgument(String),
    /// An argument has an unusable value.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },
    /// Slice markers were not found in the target file.
    #[error("Failed to find tag {tag} in {}/{}", including.display(), file.display())]
    TagNotFound {
        tag: String,
        file: PathBuf,
        including: PathBuf,
    },
    /// Marker-replace target does not contain the marker.
    #[error("text does not include marker {marker:?} for replacement")]
    MarkerNotFound { marker: String },
    /// A page, exercise or field lookup failed.
    #[error("unknown {kind} '{key}'")]
    UnknownReference { kind: &'static str, key: String },
    /// Nested expansion went deeper than allowed.
    #[error("maximum include depth ({max}) exceeded")]
    DepthExceeded { max: usize },
    /// A directive failed at a known location.
    #[error("{location}:{line}: {directive}: {source}")]
    Located {
        location: String,
        line: usize,
        directive: String,
        source: Box<DirectiveError>,
    },
}

impl DirectiveError {
    /// The innermost error, skipping location wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
