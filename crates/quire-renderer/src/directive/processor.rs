//! Directive processor.
//!
//! Expands inline and leaf directives line by line, recursing into the text
//! that handlers load.

use std::io;
use std::path::{Path, PathBuf};

use crate::fence::{FenceTracker, IndentTracker};

use super::parser::parse_line;
use super::{
    DirectiveContext, DirectiveError, DirectiveOutput, InlineDirective, LeafDirective,
    parser::{DirectiveKind, ParsedDirective},
};

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send + Sync;

/// Configuration for the directive processor.
pub struct DirectiveProcessorConfig {
    /// Base directory for text that has no source file.
    pub base_dir: PathBuf,
    /// Directory that `/`-prefixed paths resolve against.
    pub root_dir: PathBuf,
    /// Path to the document being expanded (if known).
    pub source_path: Option<PathBuf>,
    /// Callback to read files from the file system.
    ///
    /// Default: `std::fs::read_to_string`
    pub read_file: Option<Box<ReadFileFn>>,
    /// Maximum include depth to stop include cycles.
    ///
    /// Default: 16
    pub max_include_depth: usize,
}

impl Default for DirectiveProcessorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveProcessorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            root_dir: PathBuf::from("."),
            source_path: None,
            read_file: None,
            max_include_depth: 16,
        }
    }

    /// Set the base directory for text without a source file.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the root directory.
    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    /// Set the file reading callback.
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + Sync + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    /// Set the maximum include depth.
    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

/// Processor for directives.
///
/// Code is copied unchanged: fenced blocks, indented blocks and backtick
/// spans. So are `:::` container lines. Unknown directive names pass through as written. Any handler
/// error aborts expansion and is returned wrapped with its location.
///
/// # Example
///
/// ```
/// use quire_renderer::directive::{
///     DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput,
///     DirectiveProcessor, InlineDirective,
/// };
///
/// struct Shout;
///
/// impl InlineDirective for Shout {
///     fn name(&self) -> &str { "shout" }
///     fn process(
///         &self,
///         args: DirectiveArgs,
///         _ctx: &DirectiveContext<'_>,
///     ) -> Result<DirectiveOutput, DirectiveError> {
///         Ok(DirectiveOutput::html(args.content.to_uppercase()))
///     }
/// }
///
/// let processor = DirectiveProcessor::new().with_inline(Shout);
/// let output = processor.process("Say :shout[hello].").unwrap();
/// assert_eq!(output, "Say HELLO.");
/// ```
pub struct DirectiveProcessor {
    config: DirectiveProcessorConfig,
    inline_handlers: Vec<Box<dyn InlineDirective>>,
    leaf_handlers: Vec<Box<dyn LeafDirective>>,
}

impl Default for DirectiveProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveProcessor {
    /// Create a new directive processor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DirectiveProcessorConfig::default())
    }

    /// Create a new directive processor with custom configuration.
    #[must_use]
    pub fn with_config(config: DirectiveProcessorConfig) -> Self {
        Self {
            config,
            inline_handlers: Vec::new(),
            leaf_handlers: Vec::new(),
        }
    }

    /// Register an inline directive handler.
    #[must_use]
    pub fn with_inline<D: InlineDirective + 'static>(mut self, handler: D) -> Self {
        self.inline_handlers.push(Box::new(handler));
        self
    }

    /// Register a leaf directive handler.
    #[must_use]
    pub fn with_leaf<D: LeafDirective + 'static>(mut self, handler: D) -> Self {
        self.leaf_handlers.push(Box::new(handler));
        self
    }

    /// Expand all directives in `input`.
    ///
    /// Relative paths resolve against the configured source file's directory.
    pub fn process(&self, input: &str) -> Result<String, DirectiveError> {
        self.expand_at(input, self.config.source_path.as_deref(), 0)
    }

    pub(crate) fn read_file(&self, path: &Path) -> io::Result<String> {
        match &self.config.read_file {
            Some(read) => read(path),
            None => std::fs::read_to_string(path),
        }
    }

    pub(crate) fn expand_at(
        &self,
        input: &str,
        source: Option<&Path>,
        depth: usize,
    ) -> Result<String, DirectiveError> {
        if depth > self.config.max_include_depth {
            return Err(DirectiveError::DepthExceeded {
                max: self.config.max_include_depth,
            });
        }

        let mut fence = FenceTracker::new();
        let mut indent = IndentTracker::new();
        let mut output = String::with_capacity(input.len());

        for (idx, raw_line) in input.split_inclusive('\n').enumerate() {
            let body = raw_line.trim_end_matches(['\n', '\r']);
            let ending = &raw_line[body.len()..];

            fence.update(body);
            let in_code = fence.in_fence() || indent.update(body);
            if in_code || body.trim_start().starts_with(":::") {
                output.push_str(raw_line);
                continue;
            }

            self.expand_line(body, idx + 1, source, depth, &mut output)?;
            output.push_str(ending);
        }

        Ok(output)
    }

    fn expand_line(
        &self,
        line: &str,
        line_num: usize,
        source: Option<&Path>,
        depth: usize,
        output: &mut String,
    ) -> Result<(), DirectiveError> {
        let mut remaining = line;

        while let Some(directive) = parse_line(remaining) {
            let (start, end) = (directive.start, directive.end);
            output.push_str(&remaining[..start]);
            let written = &remaining[start..end];

            let result = self
                .dispatch(directive, line_num, source, depth)
                .and_then(|produced| match produced {
                    DirectiveOutput::Html(html) => Ok(Some(html)),
                    DirectiveOutput::Markdown(md) => {
                        self.expand_at(&md, source, depth + 1).map(Some)
                    }
                    DirectiveOutput::Skip => Ok(None),
                })
                .map_err(|source_err| DirectiveError::Located {
                    location: source.map_or_else(
                        || "<input>".to_owned(),
                        |p| p.display().to_string(),
                    ),
                    line: line_num,
                    directive: written.to_owned(),
                    source: Box::new(source_err),
                })?;

            output.push_str(result.as_deref().unwrap_or(written));
            remaining = &remaining[end..];
        }

        output.push_str(remaining);
        Ok(())
    }

    fn dispatch(
        &self,
        directive: ParsedDirective,
        line_num: usize,
        source: Option<&Path>,
        depth: usize,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let ParsedDirective {
            kind, name, args, ..
        } = directive;

        let base_dir = source
            .and_then(Path::parent)
            .unwrap_or(&self.config.base_dir);
        let ctx = DirectiveContext {
            source_path: source,
            base_dir,
            root_dir: &self.config.root_dir,
            line: line_num,
            depth,
            processor: self,
        };

        match kind {
            DirectiveKind::Inline => match self.inline_handlers.iter().find(|h| h.name() == name) {
                Some(handler) => {
                    tracing::trace!(directive = %name, line = line_num, "Expanding inline directive");
                    handler.process(args, &ctx)
                }
                None => Ok(DirectiveOutput::Skip),
            },
            DirectiveKind::Leaf => match self.leaf_handlers.iter().find(|h| h.name() == name) {
                Some(handler) => {
                    tracing::trace!(directive = %name, line = line_num, "Expanding leaf directive");
                    handler.process(args, &ctx)
                }
                None => Ok(DirectiveOutput::Skip),
            },
        }
    }
}
