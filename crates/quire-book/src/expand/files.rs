//! File inclusion directives.
//!
//! | directive | result |
//! |-----------|--------|
//! | `::include[f]` | `f` with its own directives expanded |
//! | `::raw[f]` | `f` verbatim |
//! | `::embed[f]` | `f` verbatim, for HTML fragments |
//! | `::file[f]` | `f` with lint comments removed, then escaped |
//! | `::slice[f]{tag=T}` | the `T` region of `f`, as for `::file` |
//! | `::erase[f]{tag=T}` | `f` with the `T` region elided, as for `::file` |
//! | `:code-class[f]` | `language-EXT` |
//!
//! All leaf directives accept `marker="..." with="..."`, which replaces the
//! first occurrence of the marker in the result and fails if it is absent.

use std::path::PathBuf;

use quire_renderer::directive::{
    DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput, InlineDirective,
    LeafDirective,
};

use super::source::{code_class, erase, escape_code, replace_marker, slice, strip_lint};

/// Apply the optional `marker`/`with` substitution to directive output.
fn apply_marker(args: &DirectiveArgs, text: String) -> Result<String, DirectiveError> {
    match args.get("marker") {
        Some(marker) => replace_marker(&text, marker, args.get("with").unwrap_or_default()),
        None => Ok(text),
    }
}

/// Resolve the file named in the directive content.
fn target(args: &DirectiveArgs, ctx: &DirectiveContext<'_>) -> Result<PathBuf, DirectiveError> {
    args.require_content("file").map(|file| ctx.resolve_path(file))
}

/// `::include[file]`: read and expand another source file.
pub struct IncludeDirective;

impl LeafDirective for IncludeDirective {
    fn name(&self) -> &str {
        "include"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let path = target(&args, ctx)?;
        let expanded = ctx.expand_file(&path)?;
        apply_marker(&args, expanded).map(DirectiveOutput::html)
    }
}

/// `::raw[file]`: insert a file unchanged.
pub struct RawDirective;

impl LeafDirective for RawDirective {
    fn name(&self) -> &str {
        "raw"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let text = ctx.read(&target(&args, ctx)?)?;
        apply_marker(&args, text).map(DirectiveOutput::html)
    }
}

/// `::embed[page.html]`: insert an HTML fragment without expanding it.
pub struct EmbedDirective;

impl LeafDirective for EmbedDirective {
    fn name(&self) -> &str {
        "embed"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let path = target(&args, ctx)?;
        let text = ctx.read(&path)?;
        tracing::trace!(path = %path.display(), bytes = text.len(), "Embedding page");
        apply_marker(&args, text).map(DirectiveOutput::html)
    }
}

/// How much of a file a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extract {
    Whole,
    Slice,
    Erase,
}

/// Shared implementation of `::file`, `::slice` and `::erase`.
fn listing(
    extract: Extract,
    args: &DirectiveArgs,
    ctx: &DirectiveContext<'_>,
) -> Result<DirectiveOutput, DirectiveError> {
    let file = args.require_content("file")?;
    let path = ctx.resolve_path(file);
    let raw = ctx.read(&path)?;
    let text = strip_lint(&raw, &path);

    let extracted = match extract {
        Extract::Whole => text.into_owned(),
        Extract::Slice => {
            let tag = args.require("tag")?;
            slice(&text, tag).ok_or_else(|| DirectiveError::TagNotFound {
                tag: tag.to_owned(),
                file: PathBuf::from(file),
                including: ctx.source_display(),
            })?
        }
        Extract::Erase => erase(&text, args.require("tag")?).into_owned(),
    };

    apply_marker(args, escape_code(&extracted)).map(DirectiveOutput::html)
}

/// `::file[code.js]`: a whole source file, escaped for a listing.
pub struct FileDirective;

impl LeafDirective for FileDirective {
    fn name(&self) -> &str {
        "file"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        listing(Extract::Whole, &args, ctx)
    }
}

/// `::slice[code.js]{tag=T}`: the tagged region of a source file.
pub struct SliceDirective;

impl LeafDirective for SliceDirective {
    fn name(&self) -> &str {
        "slice"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        listing(Extract::Slice, &args, ctx)
    }
}

/// `::erase[code.js]{tag=T}`: a source file with its tagged region elided.
pub struct EraseDirective;

impl LeafDirective for EraseDirective {
    fn name(&self) -> &str {
        "erase"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        listing(Extract::Erase, &args, ctx)
    }
}

/// `:code-class[code.js]`: the highlighting class for a listing.
pub struct CodeClassDirective;

impl InlineDirective for CodeClassDirective {
    fn name(&self) -> &str {
        "code-class"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let file = args.require_content("file")?;
        Ok(DirectiveOutput::html(code_class(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_renderer::directive::{DirectiveProcessor, DirectiveProcessorConfig};
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    fn processor(files: &[(&str, &str)]) -> DirectiveProcessor {
        let files: HashMap<PathBuf, String> = files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), (*text).to_owned()))
            .collect();
        DirectiveProcessor::with_config(
            DirectiveProcessorConfig::new()
                .with_root_dir("/book")
                .with_source_path("/book/intro/index.md")
                .with_read_file(move |path: &Path| {
                    files
                        .get(path)
                        .cloned()
                        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
                }),
        )
        .with_leaf(IncludeDirective)
        .with_leaf(RawDirective)
        .with_leaf(EmbedDirective)
        .with_leaf(FileDirective)
        .with_leaf(SliceDirective)
        .with_leaf(EraseDirective)
        .with_inline(CodeClassDirective)
    }

    const WALK: &str = "const fs = require('fs') // eslint-disable-line\n\
                        // <loop>\n\
                        for (const x of xs) {\n  if (x < 3 && x > 0) f(x)\n}\n\
                        // </loop>\n\
                        done()\n";

    #[test]
    fn test_file_strips_and_escapes() {
        let p = processor(&[("/book/intro/walk.js", WALK)]);
        let out = p.process("::file[walk.js]").unwrap();
        assert!(out.starts_with("const fs = require('fs')\n// &lt;loop&gt;\n"));
        assert!(out.contains("x &lt; 3 &amp;&amp; x &gt; 0"));
        assert!(!out.contains("eslint"));
    }

    #[test]
    fn test_slice() {
        let p = processor(&[("/book/intro/walk.js", WALK)]);
        let out = p.process("<pre><code>::slice[walk.js]{tag=loop}</code></pre>").unwrap();
        assert_eq!(
            out,
            "<pre><code>for (const x of xs) {\n  if (x &lt; 3 &amp;&amp; x &gt; 0) f(x)\n}</code></pre>"
        );
    }

    #[test]
    fn test_slice_missing_tag_names_files() {
        let p = processor(&[("/book/intro/walk.js", WALK)]);
        let err = p.process("::slice[walk.js]{tag=nope}").unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "Failed to find tag nope in /book/intro/index.md/walk.js"
        );
    }

    #[test]
    fn test_slice_requires_tag() {
        let p = processor(&[("/book/intro/walk.js", WALK)]);
        let err = p.process("::slice[walk.js]").unwrap_err();
        assert!(matches!(err.root_cause(), DirectiveError::MissingArgument(name) if name == "tag"));
    }

    #[test]
    fn test_erase() {
        let p = processor(&[("/book/intro/walk.js", WALK)]);
        let out = p.process("::erase[walk.js]{tag=loop}").unwrap();
        assert_eq!(out, "const fs = require('fs')\n...\ndone()\n");
    }

    #[test]
    fn test_raw_is_verbatim() {
        let p = processor(&[("/book/intro/t.html", "<b>:root & ::raw[x]</b>")]);
        assert_eq!(p.process("::raw[t.html]").unwrap(), "<b>:root & ::raw[x]</b>");
    }

    #[test]
    fn test_embed_rooted_path() {
        let p = processor(&[("/book/_inc/banner.html", "<div>banner</div>")]);
        assert_eq!(p.process("::embed[/_inc/banner.html]").unwrap(), "<div>banner</div>");
    }

    #[test]
    fn test_include_expands_nested() {
        let p = processor(&[
            ("/book/_inc/head.html", "<header>::raw[title.txt]</header>"),
            ("/book/_inc/title.txt", "Quire"),
        ]);
        assert_eq!(
            p.process("::include[/_inc/head.html]\nbody").unwrap(),
            "<header>Quire</header>\nbody"
        );
    }

    #[test]
    fn test_marker_replacement() {
        let p = processor(&[("/book/intro/t.js", "const x = BODY\n")]);
        let out = p
            .process(r#"::file[t.js]{marker="BODY" with="<em>42</em>"}"#)
            .unwrap();
        assert_eq!(out, "const x = <em>42</em>\n");
    }

    #[test]
    fn test_marker_missing_fails() {
        let p = processor(&[("/book/intro/t.js", "const x = 1\n")]);
        let err = p.process(r#"::raw[t.js]{marker="BODY" with="1"}"#).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            DirectiveError::MarkerNotFound { marker } if marker == "BODY"
        ));
    }

    #[test]
    fn test_missing_file_reports_location() {
        let p = processor(&[]);
        let err = p.process("text\n::raw[gone.txt]").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("/book/intro/index.md:2: ::raw[gone.txt]: "));
        assert!(matches!(err.root_cause(), DirectiveError::Io { .. }));
    }

    #[test]
    fn test_code_class() {
        let p = processor(&[]);
        assert_eq!(
            p.process(r#"<code class=":code-class[walk.js]">"#).unwrap(),
            r#"<code class="language-js">"#
        );
    }
}
