//! Directives that read book-wide tables: numbering, cross-references,
//! exercises, page and site fields, and the glossary term list.

use std::sync::Arc;

use quire_renderer::directive::{
    DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput, InlineDirective,
    LeafDirective,
};
use serde_json::Value;

use crate::catalog::{Exercise, PageKind, PageRecord};
use crate::context::PageScope;

/// Placeholder left by `::terms`, filled in once the page is rendered.
pub const TERMS_PLACEHOLDER: &str = "<!--quire:terms-->";

/// Text form of a field value: strings unquoted, null empty, anything else as JSON.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Look up a page by slug, failing with an unknown-page error.
fn find_page<'a>(scope: &'a PageScope, slug: &str) -> Result<&'a PageRecord, DirectiveError> {
    scope
        .book()
        .catalog
        .get(slug)
        .ok_or_else(|| DirectiveError::UnknownReference {
            kind: "page",
            key: slug.to_owned(),
        })
}

/// Chapter and variant named by an `::exercise` or `::exercises` directive.
fn exercise_target<'a>(
    scope: &'a PageScope,
    args: &DirectiveArgs,
) -> Result<(&'a PageRecord, &'static str), DirectiveError> {
    let chapter = match args.get("chapter") {
        Some(slug) => find_page(scope, slug)?,
        None => scope.page(),
    };
    let variant = match args.get("variant").unwrap_or("problem") {
        "problem" => "problem",
        "solution" => "solution",
        other => {
            return Err(DirectiveError::InvalidArgument {
                name: "variant".to_owned(),
                message: format!("expected 'problem' or 'solution', found '{other}'"),
            });
        }
    };
    Ok((chapter, variant))
}

fn chapter_exercises(chapter: &PageRecord) -> Result<Vec<Exercise>, DirectiveError> {
    chapter
        .exercises()
        .map_err(|e| DirectiveError::InvalidArgument {
            name: "exercises".to_owned(),
            message: format!("page '{}': {e}", chapter.slug),
        })
}

/// Load, expand and title one exercise file.
fn render_exercise(
    scope: &PageScope,
    ctx: &DirectiveContext<'_>,
    chapter: &PageRecord,
    exercise: &Exercise,
    variant: &str,
) -> Result<String, DirectiveError> {
    let path = scope
        .book()
        .root_dir
        .join(&chapter.slug)
        .join(&exercise.slug)
        .join(format!("{variant}.md"));
    let text = ctx.read(&path)?;
    let contents = ctx.expand_as(&path, &text)?;
    Ok(format!(
        "<h3 class=\"exercise\">{}</h3>\n\n{contents}\n",
        exercise.title
    ))
}

/// `::exercise[slug]{variant=solution chapter=intro}`: one exercise.
pub struct ExerciseDirective {
    scope: Arc<PageScope>,
}

impl ExerciseDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl LeafDirective for ExerciseDirective {
    fn name(&self) -> &str {
        "exercise"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let slug = args.require_content("exercise")?;
        let (chapter, variant) = exercise_target(&self.scope, &args)?;
        let exercise = chapter_exercises(chapter)?
            .into_iter()
            .find(|exercise| exercise.slug == slug)
            .ok_or_else(|| DirectiveError::UnknownReference {
                kind: "exercise",
                key: format!("{}/{slug}", chapter.slug),
            })?;

        render_exercise(&self.scope, ctx, chapter, &exercise, variant).map(DirectiveOutput::html)
    }
}

/// `::exercises{variant=problem}`: every exercise of a chapter, in order.
pub struct ExercisesDirective {
    scope: Arc<PageScope>,
}

impl ExercisesDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl LeafDirective for ExercisesDirective {
    fn name(&self) -> &str {
        "exercises"
    }

    /// Expands to one `::exercise` line per exercise, which the processor
    /// then expands in place.
    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let (chapter, variant) = exercise_target(&self.scope, &args)?;
        let lines: Vec<String> = chapter_exercises(chapter)?
            .iter()
            .map(|exercise| {
                format!(
                    "::exercise[{}]{{chapter={} variant={variant}}}",
                    exercise.slug, chapter.slug
                )
            })
            .collect();
        Ok(DirectiveOutput::markdown(lines.join("\n")))
    }
}

/// `::numbering`: the label table as a script constant.
pub struct NumberingDirective {
    scope: Arc<PageScope>,
}

impl NumberingDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl LeafDirective for NumberingDirective {
    fn name(&self) -> &str {
        "numbering"
    }

    fn process(
        &self,
        _args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        Ok(DirectiveOutput::html(self.scope.book().numbering.to_literal()))
    }
}

/// `:number[slug]`: chapter number or appendix letter; the current page when empty.
pub struct NumberDirective {
    scope: Arc<PageScope>,
}

impl NumberDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for NumberDirective {
    fn name(&self) -> &str {
        "number"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let slug = if args.content.is_empty() {
            self.scope.page().slug.as_str()
        } else {
            args.content.as_str()
        };
        self.scope
            .book()
            .numbering
            .label(slug)
            .map(DirectiveOutput::html)
            .ok_or_else(|| DirectiveError::UnknownReference {
                kind: "page",
                key: slug.to_owned(),
            })
    }
}

/// `:xref[slug]`: a link to another page labelled "Chapter N" or "Appendix X".
///
/// Unnumbered pages are labelled with their title, or their slug without one.
pub struct XrefDirective {
    scope: Arc<PageScope>,
}

impl XrefDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for XrefDirective {
    fn name(&self) -> &str {
        "xref"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let target = find_page(&self.scope, args.require_content("slug")?)?;
        let label = self.scope.book().numbering.label(&target.slug);
        let text = match (target.kind, label) {
            (PageKind::Chapter, Some(label)) => format!("Chapter {label}"),
            (PageKind::Appendix, Some(label)) => format!("Appendix {label}"),
            _ => target.title().unwrap_or(&target.slug).to_owned(),
        };
        Ok(DirectiveOutput::html(format!(
            "<a href=\"{}\">{text}</a>",
            self.scope.href(&target.output)
        )))
    }
}

/// `:page[field]{default=...}`: a value from the current page.
pub struct PageFieldDirective {
    scope: Arc<PageScope>,
}

impl PageFieldDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for PageFieldDirective {
    fn name(&self) -> &str {
        "page"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let field = args.require_content("field")?;
        let page = self.scope.page();
        let value = match field {
            "slug" => Some(page.slug.clone()),
            "output" => Some(page.output.clone()),
            "index" => Some(page.index.to_string()),
            "number" => self
                .scope
                .book()
                .numbering
                .label(&page.slug)
                .map(str::to_owned),
            other => page.fields.get(other).map(field_text),
        };

        value
            .or_else(|| args.get("default").map(str::to_owned))
            .map(DirectiveOutput::html)
            .ok_or_else(|| DirectiveError::UnknownReference {
                kind: "page field",
                key: field.to_owned(),
            })
    }
}

/// `:site[field]{default=...}`: a site-wide configuration value.
pub struct SiteFieldDirective {
    scope: Arc<PageScope>,
}

impl SiteFieldDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for SiteFieldDirective {
    fn name(&self) -> &str {
        "site"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let field = args.require_content("field")?;
        self.scope
            .book()
            .site
            .get(field)
            .map(field_text)
            .or_else(|| args.get("default").map(str::to_owned))
            .map(DirectiveOutput::html)
            .ok_or_else(|| DirectiveError::UnknownReference {
                kind: "site field",
                key: field.to_owned(),
            })
    }
}

/// `:root`: relative path from the current page to the site root.
pub struct RootDirective {
    scope: Arc<PageScope>,
}

impl RootDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for RootDirective {
    fn name(&self) -> &str {
        "root"
    }

    fn process(
        &self,
        _args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        Ok(DirectiveOutput::html(self.scope.to_root()))
    }
}

/// `:nav[previous]` / `:nav[next]`: link to the neighbouring numbered page.
///
/// Expands to nothing at either end of the sequence and on unnumbered pages.
pub struct NavDirective {
    scope: Arc<PageScope>,
}

impl NavDirective {
    #[must_use]
    pub fn new(scope: Arc<PageScope>) -> Self {
        Self { scope }
    }
}

impl InlineDirective for NavDirective {
    fn name(&self) -> &str {
        "nav"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let catalog = &self.scope.book().catalog;
        let page = self.scope.page();
        let (neighbour, rel, arrow) = match args.require_content("direction")? {
            "previous" => (catalog.previous(page), "prev", "&#8678;"),
            "next" => (catalog.next(page), "next", "&#8680;"),
            other => {
                return Err(DirectiveError::InvalidArgument {
                    name: "direction".to_owned(),
                    message: format!("expected 'previous' or 'next', found '{other}'"),
                });
            }
        };

        let Some(target) = neighbour else {
            return Ok(DirectiveOutput::html(""));
        };
        let title = target.title().unwrap_or(&target.slug);
        Ok(DirectiveOutput::html(format!(
            "<a class=\"nav-{rel}\" rel=\"{rel}\" href=\"{}\" title=\"{title}\">{arrow}</a>",
            self.scope.href(&target.output)
        )))
    }
}

/// `::terms`: marks where the page's glossary term list goes.
pub struct TermsDirective;

impl LeafDirective for TermsDirective {
    fn name(&self) -> &str {
        "terms"
    }

    fn process(
        &self,
        _args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        Ok(DirectiveOutput::html(TERMS_PLACEHOLDER))
    }
}
