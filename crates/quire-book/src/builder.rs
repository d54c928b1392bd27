//! Whole-book build.

use std::sync::Arc;

use quire_config::Config;
use quire_renderer::MarkdownRenderer;

use crate::BookError;
use crate::assets::{AssetFinalizer, AssetRules};
use crate::catalog::Catalog;
use crate::context::{BookContext, PageScope};
use crate::glossary::Glossary;
use crate::links::LinkTable;
use crate::loader::{PageFrame, load_pages};
use crate::numbering::Numbering;
use crate::render::{DEFAULT_MAX_INCLUDE_DEPTH, PageRenderer};
use crate::writer::OutputWriter;

/// Counts from a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// HTML pages written.
    pub pages: usize,
    /// Static files copied.
    pub assets: usize,
}

/// Builds a book from its configuration.
///
/// The build runs in a fixed order: glossary, links, catalog and numbering
/// are built first; every page source is loaded; the output directory is
/// cleared; each page is expanded, rendered and written; assets are copied
/// last. The first error stops the build.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use quire_book::BookBuilder;
/// use quire_config::Config;
///
/// let config = Config::load(None, None)?;
/// let report = BookBuilder::new(config).build()?;
/// println!("{} pages, {} assets", report.pages, report.assets);
/// # Ok(())
/// # }
/// ```
pub struct BookBuilder {
    config: Config,
    max_include_depth: usize,
}

impl BookBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Set the limit on nested includes.
    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the build.
    pub fn build(&self) -> Result<BuildReport, BookError> {
        let book = Arc::new(self.prepare()?);
        let paths = &self.config.paths;

        let writer = OutputWriter::new(&paths.output_dir);
        writer.clear(&paths.root_dir)?;

        let renderer = PageRenderer::new(self.markdown_renderer())
            .with_max_include_depth(self.max_include_depth);
        let mut pages = 0;
        for scope in PageScope::all(&book) {
            let scope = Arc::new(scope);
            let html = renderer.render(&scope)?;
            writer.write(&scope.page().output, &html)?;
            pages += 1;
        }
        tracing::info!(pages, dir = %paths.output_dir.display(), "Wrote pages");

        let rules = AssetRules::from_config(&self.config);
        let assets = AssetFinalizer::new(&rules, &paths.root_dir, &paths.output_dir)
            .finalize(&book.catalog)?;

        Ok(BuildReport { pages, assets })
    }

    /// Build the shared tables and load every page.
    pub fn prepare(&self) -> Result<BookContext, BookError> {
        let paths = &self.config.paths;

        let glossary = Glossary::load(&paths.gloss_file)?;
        let links = LinkTable::load(&paths.links_file)?;
        let mut catalog = Catalog::from_config(&self.config)?;
        let numbering = Numbering::for_catalog(&catalog)?;
        tracing::info!(
            pages = catalog.len(),
            terms = glossary.len(),
            links = links.entries().len(),
            "Built book tables"
        );

        let frame = PageFrame::new(&self.config.header, &self.config.footer);
        load_pages(&mut catalog, &frame)?;

        Ok(BookContext {
            catalog,
            glossary,
            links,
            numbering,
            site: self.config.fields.clone(),
            root_dir: paths.root_dir.clone(),
            glossary_page: self.config.glossary_page.clone(),
        })
    }

    fn markdown_renderer(&self) -> MarkdownRenderer {
        let renderer = MarkdownRenderer::new();
        if !self.config.canonical_paths {
            return renderer;
        }
        let project = self.config.paths.project_dir.to_string_lossy().into_owned();
        tracing::debug!(from = %project, to = %self.config.canonical_dir, "Rewriting project paths");
        renderer.with_path_rewrite(project, self.config.canonical_dir.clone())
    }
}
