//! `quire build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_book::BookBuilder;
use quire_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover config.yml).
    #[arg(short, long, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Glossary document (overrides config).
    #[arg(long)]
    gloss_file: Option<PathBuf>,

    /// Links document (overrides config).
    #[arg(long)]
    links_file: Option<PathBuf>,

    /// Output directory, cleared before every build (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Root directory of the page sources (overrides config).
    #[arg(short, long)]
    root_dir: Option<PathBuf>,

    /// Replace the project directory with the canonical directory in output.
    #[arg(long)]
    canonical_paths: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            gloss_file: self.gloss_file.clone(),
            links_file: self.links_file.clone(),
            output_dir: self.output_dir.clone(),
            root_dir: self.root_dir.clone(),
            canonical_paths: self.canonical_paths.then_some(true),
        }
    }

    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or any page
    /// fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let output_dir = config.paths.output_dir.clone();

        output.info(&format!("Source: {}", config.paths.root_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let report = BookBuilder::new(config).build()?;

        output.success(&format!(
            "Built {} pages and copied {} assets to {}",
            report.pages,
            report.assets,
            output_dir.display()
        ));
        Ok(())
    }
}
