//! Configuration management for quire.
//!
//! Parses `config.yml` book configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Resolution
//!
//! Every path in the configuration file is relative to the directory holding
//! the file. Paths given through [`CliSettings`] are used as-is, so they stay
//! relative to the working directory of the invoking process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override glossary document path.
    pub gloss_file: Option<PathBuf>,
    /// Override links document path.
    pub links_file: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override root directory of the book sources.
    pub root_dir: Option<PathBuf>,
    /// Override canonical path rewriting.
    pub canonical_paths: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "config.yml";

const DEFAULT_GLOSS_FILE: &str = "gloss.md";
const DEFAULT_LINKS_FILE: &str = "links.yml";
const DEFAULT_OUTPUT_DIR: &str = "docs";
const DEFAULT_ROOT_DIR: &str = ".";
const DEFAULT_HEADER: &str = "/_inc/head.html";
const DEFAULT_FOOTER: &str = "/_inc/foot.html";
const DEFAULT_GLOSSARY_PAGE: &str = "glossary";
const DEFAULT_CANONICAL_DIR: &str = "/u/quire";

/// Book configuration.
///
/// Keys use camelCase in the YAML document (`sourceFiles`, `glossFile`, ...).
/// Keys that are not recognised are kept in [`fields`](Self::fields) so page
/// templates can read them as site-wide values.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Unnumbered pages (preface, glossary, index, ...).
    pub extras: Vec<PageDescriptor>,
    /// Numbered chapters.
    pub chapters: Vec<PageDescriptor>,
    /// Lettered appendices.
    pub appendices: Vec<PageDescriptor>,
    /// Glob patterns for files copied verbatim, relative to the root directory.
    pub copy: Vec<String>,
    /// Glob patterns for per-chapter source files exposed in the output.
    pub source_files: Vec<String>,
    /// Glob patterns excluded from copying.
    pub exclude: Vec<String>,
    /// Extension substitutions applied to copied files (`.ts` -> `.txt`).
    pub suffixes: BTreeMap<String, String>,
    /// Include target placed above every page body.
    pub header: String,
    /// Include target placed below every page body.
    pub footer: String,
    /// Slug of the page holding the glossary.
    pub glossary_page: String,
    /// Replacement for the project directory when canonical paths are enabled.
    pub canonical_dir: String,
    /// Whether to rewrite the project directory to `canonical_dir`.
    pub canonical_paths: bool,

    gloss_file: String,
    links_file: String,
    output_dir: String,
    root_dir: String,

    /// Site-wide values not recognised as configuration keys.
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: BookPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extras: Vec::new(),
            chapters: Vec::new(),
            appendices: Vec::new(),
            copy: Vec::new(),
            source_files: Vec::new(),
            exclude: Vec::new(),
            suffixes: BTreeMap::new(),
            header: DEFAULT_HEADER.to_owned(),
            footer: DEFAULT_FOOTER.to_owned(),
            glossary_page: DEFAULT_GLOSSARY_PAGE.to_owned(),
            canonical_dir: DEFAULT_CANONICAL_DIR.to_owned(),
            canonical_paths: false,
            gloss_file: DEFAULT_GLOSS_FILE.to_owned(),
            links_file: DEFAULT_LINKS_FILE.to_owned(),
            output_dir: DEFAULT_OUTPUT_DIR.to_owned(),
            root_dir: DEFAULT_ROOT_DIR.to_owned(),
            fields: Map::new(),
            paths: BookPaths::default(),
            config_path: None,
        }
    }
}

/// A page entry in one of the `extras`, `chapters` or `appendices` lists.
///
/// `slug` is optional at the parsing level so the catalog can report which
/// entry is missing it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageDescriptor {
    /// Unique page identifier.
    pub slug: Option<String>,
    /// Source document, relative to the root directory.
    pub source: Option<String>,
    /// Output document, relative to the output directory.
    pub output: Option<String>,
    /// Any other keys (`title`, `exercises`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Resolved book paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookPaths {
    /// Glossary document.
    pub gloss_file: PathBuf,
    /// Links document.
    pub links_file: PathBuf,
    /// Directory receiving the generated site.
    pub output_dir: PathBuf,
    /// Directory holding page sources and static files.
    pub root_dir: PathBuf,
    /// Project directory (the config file's directory).
    pub project_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, message: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(message.to_owned()));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `config.yml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if no config file can be found, parsing fails, or a
    /// required setting is empty.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::discover_config()?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = Self::load_from_file(&path)?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from YAML text, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(content: &str, base: &Path) -> Result<Self, ConfigError> {
        // An empty document deserializes as null; treat it as all defaults.
        let mut config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        config.resolve_paths(base);
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gloss_file) = &settings.gloss_file {
            self.paths.gloss_file.clone_from(gloss_file);
        }
        if let Some(links_file) = &settings.links_file {
            self.paths.links_file.clone_from(links_file);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
        if let Some(root_dir) = &settings.root_dir {
            self.paths.root_dir.clone_from(root_dir);
        }
        if let Some(canonical_paths) = settings.canonical_paths {
            self.canonical_paths = canonical_paths;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Result<PathBuf, ConfigError> {
        let cwd = std::env::current_dir()?;
        let mut current = cwd.clone();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ConfigError::NotFound(cwd.join(CONFIG_FILENAME)));
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut config = Self::from_yaml(&content, &config_dir)?;
        config.paths.project_dir = config_dir.canonicalize()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required settings are present and well-formed.
    /// Called automatically after parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.gloss_file, "Need a glossary file")?;
        require_non_empty(&self.links_file, "Need a links file")?;
        require_non_empty(&self.output_dir, "Need a site directory")?;
        require_non_empty(&self.root_dir, "Need a root directory")?;
        require_non_empty(&self.glossary_page, "Need a glossary page slug")?;
        self.validate_suffixes()
    }

    /// Suffix keys and values must both be extensions with a leading dot.
    fn validate_suffixes(&self) -> Result<(), ConfigError> {
        for (from, to) in &self.suffixes {
            if !from.starts_with('.') || !to.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "suffixes must map extensions with a leading dot, found {from:?}: {to:?}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.paths = BookPaths {
            gloss_file: config_dir.join(&self.gloss_file),
            links_file: config_dir.join(&self.links_file),
            output_dir: config_dir.join(&self.output_dir),
            root_dir: config_dir.join(&self.root_dir),
            project_dir: config_dir.to_path_buf(),
        };
    }
}
