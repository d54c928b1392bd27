//! Static asset copying.
//!
//! After all pages are written, files matched by the `copy` patterns and by
//! the per-chapter `sourceFiles` patterns are copied from the root directory
//! into the output directory, keeping their relative paths.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use quire_config::Config;

use crate::BookError;
use crate::catalog::{Catalog, PageKind};
use crate::writer::{canonical, ensure_parent};

/// `*` stops at `/` in exclude patterns; only `**` crosses directories.
const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Which files to copy and how to rename them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssetRules {
    /// Patterns relative to the root directory.
    pub copy: Vec<String>,
    /// Patterns searched below each chapter and appendix directory.
    pub source_files: Vec<String>,
    /// Patterns for files never copied.
    pub exclude: Vec<String>,
    /// Extension substitutions, both with a leading dot.
    pub suffixes: BTreeMap<String, String>,
}

impl AssetRules {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            copy: config.copy.clone(),
            source_files: config.source_files.clone(),
            exclude: config.exclude.clone(),
            suffixes: config.suffixes.clone(),
        }
    }

    /// Every glob pattern to search, relative to the root directory.
    fn patterns(&self, catalog: &Catalog) -> Vec<String> {
        let numbered = catalog
            .pages()
            .iter()
            .filter(|page| matches!(page.kind, PageKind::Chapter | PageKind::Appendix));

        let mut patterns = self.copy.clone();
        for page in numbered {
            for pattern in &self.source_files {
                patterns.push(format!("{}/**/{pattern}", page.slug));
            }
        }
        patterns
    }

    /// Output path for `relative` with the suffix table applied.
    #[must_use]
    pub fn output_path(&self, output_dir: &Path, relative: &Path) -> PathBuf {
        let mut dest = output_dir.join(relative);
        let renamed = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.suffixes.get(&format!(".{ext}")));
        if let Some(suffix) = renamed {
            dest.set_extension(suffix.trim_start_matches('.'));
        }
        dest
    }
}

/// Copies matched assets into the output directory.
pub struct AssetFinalizer<'a> {
    rules: &'a AssetRules,
    root_dir: &'a Path,
    output_dir: &'a Path,
}

impl<'a> AssetFinalizer<'a> {
    #[must_use]
    pub fn new(rules: &'a AssetRules, root_dir: &'a Path, output_dir: &'a Path) -> Self {
        Self {
            rules,
            root_dir,
            output_dir,
        }
    }

    /// Copy every matched file and return how many were copied.
    ///
    /// A file matched by several patterns is copied once. Files already in
    /// the output directory are never copied onto themselves.
    pub fn finalize(&self, catalog: &Catalog) -> Result<usize, BookError> {
        let excludes = self
            .rules
            .exclude
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let root = canonical(self.root_dir);
        let output = canonical(self.output_dir);
        let mut files = BTreeSet::new();
        for pattern in self.rules.patterns(catalog) {
            for path in search(&root, &pattern)? {
                let Ok(relative) = path.strip_prefix(&root) else {
                    continue;
                };
                if excludes.iter().any(|exclude| {
                    exclude.matches_path_with(relative, EXCLUDE_OPTIONS)
                        || exclude.matches_path_with(&path, EXCLUDE_OPTIONS)
                }) {
                    tracing::trace!(path = %relative.display(), "Excluded asset");
                    continue;
                }
                if canonical(&path).starts_with(&output) {
                    continue;
                }
                files.insert(relative.to_path_buf());
            }
        }

        for relative in &files {
            let source = root.join(relative);
            let dest = self.rules.output_path(self.output_dir, relative);
            ensure_parent(&dest)?;
            fs::copy(&source, &dest).map_err(|e| BookError::io(&source, e))?;
            tracing::trace!(from = %source.display(), to = %dest.display(), "Copied asset");
        }

        tracing::info!(count = files.len(), "Copied assets");
        Ok(files.len())
    }
}

/// Regular files matching `pattern` below `root`.
fn search(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, BookError> {
    let escaped = Pattern::escape(&root.to_string_lossy());
    let full = format!("{}/{pattern}", escaped.trim_end_matches('/'));
    let paths = glob::glob(&full).map_err(|source| BookError::Glob {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            BookError::io(path, std::io::Error::from(e))
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn compile_pattern(pattern: &str) -> Result<Pattern, BookError> {
    Pattern::new(pattern).map_err(|source| BookError::Glob {
        pattern: pattern.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_config::PageDescriptor;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, relative).unwrap();
    }

    fn catalog(root: &Path) -> Catalog {
        let chapters = [PageDescriptor {
            slug: Some("intro".to_owned()),
            ..PageDescriptor::default()
        }];
        let extras = [PageDescriptor {
            slug: Some("preface".to_owned()),
            ..PageDescriptor::default()
        }];
        Catalog::build(
            root,
            &[
                (PageKind::Extra, extras.as_slice()),
                (PageKind::Chapter, chapters.as_slice()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_output_path_suffixes() {
        let rules = AssetRules {
            suffixes: BTreeMap::from([(".ts".to_owned(), ".txt".to_owned())]),
            ..AssetRules::default()
        };
        assert_eq!(
            rules.output_path(Path::new("/out"), Path::new("intro/code/main.ts")),
            PathBuf::from("/out/intro/code/main.txt")
        );
        assert_eq!(
            rules.output_path(Path::new("/out"), Path::new("intro/code/main.js")),
            PathBuf::from("/out/intro/code/main.js")
        );
    }

    #[test]
    fn test_finalize_copies_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        let out = dir.path().join("docs");
        touch(&root, "static/site.css");
        touch(&root, "static/draft.css");
        touch(&root, "intro/code/walk.js");
        touch(&root, "intro/code/types.ts");
        touch(&root, "intro/code/node_modules/x.js");
        touch(&root, "preface/code/skip.js");

        let rules = AssetRules {
            copy: vec!["static/*.css".to_owned()],
            source_files: vec!["*.js".to_owned(), "*.ts".to_owned()],
            exclude: vec!["**/draft.css".to_owned(), "**/node_modules/**".to_owned()],
            suffixes: BTreeMap::from([(".ts".to_owned(), ".txt".to_owned())]),
        };

        let count = AssetFinalizer::new(&rules, &root, &out)
            .finalize(&catalog(&root))
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(out.join("static/site.css")).unwrap(),
            "static/site.css"
        );
        assert!(out.join("intro/code/walk.js").exists());
        assert!(out.join("intro/code/types.txt").exists());
        assert!(!out.join("static/draft.css").exists());
        assert!(!out.join("intro/code/node_modules/x.js").exists());
        assert!(!out.join("preface/code/skip.js").exists());
    }

    #[test]
    fn test_exclude_star_stays_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        let out = dir.path().join("docs");
        touch(&root, "notes.txt");
        touch(&root, "intro/notes.txt");

        let rules = AssetRules {
            copy: vec!["**/*.txt".to_owned()],
            exclude: vec!["*.txt".to_owned()],
            ..AssetRules::default()
        };
        let count = AssetFinalizer::new(&rules, &root, &out)
            .finalize(&catalog(&root))
            .unwrap();
        assert_eq!(count, 1);
        assert!(!out.join("notes.txt").exists());
        assert!(out.join("intro/notes.txt").exists());
    }

    #[test]
    fn test_overlapping_patterns_copy_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        let out = dir.path().join("docs");
        touch(&root, "intro/a.js");

        let rules = AssetRules {
            copy: vec!["**/*.js".to_owned()],
            source_files: vec!["*.js".to_owned()],
            ..AssetRules::default()
        };
        let count = AssetFinalizer::new(&rules, &root, &out)
            .finalize(&catalog(&root))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_output_inside_root_not_copied() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let out = dir.path().join("docs");
        touch(root, "static/site.css");
        touch(root, "docs/static/site.css");

        let rules = AssetRules {
            copy: vec!["**/*.css".to_owned()],
            ..AssetRules::default()
        };
        let count = AssetFinalizer::new(&rules, root, &out)
            .finalize(&catalog(root))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let rules = AssetRules {
            exclude: vec!["[".to_owned()],
            ..AssetRules::default()
        };
        let err = AssetFinalizer::new(&rules, dir.path(), &dir.path().join("docs"))
            .finalize(&Catalog::default())
            .unwrap_err();
        assert!(matches!(err, BookError::Glob { .. }));
    }
}
