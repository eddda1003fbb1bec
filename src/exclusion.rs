//! @dose
//! purpose: Finds the JavaScript/TypeScript sources to scan for doc comments, honoring
//!     gitignore files, built-in exclusions and patterns from parse-comments.toml/--exclude.
//!
//! when-editing:
//!     - !Override patterns use ! prefix to negate (exclude), so we add ! to user patterns
//!     - The ignore crate handles gitignore parsing automatically
//!
//! invariants:
//!     - Default exclusions (node_modules, .git, build output) are always applied
//!     - Gitignore is respected by default unless --no-gitignore is passed
//!     - collect_source_files returns paths sorted, so output order is stable
//!
//! gotchas:
//!     - The ignore crate's override patterns are inclusive by default, so we negate them
//!     - Minified bundles (*.min.js) are skipped; their comments are not worth parsing

use crate::extract::SourceLanguage;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Configuration for file exclusion during directory walking
pub struct ExclusionConfig {
    /// Glob patterns to exclude (config file plus --exclude flags)
    pub patterns: Vec<String>,
    /// Whether to respect .gitignore files (default: true)
    pub respect_gitignore: bool,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Directories never worth walking in a JS/TS project
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    ".next",
    ".nuxt",
    ".turbo",
    ".cache",
    "bower_components",
];

const DEFAULT_EXCLUDED_FILES: &[&str] = &["*.min.js", "*.bundle.js"];

/// Build a WalkBuilder with the given exclusion configuration
pub fn build_walker(root: &Path, config: &ExclusionConfig) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.git_ignore(config.respect_gitignore);
    builder.git_global(config.respect_gitignore);
    builder.git_exclude(config.respect_gitignore);
    // .git is excluded by name below; other dotfiles (.eslintrc.js) may carry comments
    builder.hidden(false);

    let mut overrides = OverrideBuilder::new(root);

    for dir in DEFAULT_EXCLUDED_DIRS {
        let _ = overrides.add(&format!("!{}/**", dir));
        let _ = overrides.add(&format!("!{}", dir));
    }
    for file in DEFAULT_EXCLUDED_FILES {
        let _ = overrides.add(&format!("!{}", file));
    }

    for pattern in &config.patterns {
        if let Err(e) = overrides.add(&format!("!{}", pattern)) {
            tracing::warn!("invalid exclude pattern '{}': {}", pattern, e);
        }
    }

    match overrides.build() {
        Ok(built) => {
            builder.overrides(built);
        }
        Err(e) => tracing::warn!("ignoring exclude patterns: {}", e),
    }

    builder
}

/// All files under `root` with a supported source extension.
pub fn collect_source_files(root: &Path, config: &ExclusionConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = build_walker(root, config)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| SourceLanguage::from_path(path).is_some())
        .collect();
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "collected source files");
    files
}
