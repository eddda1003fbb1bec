//! @dose
//! purpose: Configuration file parsing for parse-comments.toml. Holds exclusion patterns
//!     for directory walks and the default options used when parsing comments.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !CLI flags override the [parse] table; --exclude patterns are appended, not replaced
//!
//! invariants:
//!     - Config::load returns default config if parse-comments.toml doesn't exist or is invalid
//!     - Defaults match ParseOptions::default()
//!
//! gotchas:
//!     - replace_inline_tag only knows "handlebars"; other names log a warning and are ignored
//!     - Patterns are matched against paths relative to project root

use crate::parser::{InlineTagReplacer, ParseOptions};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "parse-comments.toml";

/// Main configuration structure matching parse-comments.toml
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Exclusion patterns (gitignore-style)
    pub exclude: Vec<String>,

    /// Default comment parsing settings
    pub parse: ParseSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParseSettings {
    pub strict: bool,
    pub jsdoc: bool,
    pub unwrap: bool,
    /// Name of a built-in inline tag replacer
    pub replace_inline_tag: Option<String>,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            strict: false,
            jsdoc: false,
            unwrap: true,
            replace_inline_tag: None,
        }
    }
}

impl ParseSettings {
    pub fn parse_options(&self) -> ParseOptions {
        let replace_inline_tag = self.replace_inline_tag.as_deref().and_then(|name| {
            let replacer = InlineTagReplacer::from_name(name);
            if replacer.is_none() {
                tracing::warn!(name, "unknown inline tag replacer in {}", CONFIG_FILE);
            }
            replacer
        });

        ParseOptions {
            unwrap: self.unwrap,
            strict: self.strict,
            jsdoc: self.jsdoc,
            replace_inline_tag,
        }
    }
}

impl Config {
    /// Load configuration from parse-comments.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }
}
