//! @dose
//! purpose: This module defines the command-line interface for parse-comments using the clap
//!     derive macros. It specifies all commands (parse, type, tokenize) and their arguments.
//!
//! when-editing:
//!     - !Each command struct must derive Args and be added to the Commands enum
//!     - !Global flags (root, verbose) are defined on Cli and propagate to all subcommands
//!     - Parse flags only switch options on; the config file supplies the rest
//!
//! invariants:
//!     - PathBuf is used for all file/directory path arguments
//!     - ParseArgs::parse_options never turns off a setting the config file enabled
//!
//! do-not:
//!     - Never add positional arguments that could conflict with subcommands
//!
//! gotchas:
//!     - tokenize accepts "-" (or no argument) to read the comment from stdin
//!     - The --root flag is global but optional; defaults to current directory in main.rs

use crate::config::ParseSettings;
use crate::exclusion::ExclusionConfig;
use crate::parser::{InlineTagReplacer, ParseOptions};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parse-comments")]
#[command(author, version, about = "Parse JSDoc-style documentation comments")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and parse doc comments from JavaScript/TypeScript sources
    Parse(ParseArgs),

    /// Parse a single type expression
    Type(TypeArgs),

    /// Show how a comment is split into description, examples and tags
    Tokenize(TokenizeArgs),
}

#[derive(Args, Default)]
pub struct ParseArgs {
    /// Specific files or directories to process (defaults to the root)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Fail on malformed tags instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Split <caption> out of @example tags
    #[arg(long)]
    pub jsdoc: bool,

    /// Treat comments as bare bodies: keep leading `*` characters
    #[arg(long)]
    pub no_unwrap: bool,

    /// Rewrite inline tags as handlebars helpers ({@link Foo} -> {{link "Foo"}})
    #[arg(long)]
    pub handlebars: bool,

    /// Exclude files/directories matching glob pattern (can be repeated)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Don't respect .gitignore files
    #[arg(long)]
    pub no_gitignore: bool,

    /// Print JSON on one line instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

impl ParseArgs {
    /// Create an ExclusionConfig from these options, merging with config file patterns
    pub fn exclusion_config(&self, config_patterns: &[String]) -> ExclusionConfig {
        let mut patterns = config_patterns.to_vec();
        patterns.extend(self.exclude.iter().cloned());
        ExclusionConfig {
            patterns,
            respect_gitignore: !self.no_gitignore,
        }
    }

    /// Config file settings with command-line flags applied on top
    pub fn parse_options(&self, settings: &ParseSettings) -> ParseOptions {
        let mut options = settings.parse_options();
        options.strict |= self.strict;
        options.jsdoc |= self.jsdoc;
        if self.no_unwrap {
            options.unwrap = false;
        }
        if self.handlebars {
            options.replace_inline_tag = Some(InlineTagReplacer::Handlebars);
        }
        options
    }
}

#[derive(Args)]
pub struct TypeArgs {
    /// Type expression, without the surrounding braces
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    pub expression: String,

    /// Print the syntax tree as JSON instead of the canonical expression
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct TokenizeArgs {
    /// File holding one comment (use "-" or omit for stdin)
    pub input: Option<PathBuf>,
}
