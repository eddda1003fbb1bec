//! @toon
//! purpose: This is the library crate root for parse-comments, exposing the comment parser,
//!     the type-expression parser and the source extraction used by the CLI.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - !Re-exports should include commonly used types and functions
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - The public API surface is stable - all re-exported items are public contract
//!     - Parsing functions are pure; only extract, exclusion, config and commands touch the filesystem
//!
//! do-not:
//!     - Never remove a re-export without major version bump (breaking change)
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod cli;
pub mod commands;
pub mod config;
pub mod exclusion;
pub mod extract;
pub mod formatter;
pub mod parser;
pub mod types;

// Re-export main types for convenience
pub use cli::{Cli, Commands, ParseArgs, TokenizeArgs, TypeArgs};
pub use extract::{
    extract_doc_comments, extract_from_file, DocComment, ExtractError, SourceLanguage,
};
pub use formatter::stringify_type;
pub use parser::{
    collect_inline_tags, parse_comment, parse_comments, parse_type, replace_inline_tags,
    takes_name, tokenize_comment, tokenize_tag, tokenize_tag_with, CommentError,
    InlineTagReplacer, ParseOptions, SyntaxError, TagOptions,
};
pub use types::{
    Comment, Example, ExampleKind, FieldType, InlineTag, Location, Position, RawTag, Tag,
    TokenizedComment, TypeNode,
};
