//! @dose
//! purpose: Turns the raw text of a `/** ... */` documentation comment into a structured
//!     Comment. Tokenizes the body into description, examples, tags and footer, then
//!     splits each tag into type, name and description and parses the type expression.
//!
//! when-editing:
//!     - !Tag tokenizing depends on takes_name(); a tag missing from that list keeps its name in the description
//!     - Malformed tags are errors in strict mode and dropped (with a warning) otherwise
//!     - Type expression errors propagate in both modes
//!
//! invariants:
//!     - parse_comment is a pure function of its input and options
//!     - Tags keep their source order; examples keep theirs
//!     - A tag with an empty body becomes a bare tag (title and raw only)
//!
//! do-not:
//!     - Never silently repair unbalanced braces in a tag type
//!
//! gotchas:
//!     - An `@example` line before any other tag is an Example, after one it is a Tag;
//!       jsdoc mode takes the `<caption>` off either form
//!     - With `unwrap: false` the input is a bare body, no `/**` stripping and no `*` markers
//!
//! flows:
//!     - Parse: strip delimiters -> tokenize lines -> tokenize each tag -> inline tags
//!     - Batch: parse_comments maps parse_comment over many inputs, one Result each

pub mod comment;
pub mod inline;
pub mod tag;
pub mod type_expr;

use crate::types::{Comment, ExampleKind, Tag};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub use comment::{strip_delimiters, tokenize_comment};
pub use inline::{collect_inline_tags, replace_inline_tags, InlineTagReplacer};
pub use tag::{takes_name, tokenize_tag, tokenize_tag_with, TagOptions};
pub use type_expr::{parse_type, SyntaxError};

static CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<caption>([\s\S]*?)</caption>[ \t]*\n?").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("invalid type expression: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("malformed tag `{tag}`: {message}")]
    MalformedTag { tag: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Input is a full `/** */` comment whose lines may carry `*` markers
    pub unwrap: bool,
    /// Fail on malformed tags instead of dropping them
    pub strict: bool,
    /// Split `<caption>` out of `@example` tags
    pub jsdoc: bool,
    /// Rewrite inline `{@tag}` references in descriptions
    pub replace_inline_tag: Option<InlineTagReplacer>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unwrap: true,
            strict: false,
            jsdoc: false,
            replace_inline_tag: None,
        }
    }
}

/// Parse one documentation comment.
pub fn parse_comment(text: &str, options: &ParseOptions) -> Result<Comment, CommentError> {
    let body = if options.unwrap {
        strip_delimiters(text)
    } else {
        text
    };
    let tokens = comment::tokenize(body, options.unwrap);

    let mut tags = Vec::with_capacity(tokens.tags.len());
    for raw in &tokens.tags {
        if raw.val.is_empty() {
            tags.push(Tag::bare(raw));
            continue;
        }

        let tag_options = TagOptions {
            name_allowed: takes_name(&raw.key),
            strict: options.strict,
        };
        let Some(mut tag) = tokenize_tag_with(raw, tag_options)? else {
            continue;
        };
        if options.jsdoc && tag.title == "example" {
            tag.caption = take_caption(&mut tag.description);
        }
        tags.push(tag);
    }

    let mut examples = tokens.examples;
    if options.jsdoc {
        for example in &mut examples {
            if example.kind == ExampleKind::Javadoc {
                example.caption = take_caption(&mut example.val);
            }
        }
    }

    let mut result = Comment {
        description: tokens.description,
        footer: tokens.footer,
        examples,
        tags,
        inline_tags: Vec::new(),
    };

    result.inline_tags = collect_inline_tags(&result.description);
    for tag in &result.tags {
        result.inline_tags.extend(collect_inline_tags(&tag.description));
    }

    if let Some(replacer) = &options.replace_inline_tag {
        result.description = replace_inline_tags(&result.description, replacer);
        for tag in &mut result.tags {
            tag.description = replace_inline_tags(&tag.description, replacer);
        }
    }

    tracing::debug!(
        tags = result.tags.len(),
        examples = result.examples.len(),
        inline = result.inline_tags.len(),
        "parsed comment"
    );
    Ok(result)
}

/// Parse many comments; each result stands on its own.
pub fn parse_comments<'a, I>(texts: I, options: &ParseOptions) -> Vec<Result<Comment, CommentError>>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(|text| parse_comment(text, options))
        .collect()
}

/// Split a leading `<caption>...</caption>` off `text`.
fn take_caption(text: &mut String) -> Option<String> {
    let (caption, len) = {
        let caps = CAPTION.captures(text.as_str())?;
        (caps[1].trim().to_string(), caps[0].len())
    };
    text.replace_range(..len, "");
    Some(caption)
}
