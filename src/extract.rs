//! @dose
//! purpose: Pulls `/** ... */` documentation comments out of JavaScript and TypeScript
//!     sources with tree-sitter, recording where each one sits and what it documents.
//!
//! when-editing:
//!     - !The grammar depends on the file extension (javascript, typescript, tsx)
//!     - Only block comments opening with `/**` are doc comments; `/**/` is not
//!
//! invariants:
//!     - Comments are returned in source order
//!     - Locations are zero-based rows/columns in the source file
//!
//! do-not:
//!     - Never find comments with regex; string and template literals can contain `/**`
//!
//! gotchas:
//!     - tree-sitter recovers from syntax errors, so broken files still yield their comments
//!     - context is the first line of the next named sibling, which may be another statement
//!       entirely when the comment is dangling

use crate::types::{Location, Position};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tree_sitter::{Node, Parser, TreeCursor};

const CONTEXT_WIDTH: usize = 80;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("tree-sitter returned no syntax tree")]
    NoTree,
    #[error("Unsupported file extension: {0}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn parser(self) -> Result<Parser, ExtractError> {
        let mut parser = Parser::new();
        let language = match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        };
        parser.set_language(&language)?;
        Ok(parser)
    }
}

/// A documentation comment found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// Comment text including `/**` and `*/`
    pub text: String,
    pub loc: Location,
    /// First line of the code the comment precedes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

pub fn extract_doc_comments(
    source: &str,
    language: SourceLanguage,
) -> Result<Vec<DocComment>, ExtractError> {
    let mut parser = language.parser()?;
    let tree = parser.parse(source, None).ok_or(ExtractError::NoTree)?;

    let mut comments = Vec::new();
    let mut cursor = tree.root_node().walk();
    visit_comments(&mut cursor, source, &mut comments);

    tracing::debug!(?language, count = comments.len(), "extracted doc comments");
    Ok(comments)
}

/// Read `path` and extract its doc comments, picking the grammar from the extension.
pub fn extract_from_file(path: &Path) -> Result<Vec<DocComment>, ExtractError> {
    let language = SourceLanguage::from_path(path).ok_or_else(|| {
        ExtractError::UnsupportedLanguage(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;
    let source = fs::read_to_string(path)?;
    extract_doc_comments(&source, language)
}

fn visit_comments(cursor: &mut TreeCursor, source: &str, out: &mut Vec<DocComment>) {
    loop {
        let node = cursor.node();
        if node.kind() == "comment" {
            if let Some(comment) = doc_comment(node, source) {
                out.push(comment);
            }
        } else if cursor.goto_first_child() {
            visit_comments(cursor, source, out);
            cursor.goto_parent();
        }

        if !cursor.goto_next_sibling() {
            break;
        }
    }
}

fn doc_comment(node: Node, source: &str) -> Option<DocComment> {
    let text = source.get(node.byte_range())?;
    if !text.starts_with("/**") || text.starts_with("/**/") {
        return None;
    }

    let start = node.start_position();
    let end = node.end_position();
    Some(DocComment {
        text: text.to_string(),
        loc: Location::new(
            Position::new(start.row, start.column),
            Position::new(end.row, end.column),
        ),
        context: context_of(node, source),
    })
}

fn context_of(node: Node, source: &str) -> Option<String> {
    let mut next = node.next_named_sibling()?;
    while next.kind() == "comment" {
        next = next.next_named_sibling()?;
    }

    let line = source.get(next.byte_range())?.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.chars().take(CONTEXT_WIDTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const JS: &str = r#"// plain line comment
/* not a doc comment */

/**
 * Adds two numbers.
 * @param {number} a
 * @param {number} b
 */
function add(a, b) {
  return a + b;
}

const s = "/** inside a string */";

class Counter {
  /** Current value. */
  value = 0;

  /**
   * Increment the counter.
   * @returns {number}
   */
  increment() {
    return ++this.value;
  }
}
/**/
"#;

    #[test]
    fn test_extracts_only_doc_comments() {
        let comments = extract_doc_comments(JS, SourceLanguage::JavaScript).unwrap();
        assert_eq!(comments.len(), 3);
        assert!(comments[0].text.starts_with("/**\n * Adds two numbers."));
        assert_eq!(comments[1].text, "/** Current value. */");
        assert!(comments[2].text.contains("Increment the counter."));
    }

    #[test]
    fn test_locations_are_zero_based() {
        let comments = extract_doc_comments(JS, SourceLanguage::JavaScript).unwrap();
        assert_eq!(comments[0].loc.start, Position::new(3, 0));
        assert_eq!(comments[0].loc.end, Position::new(7, 3));
        assert_eq!(comments[1].loc.start, Position::new(15, 2));
    }

    #[test]
    fn test_context_is_the_documented_code() {
        let comments = extract_doc_comments(JS, SourceLanguage::JavaScript).unwrap();
        assert_eq!(comments[0].context.as_deref(), Some("function add(a, b) {"));
        assert_eq!(comments[2].context.as_deref(), Some("increment() {"));
    }

    #[test]
    fn test_typescript_and_tsx() {
        let ts = "/** A point. */\nexport interface Point { x: number; y: number }\n";
        let comments = extract_doc_comments(ts, SourceLanguage::TypeScript).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(
            comments[0].context.as_deref(),
            Some("export interface Point { x: number; y: number }")
        );

        let tsx = "/** Renders a title. */\nexport const Title = () => <h1>Hi</h1>;\n";
        let comments = extract_doc_comments(tsx, SourceLanguage::Tsx).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "/** Renders a title. */");
    }

    #[test]
    fn test_source_language_from_path() {
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("a/b.mjs")),
            Some(SourceLanguage::JavaScript)
        );
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("b.cts")),
            Some(SourceLanguage::TypeScript)
        );
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("c.tsx")),
            Some(SourceLanguage::Tsx)
        );
        assert_eq!(SourceLanguage::from_path(&PathBuf::from("d.rs")), None);
        assert_eq!(SourceLanguage::from_path(&PathBuf::from("Makefile")), None);
    }

    #[test]
    fn test_extract_from_file_rejects_unknown_extension() {
        let err = extract_from_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedLanguage(ext) if ext == "txt"));
    }

    #[test]
    fn test_extract_from_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/sample.js");
        let comments = extract_from_file(&path).unwrap();
        assert!(!comments.is_empty());
    }
}
