//! Data model shared by the tokenizers, the type parser and the CLI.

pub mod comment;
pub mod position;
pub mod type_node;

pub use comment::{Comment, Example, ExampleKind, InlineTag, RawTag, Tag, TokenizedComment};
pub use position::{Location, Position};
pub use type_node::{FieldType, TypeNode};
