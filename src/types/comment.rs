//! Tokens and results produced from a single documentation comment.

use super::position::Location;
use super::type_node::TypeNode;
use serde::Serialize;

/// How a code example was delimited inside the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// ```` ```lang ```` ... ```` ``` ````
    Fenced,
    /// `@example` followed by a body
    Javadoc,
    /// Lines indented by four or more spaces
    Indented,
}

/// A code sample found in the comment body.
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    #[serde(rename = "type")]
    pub kind: ExampleKind,
    /// Fence language, empty when none was given
    pub language: String,
    /// Paragraph introducing the example, empty when there is none
    pub description: String,
    /// Verbatim text, including fences or indentation
    pub raw: String,
    /// Body with markers and one level of indentation removed
    pub val: String,
    /// `<caption>` of a javadoc example, split off in jsdoc mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub loc: Location,
}

// Locations are positional metadata and do not take part in structural comparison.
impl PartialEq for Example {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.language == other.language
            && self.description == other.description
            && self.raw == other.raw
            && self.val == other.val
            && self.caption == other.caption
    }
}

/// A `@key val` tag as split out of the comment, before its body is tokenized.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "type", rename = "tag")]
pub struct RawTag {
    /// Original text of the tag, continuation lines included
    pub raw: String,
    /// Tag name without the `@`
    pub key: String,
    /// Trimmed remainder after the key
    pub val: String,
    pub loc: Location,
}

impl RawTag {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        let key = key.into();
        let val = val.into();
        let raw = if val.is_empty() {
            format!("@{}", key)
        } else {
            format!("@{} {}", key, val)
        };
        Self {
            raw,
            key,
            val,
            loc: Location::default(),
        }
    }
}

impl PartialEq for RawTag {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.key == other.key && self.val == other.val
    }
}

/// Output of the comment tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenizedComment {
    pub description: String,
    pub footer: String,
    pub examples: Vec<Example>,
    pub tags: Vec<RawTag>,
}

/// A tag whose body has been split into type, name and description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub title: String,
    pub raw: String,
    /// Type annotation including its outer braces, empty when absent
    pub raw_type: String,
    pub name: String,
    pub description: String,
    /// Default value from the `[name=value]` form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Parsed `raw_type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_node: Option<TypeNode>,
    /// `<caption>` of a jsdoc `@example`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Tag {
    /// A tag with no body, such as `@private`.
    pub fn bare(raw: &RawTag) -> Self {
        Self {
            title: raw.key.clone(),
            raw: raw.raw.clone(),
            ..Self::default()
        }
    }
}

/// An inline `{@name value}` reference found in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineTag {
    pub raw: String,
    pub name: String,
    pub value: String,
}

/// Fully parsed documentation comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub description: String,
    pub footer: String,
    pub examples: Vec<Example>,
    pub tags: Vec<Tag>,
    pub inline_tags: Vec<InlineTag>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::position::Position;
    use serde_json::json;

    #[test]
    fn test_raw_tag_serializes_type_tag() {
        let tag = RawTag::new("param", "{string} x");
        let value = serde_json::to_value(&tag).unwrap();
        assert_eq!(value["type"], json!("tag"));
        assert_eq!(value["raw"], json!("@param {string} x"));
        assert_eq!(value["key"], json!("param"));
    }

    #[test]
    fn test_raw_tag_equality_ignores_location() {
        let a = RawTag::new("returns", "{Number}");
        let mut b = a.clone();
        b.loc = Location::new(Position::new(4, 1), Position::new(4, 17));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tag_serializes_camel_case() {
        let tag = Tag {
            title: "param".to_string(),
            raw_type: "{String}".to_string(),
            type_node: Some(TypeNode::name("String")),
            ..Tag::default()
        };
        let value = serde_json::to_value(&tag).unwrap();
        assert_eq!(value["rawType"], json!("{String}"));
        assert_eq!(value["type"]["name"], json!("String"));
        assert!(value.get("default").is_none());
    }
}
