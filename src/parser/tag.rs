//! Splits the body of one `@tag` into its `{type}`, name and description.

use super::type_expr::parse_type;
use super::CommentError;
use crate::types::{RawTag, Tag, TypeNode};

/// Tags whose body carries a name after the optional type.
const NAMED_TAGS: &[&str] = &[
    "alias",
    "arg",
    "argument",
    "borrows",
    "callback",
    "class",
    "const",
    "constant",
    "constructor",
    "emits",
    "event",
    "external",
    "fires",
    "func",
    "function",
    "host",
    "interface",
    "lends",
    "listens",
    "member",
    "memberof",
    "method",
    "mixes",
    "mixin",
    "module",
    "name",
    "namespace",
    "param",
    "prop",
    "property",
    "requires",
    "template",
    "typedef",
    "var",
];

/// Whether text after the type of a `@title` tag starts with a name.
pub fn takes_name(title: &str) -> bool {
    NAMED_TAGS.contains(&title)
}

#[derive(Debug, Clone, Copy)]
pub struct TagOptions {
    /// Read a name between the type and the description
    pub name_allowed: bool,
    /// Report malformed tags as errors instead of dropping them
    pub strict: bool,
}

/// Lenient, like `ParseOptions::default()`.
impl Default for TagOptions {
    fn default() -> Self {
        Self {
            name_allowed: true,
            strict: false,
        }
    }
}

/// Tokenize a tag, failing on malformed braces or an unterminated `[name`.
///
/// Returns `Ok(None)` when the tag has no body.
pub fn tokenize_tag(tag: &RawTag, name_allowed: bool) -> Result<Option<Tag>, CommentError> {
    tokenize_tag_with(
        tag,
        TagOptions {
            name_allowed,
            strict: true,
        },
    )
}

/// Tokenize a tag; in non-strict mode a malformed tag yields `Ok(None)`.
/// Type expression errors are returned in both modes.
pub fn tokenize_tag_with(tag: &RawTag, options: TagOptions) -> Result<Option<Tag>, CommentError> {
    match split_tag(&tag.val, options.name_allowed) {
        Ok(None) => Ok(None),
        Ok(Some(parts)) => build_tag(tag, parts).map(Some),
        Err(message) if !options.strict => {
            tracing::warn!(tag = %tag.raw, %message, "dropping malformed tag");
            Ok(None)
        }
        Err(message) => Err(CommentError::MalformedTag {
            tag: tag.raw.clone(),
            message,
        }),
    }
}

#[derive(Debug, Default, PartialEq)]
struct TagParts {
    raw_type: String,
    /// Name as written, brackets included
    name: String,
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    Type,
    Name,
    Description,
}

fn split_tag(val: &str, name_allowed: bool) -> Result<Option<TagParts>, String> {
    if val.trim().is_empty() {
        return Ok(None);
    }

    let chars: Vec<char> = val.chars().collect();
    let after_type = if name_allowed {
        Field::Name
    } else {
        Field::Description
    };

    let mut parts = TagParts::default();
    let mut field = Field::Start;
    let mut inside = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match field {
            Field::Start => {
                if ch.is_whitespace() {
                    i += 1;
                } else if ch == '{' {
                    field = Field::Type;
                } else if ch == '}' {
                    return Err("missing opening `{` for type".to_string());
                } else {
                    field = after_type;
                }
                continue;
            }
            Field::Type => {
                parts.raw_type.push(ch);
                match ch {
                    '{' => inside += 1,
                    '}' => {
                        inside -= 1;
                        if inside == 0 {
                            field = after_type;
                        }
                    }
                    _ => {}
                }
            }
            Field::Name => {
                if parts.name.is_empty() {
                    if ch.is_whitespace() {
                        i += 1;
                        continue;
                    }
                    if ch == '[' {
                        let end = bracketed_name_end(&chars, i)?;
                        parts.name = chars[i..=end].iter().collect();
                        i = end + 1;
                        // the separating blank is not part of the description
                        if chars.get(i).is_some_and(|c| *c == ' ' || *c == '\t') {
                            i += 1;
                        }
                        field = Field::Description;
                        continue;
                    }
                }
                if ch.is_whitespace() {
                    field = Field::Description;
                } else if ch == '}' {
                    return Err("unexpected `}` in tag name".to_string());
                } else {
                    parts.name.push(ch);
                }
            }
            Field::Description => parts.description.push(ch),
        }
        i += 1;
    }

    if field == Field::Type {
        return Err(format!("unbalanced braces in type `{}`", parts.raw_type));
    }

    let mut description = parts.description.trim();
    if let Some(stripped) = description.strip_suffix("}}") {
        description = stripped.trim();
    }
    parts.description = description.to_string();

    Ok(Some(parts))
}

/// Index of the `]` closing the optional name opened at `start`. Brackets
/// and quotes inside a default value (`[a=['x]']]`) are skipped.
fn bracketed_name_end(chars: &[char], start: usize) -> Result<usize, String> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(_) if c == '\\' => i += 1,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    let partial: String = chars[start..].iter().collect();
    Err(format!("unterminated optional name `{}`", partial.trim_end()))
}

fn build_tag(raw: &RawTag, parts: TagParts) -> Result<Tag, CommentError> {
    let mut tag = Tag {
        title: raw.key.clone(),
        raw: raw.raw.clone(),
        raw_type: parts.raw_type,
        description: parts.description,
        ..Tag::default()
    };

    let optional = match parts
        .name
        .strip_prefix('[')
        .and_then(|n| n.strip_suffix(']'))
    {
        Some(inner) => {
            match inner.split_once('=') {
                Some((name, default)) => {
                    tag.name = name.trim().to_string();
                    let default = default.trim();
                    if !default.is_empty() {
                        tag.default = Some(default.to_string());
                    }
                }
                None => tag.name = inner.trim().to_string(),
            }
            true
        }
        None => {
            tag.name = parts.name;
            false
        }
    };

    let inner_type = tag
        .raw_type
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or("");
    if !inner_type.trim().is_empty() {
        let node = parse_type(inner_type)?;
        tag.type_node = Some(if optional && !node.is_optional() {
            TypeNode::optional(node)
        } else {
            node
        });
    }

    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use pretty_assertions::assert_eq;

    fn tag(key: &str, val: &str) -> RawTag {
        RawTag::new(key, val)
    }

    fn tokenize(key: &str, val: &str) -> Tag {
        tokenize_tag(&tag(key, val), takes_name(key))
            .unwrap()
            .expect("tag has a body")
    }

    #[test]
    fn test_optional_name_with_default() {
        let result = tokenize("param", "{String} [val=abc] some description");
        assert_eq!(result.title, "param");
        assert_eq!(result.name, "val");
        assert_eq!(result.default.as_deref(), Some("abc"));
        assert_eq!(result.description, "some description");
        assert_eq!(result.raw_type, "{String}");
        assert_eq!(
            result.type_node,
            Some(TypeNode::optional(TypeNode::name("String")))
        );
    }

    #[test]
    fn test_optional_name_default_variants() {
        let spaced = tokenize("param", "{String} [val = abc] desc");
        assert_eq!(spaced.name, "val");
        assert_eq!(spaced.default.as_deref(), Some("abc"));

        let quoted = tokenize("param", r#"{String} [val="foo bar"] desc"#);
        assert_eq!(quoted.default.as_deref(), Some(r#""foo bar""#));
        assert_eq!(quoted.description, "desc");

        let array = tokenize("param", "{Array} [val=['foo', ']']] desc");
        assert_eq!(array.name, "val");
        assert_eq!(array.default.as_deref(), Some("['foo', ']']"));
        assert_eq!(array.description, "desc");
    }

    #[test]
    fn test_optional_name_without_default() {
        let result = tokenize("param", "{number} [count] how many");
        assert_eq!(result.name, "count");
        assert_eq!(result.default, None);
        assert_eq!(
            result.type_node,
            Some(TypeNode::optional(TypeNode::name("number")))
        );
    }

    #[test]
    fn test_already_optional_type_is_not_wrapped_twice() {
        let result = tokenize("param", "{number=} [count]");
        assert_eq!(
            result.type_node,
            Some(TypeNode::optional(TypeNode::name("number")))
        );
    }

    #[test]
    fn test_nested_braces_in_type() {
        let result = tokenize("param", "{{stream: Writable}|String} options Stream or path");
        assert_eq!(result.raw_type, "{{stream: Writable}|String}");
        assert_eq!(result.name, "options");
        assert_eq!(result.description, "Stream or path");
        assert_eq!(
            result.type_node,
            Some(TypeNode::union(vec![
                TypeNode::record(vec![FieldType::new(
                    "stream",
                    Some(TypeNode::name("Writable"))
                )]),
                TypeNode::name("String"),
            ]))
        );
    }

    #[test]
    fn test_nameless_tag_puts_text_in_description() {
        let result = tokenize("returns", "{Boolean} true when done");
        assert_eq!(result.name, "");
        assert_eq!(result.description, "true when done");
        assert_eq!(result.type_node, Some(TypeNode::name("Boolean")));
    }

    #[test]
    fn test_tag_without_type() {
        let result = tokenize("param", "foo The foo");
        assert_eq!(result.raw_type, "");
        assert_eq!(result.name, "foo");
        assert_eq!(result.description, "The foo");
        assert_eq!(result.type_node, None);
    }

    #[test]
    fn test_description_keeps_unmatched_closing_brace() {
        let result = tokenize("param", "{Object} opts See {@link Foo}} for details }");
        assert_eq!(result.description, "See {@link Foo}} for details }");
    }

    #[test]
    fn test_trailing_double_brace_is_stripped() {
        let result = tokenize("returns", "{String} the {@link Foo}}");
        assert_eq!(result.description, "the {@link Foo");
    }

    #[test]
    fn test_multiline_description() {
        let result = tokenize("param", "{String} name The name,\n  which may span lines.");
        assert_eq!(result.name, "name");
        assert_eq!(result.description, "The name,\n  which may span lines.");
    }

    #[test]
    fn test_empty_body_is_none() {
        assert_eq!(tokenize_tag(&tag("private", "   "), false).unwrap(), None);
    }

    #[test]
    fn test_unterminated_optional_name_strict_vs_lenient() {
        let raw = tag("param", "{String} [val");
        let err = tokenize_tag(&raw, true).unwrap_err();
        assert!(matches!(err, CommentError::MalformedTag { .. }));

        let lenient = tokenize_tag_with(
            &raw,
            TagOptions {
                name_allowed: true,
                strict: false,
            },
        );
        assert_eq!(lenient, Ok(None));
    }

    #[test]
    fn test_default_options_are_lenient() {
        let options = TagOptions::default();
        assert!(options.name_allowed);
        assert_eq!(options.strict, crate::parser::ParseOptions::default().strict);
        assert_eq!(tokenize_tag_with(&tag("param", "{String} [val"), options), Ok(None));
    }

    #[test]
    fn test_missing_opening_brace_is_malformed() {
        let err = tokenize_tag(&tag("param", "String} foo"), true).unwrap_err();
        assert!(matches!(err, CommentError::MalformedTag { .. }));

        let err = tokenize_tag(&tag("param", "} foo"), true).unwrap_err();
        assert!(matches!(err, CommentError::MalformedTag { .. }));
    }

    #[test]
    fn test_unbalanced_type_is_malformed() {
        let err = tokenize_tag(&tag("param", "{{a: String} foo"), true).unwrap_err();
        assert!(matches!(err, CommentError::MalformedTag { .. }));
    }

    #[test]
    fn test_type_syntax_error_is_reported_even_when_lenient() {
        let raw = tag("param", "{String|} foo");
        let err = tokenize_tag_with(
            &raw,
            TagOptions {
                name_allowed: true,
                strict: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommentError::Syntax(_)));
    }

    #[test]
    fn test_rest_type_tag() {
        let result = tokenize("param", "{...(Array|String)} args The arguments");
        assert_eq!(
            result.type_node,
            Some(TypeNode::rest(TypeNode::union(vec![
                TypeNode::name("Array"),
                TypeNode::name("String"),
            ])))
        );
        assert_eq!(result.name, "args");
    }

    #[test]
    fn test_takes_name() {
        assert!(takes_name("param"));
        assert!(takes_name("property"));
        assert!(!takes_name("returns"));
        assert!(!takes_name("api"));
        assert!(!takes_name("example"));
    }
}
