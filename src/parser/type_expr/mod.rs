//! @dose
//! purpose: Entry point of the type-expression parser. Turns the text between a tag's
//!     outer braces (`(Array|String)`, `function(a:b=): c`, `{a: number}`) into a TypeNode.
//!
//! when-editing:
//!     - !The caller strips the tag's outer braces; `{}` here is an empty record, not a wrapper
//!     - The `[name]` / `[name=default]` optional-name form is only recognized for the whole input
//!
//! invariants:
//!     - parse_type either returns a complete node or a SyntaxError, never a partial tree
//!     - Parsing holds no state beyond one call; concurrent calls need no locking
//!
//! gotchas:
//!     - `()` is the empty union and `(A)` a one-element union, not a plain A
//!     - Record keys given as numbers are normalized (`0x20` -> `32`)

mod lexer;
pub mod numeric;
mod parser;

use crate::types::TypeNode;
use thiserror::Error;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Delimiter, TypeParser};

/// Malformed type expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset} (near `{fragment}`)")]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset into the type expression
    pub offset: usize,
    /// Source text starting at `offset`, shortened
    pub fragment: String,
}

impl SyntaxError {
    pub(crate) fn at(message: impl Into<String>, source: &str, offset: usize) -> Self {
        let fragment: String = source.get(offset..).unwrap_or("").chars().take(24).collect();
        Self {
            message: message.into(),
            offset,
            fragment,
        }
    }
}

/// Parse a type expression, e.g. `string|number`, `...(Array|String)`, `{a: b}`.
pub fn parse_type(src: &str) -> Result<TypeNode, SyntaxError> {
    if let Some(node) = optional_name(src) {
        return Ok(node);
    }

    let mut parser = TypeParser::new(src)?;
    let node = parser.parse_top()?;
    parser.finish()?;
    tracing::trace!(expr = src, kind = node.kind(), "parsed type expression");
    Ok(node)
}

/// The bracketed optional-name form: `[foo]`, `[foo=bar]`.
fn optional_name(src: &str) -> Option<TypeNode> {
    let inner = src.trim().strip_prefix('[')?.strip_suffix(']')?;
    let (name, default) = match inner.split_once('=') {
        Some((name, default)) => (name.trim(), Some(default.trim())),
        None => (inner.trim(), None),
    };

    if !is_bare_name(name) {
        return None;
    }

    Some(TypeNode::OptionalType {
        expression: Box::new(TypeNode::name(name)),
        default: default.filter(|d| !d.is_empty()).map(str::to_string),
    })
}

fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> TypeNode {
        parse_type(src).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", src, e))
    }

    #[test]
    fn test_empty_record_and_union() {
        assert_eq!(parse("{}"), TypeNode::record(vec![]));
        assert_eq!(parse("{,}"), TypeNode::record(vec![]));
        assert_eq!(parse("()"), TypeNode::union(vec![]));
    }

    #[test]
    fn test_bare_union_keeps_source_order() {
        assert_eq!(
            parse("string|number|Test"),
            TypeNode::union(vec![
                TypeNode::name("string"),
                TypeNode::name("number"),
                TypeNode::name("Test"),
            ])
        );
        assert_eq!(parse("(string|number|Test)"), parse("string|number|Test"));
    }

    #[test]
    fn test_array_sugar_matches_applications() {
        let expected = TypeNode::array_of(TypeNode::name("String"));
        assert_eq!(parse("Array<String>"), expected);
        assert_eq!(parse("Array.<String>"), expected);
        assert_eq!(parse("String[]"), expected);
    }

    #[test]
    fn test_named_optional_function_param() {
        assert_eq!(
            parse("function(a:b=)"),
            TypeNode::FunctionType {
                params: vec![TypeNode::optional(TypeNode::parameter(
                    "a",
                    TypeNode::name("b")
                ))],
                result: None,
                this_type: None,
                new_type: None,
            }
        );
    }

    #[test]
    fn test_record_inside_parenthesized_union() {
        assert_eq!(
            parse("({stream: Writable}|String|Array)"),
            TypeNode::union(vec![
                TypeNode::record(vec![FieldType::new(
                    "stream",
                    Some(TypeNode::name("Writable"))
                )]),
                TypeNode::name("String"),
                TypeNode::name("Array"),
            ])
        );
    }

    #[test]
    fn test_record_then_bare_union() {
        assert_eq!(
            parse("{stream: Writable}|String"),
            TypeNode::union(vec![
                TypeNode::record(vec![FieldType::new(
                    "stream",
                    Some(TypeNode::name("Writable"))
                )]),
                TypeNode::name("String"),
            ])
        );
    }

    #[test]
    fn test_rest_of_parenthesized_union() {
        assert_eq!(
            parse("...(Array|String)"),
            TypeNode::rest(TypeNode::union(vec![
                TypeNode::name("Array"),
                TypeNode::name("String"),
            ]))
        );
    }

    #[test]
    fn test_rest_of_optional() {
        assert_eq!(
            parse("...number="),
            TypeNode::rest(TypeNode::optional(TypeNode::name("number")))
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("*"), TypeNode::AllLiteral);
        assert_eq!(parse("?"), TypeNode::NullableLiteral);
        assert_eq!(parse("!"), TypeNode::NonNullableLiteral);
        assert_eq!(parse("undefined"), TypeNode::UndefinedLiteral);
        assert_eq!(parse("null"), TypeNode::NullLiteral);
        assert_eq!(parse("void"), TypeNode::VoidLiteral);
        assert_eq!(parse("true"), TypeNode::BooleanLiteralType { value: true });
        assert_eq!(
            parse("'foo'"),
            TypeNode::StringLiteralType {
                value: "foo".to_string()
            }
        );
        assert_eq!(parse("0x10"), TypeNode::NumericLiteralType { value: 16.0 });
        assert_eq!(parse("-1.5e2"), TypeNode::NumericLiteralType { value: -150.0 });
    }

    #[test]
    fn test_prefix_and_suffix_modifiers() {
        assert_eq!(parse("?string"), TypeNode::nullable(TypeNode::name("string"), true));
        assert_eq!(parse("string?"), TypeNode::nullable(TypeNode::name("string"), false));
        assert_eq!(parse("!Object"), TypeNode::non_nullable(TypeNode::name("Object"), true));
        assert_eq!(parse("Object!"), TypeNode::non_nullable(TypeNode::name("Object"), false));
        assert_eq!(parse("string="), TypeNode::optional(TypeNode::name("string")));
    }

    #[test]
    fn test_prefix_binds_to_single_atom() {
        assert_eq!(
            parse("?string|number"),
            TypeNode::union(vec![
                TypeNode::nullable(TypeNode::name("string"), true),
                TypeNode::name("number"),
            ])
        );
        assert_eq!(
            parse("?(string|number)"),
            TypeNode::nullable(
                TypeNode::union(vec![TypeNode::name("string"), TypeNode::name("number")]),
                true
            )
        );
    }

    #[test]
    fn test_postfix_binds_tighter_than_prefix() {
        assert_eq!(
            parse("?string[]"),
            TypeNode::nullable(TypeNode::array_of(TypeNode::name("string")), true)
        );
    }

    #[test]
    fn test_backtick_names_are_stripped() {
        assert_eq!(parse("`Foo.Bar`"), TypeNode::name("Foo.Bar"));
    }

    #[test]
    fn test_optional_name_form() {
        assert_eq!(parse("[foo]"), TypeNode::optional(TypeNode::name("foo")));
        assert_eq!(
            parse("[foo = bar]"),
            TypeNode::OptionalType {
                expression: Box::new(TypeNode::name("foo")),
                default: Some("bar".to_string()),
            }
        );
    }

    #[test]
    fn test_array_type_with_rest_and_trailing_comma() {
        assert_eq!(
            parse("[number, string, ...boolean]"),
            TypeNode::ArrayType {
                elements: vec![
                    TypeNode::name("number"),
                    TypeNode::name("string"),
                    TypeNode::rest(TypeNode::name("boolean")),
                ]
            }
        );
        assert_eq!(
            parse("[number, string,]"),
            TypeNode::ArrayType {
                elements: vec![TypeNode::name("number"), TypeNode::name("string")]
            }
        );
    }

    #[test]
    fn test_record_keys() {
        assert_eq!(
            parse(r#"{a: number, "b c": string, 0x20, .2: x, d}"#),
            TypeNode::record(vec![
                FieldType::new("a", Some(TypeNode::name("number"))),
                FieldType::new("b c", Some(TypeNode::name("string"))),
                FieldType::new("32", None),
                FieldType::new("0.2", Some(TypeNode::name("x"))),
                FieldType::new("d", None),
            ])
        );
    }

    #[test]
    fn test_record_string_key_escapes() {
        assert_eq!(
            parse(r#"{"A\x42\n": C}"#),
            TypeNode::record(vec![FieldType::new("AB\n", Some(TypeNode::name("C")))])
        );
    }

    #[test]
    fn test_nested_records() {
        assert_eq!(
            parse("{a: {b: {c: d}}}"),
            TypeNode::record(vec![FieldType::new(
                "a",
                Some(TypeNode::record(vec![FieldType::new(
                    "b",
                    Some(TypeNode::record(vec![FieldType::new(
                        "c",
                        Some(TypeNode::name("d"))
                    )]))
                )]))
            )])
        );
    }

    #[test]
    fn test_generic_with_several_applications() {
        assert_eq!(
            parse("Object.<string, Array<number>>"),
            TypeNode::application(
                TypeNode::name("Object"),
                vec![
                    TypeNode::name("string"),
                    TypeNode::array_of(TypeNode::name("number")),
                ]
            )
        );
    }

    #[test]
    fn test_function_type_full() {
        assert_eq!(
            parse("function(this:Foo, string, ...number): boolean"),
            TypeNode::FunctionType {
                params: vec![
                    TypeNode::name("string"),
                    TypeNode::rest(TypeNode::name("number")),
                ],
                result: Some(Box::new(TypeNode::name("boolean"))),
                this_type: Some(Box::new(TypeNode::name("Foo"))),
                new_type: None,
            }
        );
    }

    #[test]
    fn test_function_type_new_and_void_result() {
        assert_eq!(
            parse("function(new:Foo): void"),
            TypeNode::FunctionType {
                params: vec![],
                result: Some(Box::new(TypeNode::VoidLiteral)),
                this_type: None,
                new_type: Some(Box::new(TypeNode::name("Foo"))),
            }
        );
    }

    #[test]
    fn test_function_name_without_parens_is_a_name() {
        assert_eq!(parse("function"), TypeNode::name("function"));
    }

    #[test]
    fn test_errors() {
        for src in [
            "(string|number",
            "{a: string",
            "[string",
            "Array.<string",
            "string|",
            "'abc",
            "function(string",
            "string number",
            "{a b}",
            "",
        ] {
            assert!(parse_type(src).is_err(), "expected error for {:?}", src);
        }
    }

    #[test]
    fn test_unterminated_error_points_at_opening_delimiter() {
        let err = parse_type("foo|(bar|baz").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("unterminated"), "{}", err.message);
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let err = parse_type(&"(".repeat(10_000)).unwrap_err();
        assert!(err.message.contains("nested too deeply"), "{}", err.message);

        let balanced = format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000));
        assert!(parse_type(&balanced).is_err());

        let results = "function():".repeat(5_000) + "a";
        let err = parse_type(&results).unwrap_err();
        assert!(err.message.contains("nested too deeply"), "{}", err.message);

        let generics = format!("{}a{}", "Array<".repeat(5_000), ">".repeat(5_000));
        assert!(parse_type(&generics).is_err());
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let nested = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert!(parse_type(&nested).is_ok());
    }
}
