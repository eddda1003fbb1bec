//! @dose
//! purpose: Writes a TypeNode back out as type-expression text in one canonical spelling,
//!     used by the `type` command and anywhere a parsed type has to be displayed.
//!
//! when-editing:
//!     - !Output must re-parse to a structurally equal node; keep in step with parser/type_expr
//!     - Unions are always parenthesized so they can nest anywhere
//!
//! invariants:
//!     - parse_type(stringify_type(&n)) == n for every n produced by parse_type
//!     - Numbers use JavaScript's canonical form (`32`, `1e+21`)
//!
//! gotchas:
//!     - A one-element ArrayType is written `[A,]`; `[A]` would read back as an optional name
//!     - OptionalType with a default is only expressible as `[name=default]`

use crate::parser::type_expr::numeric::format_number;
use crate::parser::type_expr::{Lexer, Token, TokenKind};
use crate::types::{FieldType, TypeNode};

/// Canonical text for a type expression.
pub fn stringify_type(node: &TypeNode) -> String {
    match node {
        TypeNode::NameExpression { name } => name_text(name),
        TypeNode::AllLiteral => "*".to_string(),
        TypeNode::NullableLiteral => "?".to_string(),
        TypeNode::NonNullableLiteral => "!".to_string(),
        TypeNode::UndefinedLiteral => "undefined".to_string(),
        TypeNode::VoidLiteral => "void".to_string(),
        TypeNode::NullLiteral => "null".to_string(),
        TypeNode::StringLiteralType { value } => quote(value),
        TypeNode::NumericLiteralType { value } => format_number(*value),
        TypeNode::BooleanLiteralType { value } => value.to_string(),
        TypeNode::UnionType { elements } => format!("({})", join(elements, "|")),
        TypeNode::OptionalType {
            expression,
            default: Some(default),
        } => match expression.as_ref() {
            TypeNode::NameExpression { name } => format!("[{}={}]", name, default),
            other => format!("{}=", stringify_type(other)),
        },
        TypeNode::OptionalType {
            expression,
            default: None,
        } => format!("{}=", stringify_type(expression)),
        TypeNode::NullableType { expression, prefix } => {
            affix("?", stringify_type(expression), *prefix)
        }
        TypeNode::NonNullableType { expression, prefix } => {
            affix("!", stringify_type(expression), *prefix)
        }
        TypeNode::RestType { expression } => format!("...{}", stringify_type(expression)),
        TypeNode::ArrayType { elements } if elements.len() == 1 && !is_rest(&elements[0]) => {
            format!("[{},]", stringify_type(&elements[0]))
        }
        TypeNode::ArrayType { elements } => format!("[{}]", join(elements, ", ")),
        TypeNode::RecordType { fields } => {
            let fields: Vec<String> = fields.iter().map(field_text).collect();
            format!("{{{}}}", fields.join(", "))
        }
        TypeNode::FunctionType {
            params,
            result,
            this_type,
            new_type,
        } => {
            let mut parts = Vec::new();
            if let Some(this_type) = this_type {
                parts.push(format!("this:{}", stringify_type(this_type)));
            }
            if let Some(new_type) = new_type {
                parts.push(format!("new:{}", stringify_type(new_type)));
            }
            parts.extend(params.iter().map(stringify_type));

            let mut out = format!("function({})", parts.join(", "));
            if let Some(result) = result {
                out.push_str(": ");
                out.push_str(&stringify_type(result));
            }
            out
        }
        TypeNode::ParameterType { name, expression } => {
            format!("{}: {}", name, stringify_type(expression))
        }
        TypeNode::TypeApplication {
            expression,
            applications,
        } => format!("{}<{}>", stringify_type(expression), join(applications, ", ")),
    }
}

fn join(nodes: &[TypeNode], separator: &str) -> String {
    nodes
        .iter()
        .map(stringify_type)
        .collect::<Vec<_>>()
        .join(separator)
}

fn affix(symbol: &str, inner: String, prefix: bool) -> String {
    if prefix {
        format!("{}{}", symbol, inner)
    } else {
        format!("{}{}", inner, symbol)
    }
}

fn is_rest(node: &TypeNode) -> bool {
    matches!(node, TypeNode::RestType { .. })
}

fn field_text(field: &FieldType) -> String {
    let key = if is_identifier(&field.key) {
        field.key.clone()
    } else {
        quote(&field.key)
    };
    match &field.value {
        Some(value) => format!("{}: {}", key, stringify_type(value)),
        None => key,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Names the lexer would not read back as one name are written in backticks.
fn name_text(name: &str) -> String {
    let mut lexer = Lexer::new(name);
    let whole_name = matches!(
        lexer.next_token(),
        Ok(Token { kind: TokenKind::Name(n), .. }) if n == name
    );
    let plain = whole_name
        && matches!(lexer.next_token(), Ok(Token { kind: TokenKind::Eof, .. }));
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
