//! AST for JSDoc / Closure-style type expressions.
//!
//! Every node serializes with a `type` discriminant naming its kind
//! (`{"type": "NameExpression", "name": "Foo"}`), the shape used by most
//! JavaScript doc tooling.

use serde::Serialize;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeNode {
    /// A (possibly dotted) type name: `foo.bar.Baz`.
    NameExpression { name: String },
    /// `*`
    AllLiteral,
    /// A lone `?`
    NullableLiteral,
    /// A lone `!`
    NonNullableLiteral,
    /// `undefined`
    UndefinedLiteral,
    /// `void`
    VoidLiteral,
    /// `null`
    NullLiteral,
    StringLiteralType { value: String },
    NumericLiteralType { value: f64 },
    BooleanLiteralType { value: bool },
    /// `(A|B)` or `A|B`. `()` is the empty union.
    UnionType { elements: Vec<TypeNode> },
    /// `T=` or the optional-name form `[name=default]`.
    OptionalType {
        expression: Box<TypeNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// `?T` (prefix) or `T?` (suffix).
    NullableType {
        expression: Box<TypeNode>,
        prefix: bool,
    },
    /// `!T` (prefix) or `T!` (suffix).
    NonNullableType {
        expression: Box<TypeNode>,
        prefix: bool,
    },
    /// `...T`
    RestType { expression: Box<TypeNode> },
    /// Tuple-like bracket list: `[A, B, ...C]`.
    ArrayType { elements: Vec<TypeNode> },
    /// `{a: A, b}`
    RecordType { fields: Vec<FieldType> },
    /// `function(this:T, a, b=): R`
    FunctionType {
        params: Vec<TypeNode>,
        result: Option<Box<TypeNode>>,
        #[serde(rename = "this", skip_serializing_if = "Option::is_none")]
        this_type: Option<Box<TypeNode>>,
        #[serde(rename = "new", skip_serializing_if = "Option::is_none")]
        new_type: Option<Box<TypeNode>>,
    },
    /// Named function parameter `name: T`.
    ParameterType {
        name: String,
        expression: Box<TypeNode>,
    },
    /// `Foo<A, B>`, `Foo.<A>` and the `T[]` sugar.
    TypeApplication {
        expression: Box<TypeNode>,
        applications: Vec<TypeNode>,
    },
}

/// One `key: value` entry of a [`TypeNode::RecordType`]. A key without a
/// value (`{a}`) has `value: None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FieldType {
    pub key: String,
    pub value: Option<TypeNode>,
}

impl FieldType {
    pub fn new(key: impl Into<String>, value: Option<TypeNode>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl TypeNode {
    pub fn name(name: impl Into<String>) -> Self {
        TypeNode::NameExpression { name: name.into() }
    }

    pub fn union(elements: Vec<TypeNode>) -> Self {
        TypeNode::UnionType { elements }
    }

    pub fn optional(expression: TypeNode) -> Self {
        TypeNode::OptionalType {
            expression: Box::new(expression),
            default: None,
        }
    }

    pub fn rest(expression: TypeNode) -> Self {
        TypeNode::RestType {
            expression: Box::new(expression),
        }
    }

    pub fn nullable(expression: TypeNode, prefix: bool) -> Self {
        TypeNode::NullableType {
            expression: Box::new(expression),
            prefix,
        }
    }

    pub fn non_nullable(expression: TypeNode, prefix: bool) -> Self {
        TypeNode::NonNullableType {
            expression: Box::new(expression),
            prefix,
        }
    }

    pub fn record(fields: Vec<FieldType>) -> Self {
        TypeNode::RecordType { fields }
    }

    pub fn parameter(name: impl Into<String>, expression: TypeNode) -> Self {
        TypeNode::ParameterType {
            name: name.into(),
            expression: Box::new(expression),
        }
    }

    pub fn application(expression: TypeNode, applications: Vec<TypeNode>) -> Self {
        TypeNode::TypeApplication {
            expression: Box::new(expression),
            applications,
        }
    }

    /// `T[]` desugared: `Array<T>`.
    pub fn array_of(element: TypeNode) -> Self {
        Self::application(Self::name("Array"), vec![element])
    }

    /// Name of the node kind, matching the serialized `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeNode::NameExpression { .. } => "NameExpression",
            TypeNode::AllLiteral => "AllLiteral",
            TypeNode::NullableLiteral => "NullableLiteral",
            TypeNode::NonNullableLiteral => "NonNullableLiteral",
            TypeNode::UndefinedLiteral => "UndefinedLiteral",
            TypeNode::VoidLiteral => "VoidLiteral",
            TypeNode::NullLiteral => "NullLiteral",
            TypeNode::StringLiteralType { .. } => "StringLiteralType",
            TypeNode::NumericLiteralType { .. } => "NumericLiteralType",
            TypeNode::BooleanLiteralType { .. } => "BooleanLiteralType",
            TypeNode::UnionType { .. } => "UnionType",
            TypeNode::OptionalType { .. } => "OptionalType",
            TypeNode::NullableType { .. } => "NullableType",
            TypeNode::NonNullableType { .. } => "NonNullableType",
            TypeNode::RestType { .. } => "RestType",
            TypeNode::ArrayType { .. } => "ArrayType",
            TypeNode::RecordType { .. } => "RecordType",
            TypeNode::FunctionType { .. } => "FunctionType",
            TypeNode::ParameterType { .. } => "ParameterType",
            TypeNode::TypeApplication { .. } => "TypeApplication",
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeNode::OptionalType { .. })
    }
}
