//! Recursive-descent grammar for type expressions.
//!
//! Binding, tightest first: atoms, postfix `?` `!` `[]`, prefix `?` `!`,
//! `|` unions, and finally the top-level `=` / `...` modifiers.

use super::lexer::{Lexer, Token, TokenKind};
use super::numeric::format_number;
use super::SyntaxError;
use crate::types::{FieldType, TypeNode};

/// Kinds of delimiter the parser can be nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Brace,
    Bracket,
    Angle,
}

impl Delimiter {
    fn close(self) -> TokenKind {
        match self {
            Delimiter::Paren => TokenKind::RParen,
            Delimiter::Brace => TokenKind::RBrace,
            Delimiter::Bracket => TokenKind::RBracket,
            Delimiter::Angle => TokenKind::Gt,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Delimiter::Paren => "(",
            Delimiter::Brace => "{",
            Delimiter::Bracket => "[",
            Delimiter::Angle => "<",
        }
    }
}

/// Deepest nesting of type expressions accepted before giving up.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: Delimiter,
    offset: usize,
}

pub struct TypeParser<'a> {
    lexer: Lexer<'a>,
    token: Token,
    open: Vec<OpenDelimiter>,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    pub fn new(src: &'a str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(src);
        let token = lexer.next_token()?;
        Ok(Self {
            lexer,
            token,
            open: Vec::new(),
            depth: 0,
        })
    }

    /// Whether the cursor is currently nested inside `kind`.
    pub fn is_inside(&self, kind: Delimiter) -> bool {
        self.open.iter().any(|d| d.kind == kind)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.token.kind == kind
    }

    fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn peek(&self) -> Result<TokenKind, SyntaxError> {
        let mut lookahead = self.lexer.clone();
        Ok(lookahead.next_token()?.kind)
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(message, self.lexer.source(), self.token.offset)
    }

    fn unexpected(&self) -> SyntaxError {
        if self.at(&TokenKind::Eof) {
            if let Some(open) = self.open.last() {
                return self.unterminated(*open);
            }
            return self.error_here("unexpected end of type expression");
        }
        self.error_here(format!("unexpected {}", self.token.kind.describe()))
    }

    fn unterminated(&self, open: OpenDelimiter) -> SyntaxError {
        SyntaxError::at(
            format!("unterminated `{}`", open.kind.symbol()),
            self.lexer.source(),
            open.offset,
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.at(&kind) {
            self.advance()?;
            return Ok(());
        }
        if self.at(&TokenKind::Eof) {
            return Err(self.unexpected());
        }
        Err(self.error_here(format!(
            "expected {} but found {}",
            kind.describe(),
            self.token.kind.describe()
        )))
    }

    /// Consume the opening token and push it on the delimiter stack.
    fn open(&mut self, kind: Delimiter) -> Result<(), SyntaxError> {
        self.open.push(OpenDelimiter {
            kind,
            offset: self.token.offset,
        });
        self.advance()?;
        Ok(())
    }

    fn close(&mut self, kind: Delimiter) -> Result<(), SyntaxError> {
        self.expect(kind.close())?;
        self.open.pop();
        Ok(())
    }

    /// Token that ends a type, making a preceding `?`/`!` a literal.
    fn at_type_end(&self) -> bool {
        match self.token.kind {
            TokenKind::Comma
            | TokenKind::Equal
            | TokenKind::Pipe
            | TokenKind::Eof
            | TokenKind::RBrace
            | TokenKind::RParen => true,
            TokenKind::Gt => self.is_inside(Delimiter::Angle),
            TokenKind::RBracket => self.is_inside(Delimiter::Bracket),
            _ => false,
        }
    }

    /// Fail unless the whole input was consumed.
    pub fn finish(&self) -> Result<(), SyntaxError> {
        if self.at(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error_here(format!(
                "unexpected {} after type expression",
                self.token.kind.describe()
            )))
        }
    }

    /// `...T`, `T=`, or a plain union.
    pub fn parse_top(&mut self) -> Result<TypeNode, SyntaxError> {
        if self.at(&TokenKind::Rest) {
            self.advance()?;
            let inner = self.parse_optional()?;
            return Ok(TypeNode::rest(inner));
        }
        self.parse_optional()
    }

    fn parse_optional(&mut self) -> Result<TypeNode, SyntaxError> {
        let expr = self.parse_union()?;
        if self.at(&TokenKind::Equal) {
            self.advance()?;
            return Ok(TypeNode::optional(expr));
        }
        Ok(expr)
    }

    fn parse_union(&mut self) -> Result<TypeNode, SyntaxError> {
        let first = self.parse_type_expression()?;
        if !self.at(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut elements = vec![first];
        while self.at(&TokenKind::Pipe) {
            self.advance()?;
            elements.push(self.parse_type_expression()?);
        }
        Ok(TypeNode::union(elements))
    }

    fn parse_type_expression(&mut self) -> Result<TypeNode, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here("type expression nested too deeply"));
        }
        self.depth += 1;
        let expr = self.parse_prefixed();
        self.depth -= 1;
        expr
    }

    fn parse_prefixed(&mut self) -> Result<TypeNode, SyntaxError> {
        match self.token.kind {
            TokenKind::Question => {
                self.advance()?;
                if self.at_type_end() {
                    return Ok(TypeNode::NullableLiteral);
                }
                Ok(TypeNode::nullable(self.parse_postfix()?, true))
            }
            TokenKind::Bang => {
                self.advance()?;
                if self.at_type_end() {
                    return Ok(TypeNode::NonNullableLiteral);
                }
                Ok(TypeNode::non_nullable(self.parse_postfix()?, true))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<TypeNode, SyntaxError> {
        let mut expr = self.parse_basic()?;
        loop {
            match self.token.kind {
                TokenKind::Bang => {
                    self.advance()?;
                    expr = TypeNode::non_nullable(expr, false);
                }
                TokenKind::Question => {
                    self.advance()?;
                    expr = TypeNode::nullable(expr, false);
                }
                TokenKind::LBracket if self.peek()? == TokenKind::RBracket => {
                    self.advance()?;
                    self.advance()?;
                    expr = TypeNode::array_of(expr);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_basic(&mut self) -> Result<TypeNode, SyntaxError> {
        match &self.token.kind {
            TokenKind::Star => {
                self.advance()?;
                Ok(TypeNode::AllLiteral)
            }
            TokenKind::LParen => self.parse_parenthesized_union(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_record(),
            TokenKind::Name(name) => {
                let literal = match name.as_str() {
                    "null" => Some(TypeNode::NullLiteral),
                    "undefined" => Some(TypeNode::UndefinedLiteral),
                    "void" => Some(TypeNode::VoidLiteral),
                    "true" => Some(TypeNode::BooleanLiteralType { value: true }),
                    "false" => Some(TypeNode::BooleanLiteralType { value: false }),
                    _ => None,
                };
                if let Some(literal) = literal {
                    self.advance()?;
                    return Ok(literal);
                }
                if name == "function" && self.peek()? == TokenKind::LParen {
                    return self.parse_function();
                }
                let name = name.clone();
                self.parse_type_name(name)
            }
            TokenKind::Str(value) => {
                let value = value.clone();
                self.advance()?;
                Ok(TypeNode::StringLiteralType { value })
            }
            TokenKind::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(TypeNode::NumericLiteralType { value })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_parenthesized_union(&mut self) -> Result<TypeNode, SyntaxError> {
        self.open(Delimiter::Paren)?;
        let mut elements = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                elements.push(self.parse_type_expression()?);
                if self.at(&TokenKind::RParen) {
                    break;
                }
                self.expect(TokenKind::Pipe)?;
            }
        }
        self.close(Delimiter::Paren)?;
        Ok(TypeNode::union(elements))
    }

    fn parse_array(&mut self) -> Result<TypeNode, SyntaxError> {
        self.open(Delimiter::Bracket)?;
        let mut elements = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            if self.at(&TokenKind::Eof) {
                return Err(self.unexpected());
            }
            if self.at(&TokenKind::Rest) {
                self.advance()?;
                elements.push(TypeNode::rest(self.parse_type_expression()?));
                if self.at(&TokenKind::Comma) {
                    self.advance()?;
                }
                break;
            }
            elements.push(self.parse_type_expression()?);
            if !self.at(&TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.close(Delimiter::Bracket)?;
        Ok(TypeNode::ArrayType { elements })
    }

    fn parse_record(&mut self) -> Result<TypeNode, SyntaxError> {
        self.open(Delimiter::Brace)?;
        let mut fields = Vec::new();
        if self.at(&TokenKind::Comma) {
            self.advance()?;
        } else {
            while !self.at(&TokenKind::RBrace) {
                if self.at(&TokenKind::Eof) {
                    return Err(self.unexpected());
                }
                fields.push(self.parse_field()?);
                if !self.at(&TokenKind::RBrace) {
                    self.expect(TokenKind::Comma)?;
                }
            }
        }
        self.close(Delimiter::Brace)?;
        Ok(TypeNode::record(fields))
    }

    fn parse_field(&mut self) -> Result<FieldType, SyntaxError> {
        let key = match &self.token.kind {
            TokenKind::Name(name) => name.clone(),
            TokenKind::Str(value) => value.clone(),
            TokenKind::Number(value) => format_number(*value),
            _ => {
                return Err(self.error_here(format!(
                    "expected record key but found {}",
                    self.token.kind.describe()
                )))
            }
        };
        self.advance()?;

        if self.at(&TokenKind::Colon) {
            self.advance()?;
            let value = self.parse_type_expression()?;
            return Ok(FieldType::new(key, Some(value)));
        }
        Ok(FieldType::new(key, None))
    }

    fn parse_type_name(&mut self, name: String) -> Result<TypeNode, SyntaxError> {
        self.advance()?;
        let expr = TypeNode::name(name);
        if !matches!(self.token.kind, TokenKind::Lt | TokenKind::DotLt) {
            return Ok(expr);
        }

        self.open(Delimiter::Angle)?;
        let mut applications = vec![self.parse_union()?];
        while self.at(&TokenKind::Comma) {
            self.advance()?;
            applications.push(self.parse_union()?);
        }
        self.close(Delimiter::Angle)?;
        Ok(TypeNode::application(expr, applications))
    }

    fn parse_function(&mut self) -> Result<TypeNode, SyntaxError> {
        // `function`
        self.advance()?;
        self.open(Delimiter::Paren)?;

        let mut this_type = None;
        let mut new_type = None;
        if let TokenKind::Name(name) = &self.token.kind {
            let is_new = name == "new";
            if (is_new || name == "this") && self.peek()? == TokenKind::Colon {
                self.advance()?;
                self.advance()?;
                let binding = Box::new(self.parse_type_expression()?);
                if is_new {
                    new_type = Some(binding);
                } else {
                    this_type = Some(binding);
                }
                if !self.at(&TokenKind::RParen) {
                    self.expect(TokenKind::Comma)?;
                }
            }
        }

        let params = self.parse_params()?;
        self.close(Delimiter::Paren)?;

        let result = if self.at(&TokenKind::Colon) {
            self.advance()?;
            Some(Box::new(self.parse_type_expression()?))
        } else {
            None
        };

        Ok(TypeNode::FunctionType {
            params,
            result,
            this_type,
            new_type,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<TypeNode>, SyntaxError> {
        let mut params = Vec::new();
        while !self.at(&TokenKind::RParen) {
            if self.at(&TokenKind::Eof) {
                return Err(self.unexpected());
            }

            let rest = self.at(&TokenKind::Rest);
            if rest {
                self.advance()?;
            }

            let mut param = match &self.token.kind {
                TokenKind::Name(name) if self.peek()? == TokenKind::Colon => {
                    let name = name.clone();
                    self.advance()?;
                    self.advance()?;
                    TypeNode::parameter(name, self.parse_type_expression()?)
                }
                _ => self.parse_union()?,
            };
            if self.at(&TokenKind::Equal) {
                self.advance()?;
                param = TypeNode::optional(param);
            }
            if rest {
                param = TypeNode::rest(param);
            }
            params.push(param);

            if !self.at(&TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(params)
    }
}
