//! Tokenizer for type expressions.

use super::numeric::parse_numeric;
use super::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Pipe,
    Question,
    Bang,
    Equal,
    Star,
    Lt,
    Gt,
    /// `.<`, the Closure form of a type application
    DotLt,
    /// `...`
    Rest,
    Name(String),
    Str(String),
    Number(f64),
    Eof,
}

impl TokenKind {
    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Pipe => "`|`".to_string(),
            TokenKind::Question => "`?`".to_string(),
            TokenKind::Bang => "`!`".to_string(),
            TokenKind::Equal => "`=`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::DotLt => "`.<`".to_string(),
            TokenKind::Rest => "`...`".to_string(),
            TokenKind::Name(name) => format!("name `{}`", name),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Number(_) => "number".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character
    pub offset: usize,
}

/// Characters that end a name.
const PUNCTUATION: &str = "<>(){}[],:*|?!=\"'`";

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !PUNCTUATION.contains(c)
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> SyntaxError {
        SyntaxError::at(message, self.src, offset)
    }

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let offset = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset,
            });
        };

        let single = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '|' => Some(TokenKind::Pipe),
            '?' => Some(TokenKind::Question),
            '!' => Some(TokenKind::Bang),
            '=' => Some(TokenKind::Equal),
            '*' => Some(TokenKind::Star),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            _ => None,
        };
        if let Some(kind) = single {
            self.bump();
            return Ok(Token { kind, offset });
        }

        let kind = match c {
            '.' if self.rest().starts_with("...") => {
                self.pos += 3;
                TokenKind::Rest
            }
            '.' if self.rest().starts_with(".<") => {
                self.pos += 2;
                TokenKind::DotLt
            }
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number()?,
            '.' => return Err(self.error("unexpected `.`", offset)),
            '\'' | '"' => self.scan_string()?,
            '`' => self.scan_backtick_name()?,
            '-' | '+' if self.starts_number_after_sign() => self.scan_number()?,
            d if d.is_ascii_digit() => self.scan_number()?,
            c if is_name_char(c) => self.scan_name(),
            other => return Err(self.error(format!("unexpected character `{}`", other), offset)),
        };

        Ok(Token { kind, offset })
    }

    fn starts_number_after_sign(&self) -> bool {
        match self.peek_nth(1) {
            Some(d) if d.is_ascii_digit() => true,
            Some('.') => self.peek_nth(2).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    fn scan_name(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '.' && (self.rest().starts_with(".<") || self.rest().starts_with("...")) {
                break;
            }
            if !is_name_char(c) {
                break;
            }
            self.bump();
        }
        TokenKind::Name(self.src[start..self.pos].to_string())
    }

    fn scan_backtick_name(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        self.bump();
        let body_start = self.pos;
        while let Some(c) = self.bump() {
            if c == '`' {
                let name = self.src[body_start..self.pos - 1].trim();
                if name.is_empty() {
                    return Err(self.error("empty backtick name", start));
                }
                return Ok(TokenKind::Name(name.to_string()));
            }
        }
        Err(self.error("unterminated backtick name", start))
    }

    fn consume_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while self.peek_char().is_some_and(|c| c.is_digit(radix)) {
            self.bump();
            count += 1;
        }
        count
    }

    fn scan_number(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        if matches!(self.peek_char(), Some('-' | '+')) {
            self.bump();
        }

        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            if self.consume_digits(16) == 0 {
                return Err(self.error("missing hexadecimal digits", start));
            }
        } else {
            self.consume_digits(10);
            if self.peek_char() == Some('.') && !self.rest().starts_with("..") {
                self.bump();
                self.consume_digits(10);
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek_char(), Some('-' | '+')) {
                    self.bump();
                }
                if self.consume_digits(10) == 0 {
                    return Err(self.error("missing exponent digits", start));
                }
            }
        }

        if self.peek_char().is_some_and(|c| c != '.' && is_name_char(c)) {
            return Err(self.error("invalid numeric literal", start));
        }

        let raw = &self.src[start..self.pos];
        parse_numeric(raw)
            .map(TokenKind::Number)
            .ok_or_else(|| self.error(format!("invalid numeric literal `{}`", raw), start))
    }

    fn scan_string(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        let mut value = String::new();

        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated string literal", start));
            };
            if c == quote {
                return Ok(TokenKind::Str(value));
            }
            if c != '\\' {
                value.push(c);
                continue;
            }

            let escape_offset = self.pos - 1;
            let Some(e) = self.bump() else {
                return Err(self.error("unterminated string literal", start));
            };
            match e {
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                't' => value.push('\t'),
                'b' => value.push('\u{8}'),
                'f' => value.push('\u{c}'),
                'v' => value.push('\u{b}'),
                '0' if !self.peek_char().is_some_and(|d| d.is_ascii_digit()) => value.push('\0'),
                '0'..='7' => value.push(self.scan_octal_escape(e)),
                'x' => {
                    let code = self.scan_hex_digits(2, escape_offset)?;
                    value.push(self.char_from(code, escape_offset)?);
                }
                'u' => {
                    let c = self.scan_unicode_escape(escape_offset)?;
                    value.push(c);
                }
                // line continuation
                '\r' => {
                    if self.peek_char() == Some('\n') {
                        self.bump();
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => {}
                other => value.push(other),
            }
        }
    }

    fn scan_octal_escape(&mut self, first: char) -> char {
        let mut code = first.to_digit(8).unwrap_or(0);
        // at most three digits, and the value must stay below 0o400
        let max_len = if first <= '3' { 3 } else { 2 };
        let mut len = 1;
        while len < max_len {
            match self.peek_char().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.bump();
                    len += 1;
                }
                None => break,
            }
        }
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }

    fn scan_hex_digits(&mut self, count: usize, escape_offset: usize) -> Result<u32, SyntaxError> {
        let mut code = 0u32;
        for _ in 0..count {
            match self.peek_char().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.bump();
                }
                None => return Err(self.error("invalid escape sequence", escape_offset)),
            }
        }
        Ok(code)
    }

    fn scan_unicode_escape(&mut self, escape_offset: usize) -> Result<char, SyntaxError> {
        if self.peek_char() == Some('{') {
            self.bump();
            let mut code = 0u32;
            let mut digits = 0;
            loop {
                match self.bump() {
                    Some('}') if digits > 0 => break,
                    Some(c) if c.is_ascii_hexdigit() && digits < 6 => {
                        code = code * 16 + c.to_digit(16).unwrap_or(0);
                        digits += 1;
                    }
                    _ => return Err(self.error("invalid unicode escape", escape_offset)),
                }
            }
            return self.char_from(code, escape_offset);
        }

        let code = self.scan_hex_digits(4, escape_offset)?;
        if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            if let Ok(low) = self.scan_hex_digits(4, escape_offset) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return self.char_from(combined, escape_offset);
                }
            }
            self.pos = checkpoint;
        }
        // lone surrogates have no `char` representation
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn char_from(&self, code: u32, escape_offset: usize) -> Result<char, SyntaxError> {
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape", escape_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn test_punctuation_and_names() {
        assert_eq!(
            kinds("Array.<foo.Bar>|?"),
            vec![
                TokenKind::Name("Array".to_string()),
                TokenKind::DotLt,
                TokenKind::Name("foo.Bar".to_string()),
                TokenKind::Gt,
                TokenKind::Pipe,
                TokenKind::Question,
            ]
        );
    }

    #[test]
    fn test_rest_and_backticks() {
        assert_eq!(
            kinds("...`Foo`"),
            vec![TokenKind::Rest, TokenKind::Name("Foo".to_string())]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0x20 .5 1e3 -2 017"),
            vec![
                TokenKind::Number(32.0),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(-2.0),
                TokenKind::Number(15.0),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\n\tA\x42\u{1F600}" 'it\'s'"#),
            vec![
                TokenKind::Str("a\n\tAB\u{1F600}".to_string()),
                TokenKind::Str("it's".to_string()),
            ]
        );
    }

    #[test]
    fn test_surrogate_pair_escape() {
        assert_eq!(
            kinds(r#""\uD83D\uDE00""#),
            vec![TokenKind::Str("\u{1F600}".to_string())]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = Lexer::new("'abc").next_token().unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_bad_escape_is_error() {
        assert!(Lexer::new(r#""\xZZ""#).next_token().is_err());
        assert!(Lexer::new(r#""\u12""#).next_token().is_err());
    }

    #[test]
    fn test_invalid_number_suffix() {
        assert!(Lexer::new("3px").next_token().is_err());
    }
}
