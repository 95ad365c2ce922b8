//! Tokenizer for arithmetic expressions.
//!
//! Anything that is not a number, an arithmetic operator or a parenthesis is
//! rejected here, before a parser ever sees it. Names in particular never
//! become tokens, so there is nothing to look up or call.

use crate::error::{CalcError, Result};

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Shl,
    Shr,
    LParen,
    RParen,
}

/// A token together with the character offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Split `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while let Some(spanned) = lexer.next_token()? {
        tokens.push(spanned);
    }
    Ok(tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn next_token(&mut self) -> Result<Option<Spanned>> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }

        let offset = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let token = match c {
            '0'..='9' => self.number()?,
            '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => self.number()?,
            '.' => return Err(CalcError::unsupported("attribute access")),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '%' => self.single(Token::Percent),
            '^' => self.single(Token::Caret),
            '&' => self.single(Token::Amp),
            '|' => self.single(Token::Pipe),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '*' => {
                self.bump();
                if self.eat('*') { Token::DoubleStar } else { Token::Star }
            }
            '/' => {
                self.bump();
                if self.eat('/') { Token::DoubleSlash } else { Token::Slash }
            }
            '<' => {
                self.bump();
                if self.eat('<') {
                    Token::Shl
                } else {
                    return Err(CalcError::unsupported("comparison"));
                }
            }
            '>' => {
                self.bump();
                if self.eat('>') {
                    Token::Shr
                } else {
                    return Err(CalcError::unsupported("comparison"));
                }
            }
            '=' | '!' if self.peek_at(1) == Some('=') => {
                return Err(CalcError::unsupported("comparison"));
            }
            '=' => return Err(CalcError::unsupported("assignment")),
            '~' => return Err(CalcError::unsupported("bitwise inversion `~`")),
            '\'' | '"' => return Err(CalcError::unsupported("string literal")),
            '[' | ']' | '{' | '}' => return Err(CalcError::unsupported("subscript or collection")),
            ',' => return Err(CalcError::unsupported("tuple")),
            c if c == '_' || c.is_alphabetic() => {
                let name = self.identifier();
                return Err(CalcError::unsupported(format!("name `{name}`")));
            }
            other => {
                return Err(CalcError::syntax(
                    offset,
                    format!("unexpected character `{other}`"),
                ));
            }
        };

        Ok(Some(Spanned { token, offset }))
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    /// Digits of `radix`, with single `_` separators between digits.
    fn digits(&mut self, radix: u32, allow_leading_underscore: bool) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    out.push(c);
                    self.pos += 1;
                }
                Some('_')
                    if (allow_leading_underscore || !out.is_empty())
                        && self.peek_at(1).is_some_and(|n| n.is_digit(radix)) =>
                {
                    self.pos += 1;
                }
                Some('_') => {
                    return Err(CalcError::syntax(self.pos, "invalid underscore in numeric literal"));
                }
                _ => return Ok(out),
            }
        }
    }

    fn reject_trailing_identifier(&self, start: usize) -> Result<()> {
        match self.peek() {
            Some(c) if c == '_' || c.is_alphanumeric() => {
                Err(CalcError::syntax(start, "invalid numeric literal"))
            }
            _ => Ok(()),
        }
    }

    fn number(&mut self) -> Result<Token> {
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.digits(radix, true)?;
                if digits.is_empty() {
                    return Err(CalcError::syntax(start, "invalid numeric literal"));
                }
                self.reject_trailing_identifier(start)?;
                return i64::from_str_radix(&digits, radix)
                    .map(Token::Int)
                    .map_err(|_| CalcError::Overflow);
            }
        }

        let mut text = self.digits(10, false)?;
        let mut is_float = false;

        if self.eat('.') {
            is_float = true;
            text.push('.');
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                let fraction = self.digits(10, false)?;
                text.push_str(&fraction);
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digits_at = if signed { 2 } else { 1 };
            if self.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                if signed {
                    text.push(self.chars[self.pos + 1]);
                }
                self.pos += digits_at;
                let exponent = self.digits(10, false)?;
                text.push_str(&exponent);
            }
        }

        self.reject_trailing_identifier(start)?;

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| CalcError::syntax(start, "invalid float literal"))?;
            if !value.is_finite() {
                return Err(CalcError::Overflow);
            }
            return Ok(Token::Float(value));
        }

        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(CalcError::syntax(
                start,
                "leading zeros in decimal integer literals are not permitted",
            ));
        }
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| CalcError::Overflow)
    }
}
