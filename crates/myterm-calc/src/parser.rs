//! Precedence-climbing parser producing an arithmetic AST.
//!
//! Binding strength, loosest first:
//!
//! | level | operators            | associativity |
//! |-------|----------------------|---------------|
//! | 1     | `\|`                 | left          |
//! | 2     | `^`                  | left          |
//! | 3     | `&`                  | left          |
//! | 4     | `<<` `>>`            | left          |
//! | 5     | `+` `-`              | left          |
//! | 6     | `*` `/` `//` `%`     | left          |
//! | 7     | unary `+` `-`        | prefix        |
//! | 8     | `**`                 | right         |
//!
//! The right operand of `**` is parsed at unary level, so `2**-1` is valid
//! and `-2**2` is `-(2**2)`.

use crate::error::{CalcError, Result};
use crate::lexer::{Spanned, Token, tokenize};

/// Unary prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
}

impl BinaryOp {
    /// Source symbol, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Binding level for the left-associative infix operators.
    fn infix(token: Token) -> Option<(Self, u8)> {
        let entry = match token {
            Token::Pipe => (Self::BitOr, 1),
            Token::Caret => (Self::BitXor, 2),
            Token::Amp => (Self::BitAnd, 3),
            Token::Shl => (Self::Shl, 4),
            Token::Shr => (Self::Shr, 4),
            Token::Plus => (Self::Add, 5),
            Token::Minus => (Self::Sub, 5),
            Token::Star => (Self::Mul, 6),
            Token::Slash => (Self::Div, 6),
            Token::DoubleSlash => (Self::FloorDiv, 6),
            Token::Percent => (Self::Mod, 6),
            _ => return None,
        };
        Some(entry)
    }
}

/// Arithmetic expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Parse `source` into an [`Expr`].
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.chars().count(),
    };

    if parser.tokens.is_empty() {
        return Err(CalcError::syntax(0, "empty expression"));
    }

    let expr = parser.expression(1)?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::syntax(extra.offset, "unexpected token"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<Spanned> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.peek()?;
        self.pos += 1;
        Some(spanned)
    }

    fn expression(&mut self, min_level: u8) -> Result<Expr> {
        let mut lhs = self.unary()?;
        while let Some((op, level)) = self.peek().and_then(|s| BinaryOp::infix(s.token)) {
            if level < min_level {
                break;
            }
            self.advance();
            let rhs = self.expression(level + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek().map(|s| s.token) {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.advance();
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;
        if self.peek().is_some_and(|s| s.token == Token::DoubleStar) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr> {
        let Some(spanned) = self.advance() else {
            return Err(CalcError::syntax(self.end, "unexpected end of expression"));
        };
        match spanned.token {
            Token::Int(value) => Ok(Expr::Int(value)),
            Token::Float(value) => Ok(Expr::Float(value)),
            Token::LParen => {
                let inner = self.expression(1)?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(CalcError::syntax(other.offset, "expected `)`")),
                    None => Err(CalcError::syntax(self.end, "unclosed `(`")),
                }
            }
            _ => Err(CalcError::syntax(spanned.offset, "expected a number or `(`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Box<Expr> {
        Box::new(Expr::Int(v))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: int(1),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: int(2),
                    rhs: int(3),
                }),
            }
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse("8 - 4 - 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Sub,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Sub,
                    lhs: int(8),
                    rhs: int(4),
                }),
                rhs: int(2),
            }
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            parse("2 ** 3 ** 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs: int(2),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: int(3),
                    rhs: int(2),
                }),
            }
        );
    }

    #[test]
    fn unary_minus_applies_after_power() {
        assert_eq!(
            parse("-2 ** 2").unwrap(),
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: int(2),
                    rhs: int(2),
                }),
            }
        );
    }

    #[test]
    fn power_accepts_signed_exponent() {
        assert!(parse("2 ** -1").is_ok());
        assert!(parse("--+1").is_ok());
    }

    #[test]
    fn bitwise_levels() {
        // 1 | (2 ^ (3 & (4 << 1)))
        let Expr::Binary { op, rhs, .. } = parse("1 | 2 ^ 3 & 4 << 1").unwrap() else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::BitOr);
        let Expr::Binary { op, rhs, .. } = *rhs else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::BitXor);
        let Expr::Binary { op, rhs, .. } = *rhs else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::BitAnd);
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Shl, .. }));
    }

    #[test]
    fn malformed_input_is_syntax_error() {
        for source in ["", "   ", "1 +", "(1 + 2", "1 2", "* 3", "()", "1 + )"] {
            assert!(
                matches!(parse(source), Err(CalcError::Syntax { .. })),
                "{source:?}"
            );
        }
    }

    #[test]
    fn end_of_input_offset() {
        assert_eq!(
            parse("1 +"),
            Err(CalcError::Syntax {
                offset: 3,
                message: "unexpected end of expression".into(),
            })
        );
    }
}
