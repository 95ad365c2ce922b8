//! Error types for the myterm-calc crate.

use thiserror::Error;

/// Alias for `Result<T, CalcError>`.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Errors produced while tokenizing, parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The input uses a construct outside plain arithmetic (names, calls,
    /// strings, comparisons, ...).
    #[error("unsupported expression: {construct}")]
    UnsupportedExpression { construct: String },

    /// The input is not a well-formed expression.
    #[error("invalid syntax at position {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result does not fit in a 64-bit integer or is not a finite float.
    #[error("numeric overflow")]
    Overflow,

    /// An operator was applied to operands it does not accept.
    #[error("invalid operand: {reason}")]
    InvalidOperand { reason: String },
}

impl CalcError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedExpression {
            construct: construct.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_operand(reason: impl Into<String>) -> Self {
        Self::InvalidOperand {
            reason: reason.into(),
        }
    }
}
