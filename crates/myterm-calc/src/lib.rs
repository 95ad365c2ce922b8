//! # myterm-calc
//!
//! Safe arithmetic evaluator behind the `calc` command.
//!
//! Input is tokenized and parsed into a closed arithmetic AST before anything
//! is computed. There is no symbol table and no call syntax, so an input such
//! as `__import__('os')` is rejected as unsupported instead of being run.
//!
//! ## Limits
//!
//! - Integers are `i64`. A result outside that range, such as `2 ** 64` or
//!   `10 ** 30`, is [`CalcError::Overflow`] rather than a big integer.
//! - `True` and `False` are names like any other, so `True + 1` is
//!   [`CalcError::UnsupportedExpression`].
//!
//! ## Modules
//!
//! - [`lexer`] -- numeric literals, operators, parentheses.
//! - [`parser`] -- precedence-climbing parser and the [`Expr`] tree.
//! - [`eval`] -- checked evaluation to a [`Value`].
//! - [`error`] -- [`CalcError`].
//!
//! ## Example
//!
//! ```
//! assert_eq!(myterm_calc::evaluate("(2+3)*4").unwrap().to_string(), "20");
//! assert_eq!(myterm_calc::evaluate("7/2").unwrap().to_string(), "3.5");
//! ```

pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use error::{CalcError, Result};
pub use eval::Value;
pub use parser::{BinaryOp, Expr, UnaryOp, parse};

/// Parse and evaluate `source`.
pub fn evaluate(source: &str) -> Result<Value> {
    let result = parse(source).and_then(|expr| expr.eval());
    match &result {
        Ok(value) => tracing::debug!(expression = source, result = %value, "expression evaluated"),
        Err(e) => tracing::debug!(expression = source, error = %e, "expression rejected"),
    }
    result
}
