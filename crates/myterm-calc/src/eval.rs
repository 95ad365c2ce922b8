//! Evaluation of parsed expressions.
//!
//! Integers are 64-bit and every integer operation is checked; a result
//! that does not fit is [`CalcError::Overflow`] rather than a wrapped value.

use std::fmt;

use crate::error::{CalcError, Result};
use crate::parser::{BinaryOp, Expr, UnaryOp};

/// A computed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&format_float(x)),
        }
    }
}

/// Shortest round-trip rendering, with `.0` on integral values and
/// exponent notation outside `[1e-4, 1e16)`.
fn format_float(x: f64) -> String {
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // `{:e}` yields `1.5e-7`; show the exponent signed and two digits wide.
        let rendered = format!("{x:e}");
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => rendered,
        };
    }
    if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

fn finite(x: f64) -> Result<Value> {
    if x.is_finite() {
        Ok(Value::Float(x))
    } else {
        Err(CalcError::Overflow)
    }
}

impl Expr {
    /// Evaluate this expression.
    pub fn eval(&self) -> Result<Value> {
        match self {
            Self::Int(i) => Ok(Value::Int(*i)),
            Self::Float(x) => Ok(Value::Float(*x)),
            Self::Unary { op, operand } => unary(*op, operand.eval()?),
            Self::Binary { op, lhs, rhs } => binary(*op, lhs.eval()?, rhs.eval()?),
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Plus, v) => Ok(v),
        (UnaryOp::Minus, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or(CalcError::Overflow),
        (UnaryOp::Minus, Value::Float(x)) => Ok(Value::Float(-x)),
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    match op {
        BinaryOp::Add => arithmetic(lhs, rhs, i64::checked_add, |a, b| a + b),
        BinaryOp::Sub => arithmetic(lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(lhs, rhs),
        BinaryOp::FloorDiv => floor_divide(lhs, rhs),
        BinaryOp::Mod => modulo(lhs, rhs),
        BinaryOp::Pow => power(lhs, rhs),
        BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitAnd | BinaryOp::Shl | BinaryOp::Shr => {
            let (Value::Int(a), Value::Int(b)) = (lhs, rhs) else {
                return Err(CalcError::invalid_operand(format!(
                    "unsupported operand types for {}: {} and {}",
                    op.symbol(),
                    lhs.type_name(),
                    rhs.type_name()
                )));
            };
            bitwise(op, a, b).map(Value::Int)
        }
    }
}

fn arithmetic(
    lhs: Value,
    rhs: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(a, b).map(Value::Int).ok_or(CalcError::Overflow),
        _ => finite(float_op(lhs.as_f64(), rhs.as_f64())),
    }
}

fn divide(lhs: Value, rhs: Value) -> Result<Value> {
    let divisor = rhs.as_f64();
    if divisor == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    finite(lhs.as_f64() / divisor)
}

fn floor_divide(lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(_), Value::Int(0)) => Err(CalcError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => {
            let quotient = a.checked_div(b).ok_or(CalcError::Overflow)?;
            let remainder = a % b;
            if remainder != 0 && (remainder < 0) != (b < 0) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        _ => {
            let divisor = rhs.as_f64();
            if divisor == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            finite((lhs.as_f64() / divisor).floor())
        }
    }
}

fn modulo(lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(_), Value::Int(0)) => Err(CalcError::DivisionByZero),
        // `i64::MIN % -1` overflows in hardware but is mathematically zero.
        (Value::Int(_), Value::Int(-1)) => Ok(Value::Int(0)),
        (Value::Int(a), Value::Int(b)) => {
            let remainder = a % b;
            if remainder != 0 && (remainder < 0) != (b < 0) {
                Ok(Value::Int(remainder + b))
            } else {
                Ok(Value::Int(remainder))
            }
        }
        _ => {
            let (a, b) = (lhs.as_f64(), rhs.as_f64());
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            let remainder = a % b;
            if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
                finite(remainder + b)
            } else {
                finite(remainder)
            }
        }
    }
}

fn power(lhs: Value, rhs: Value) -> Result<Value> {
    if let (Value::Int(base), Value::Int(exponent)) = (lhs, rhs) {
        if exponent >= 0 {
            return int_power(base, exponent).map(Value::Int);
        }
    }

    let (base, exponent) = (lhs.as_f64(), rhs.as_f64());
    if base == 0.0 && exponent < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(CalcError::invalid_operand(
            "negative number raised to a fractional power",
        ));
    }
    finite(base.powf(exponent))
}

fn int_power(base: i64, exponent: i64) -> Result<i64> {
    match base {
        0 if exponent == 0 => Ok(1),
        0 | 1 => Ok(base),
        -1 => Ok(if exponent % 2 == 0 { 1 } else { -1 }),
        _ => u32::try_from(exponent)
            .ok()
            .and_then(|e| base.checked_pow(e))
            .ok_or(CalcError::Overflow),
    }
}

fn bitwise(op: BinaryOp, a: i64, b: i64) -> Result<i64> {
    match op {
        BinaryOp::BitOr => Ok(a | b),
        BinaryOp::BitXor => Ok(a ^ b),
        BinaryOp::BitAnd => Ok(a & b),
        BinaryOp::Shl | BinaryOp::Shr if b < 0 => {
            Err(CalcError::invalid_operand("negative shift count"))
        }
        BinaryOp::Shl => {
            if a == 0 {
                return Ok(0);
            }
            if b >= 64 {
                return Err(CalcError::Overflow);
            }
            let shifted = a << b;
            if shifted >> b == a {
                Ok(shifted)
            } else {
                Err(CalcError::Overflow)
            }
        }
        BinaryOp::Shr => {
            if b >= 64 {
                Ok(if a < 0 { -1 } else { 0 })
            } else {
                Ok(a >> b)
            }
        }
        _ => Err(CalcError::invalid_operand(format!(
            "`{}` is not a bitwise operator",
            op.symbol()
        ))),
    }
}
