//! Binary operators

use crate::frontend::parser::ast::BinOp;
use crate::runtime::value::Value;

/// Apply a binary operator
pub fn binary(
    op: BinOp,
    left: &Value,
    right: &Value,
) -> Value {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinOp::Div => Value::Number(left.to_number() / right.to_number()),
        // f64 `%` truncates like JavaScript's remainder
        BinOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinOp::Pow => Value::Number(pow(left.to_number(), right.to_number())),
        BinOp::Eq => Value::Bool(left.loose_equals(right)),
        BinOp::Neq => Value::Bool(!left.loose_equals(right)),
        BinOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinOp::StrictNeq => Value::Bool(!left.strict_equals(right)),
        BinOp::Lt => Value::Bool(compare(left, right, |o| o.is_lt())),
        BinOp::Le => Value::Bool(compare(left, right, |o| o.is_le())),
        BinOp::Gt => Value::Bool(compare(left, right, |o| o.is_gt())),
        BinOp::Ge => Value::Bool(compare(left, right, |o| o.is_ge())),
    }
}

/// `+`: string concatenation if either primitive is a string, else numeric
fn add(
    left: &Value,
    right: &Value,
) -> Value {
    let left = left.to_primitive();
    let right = right.to_primitive();
    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            let mut s = left.to_js_string();
            s.push_str(&right.to_js_string());
            Value::from(s)
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// `**`, where `1 ** NaN` and `(±1) ** ±Infinity` are NaN unlike `powf`
pub fn pow(
    base: f64,
    exponent: f64,
) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Relational comparison; strings compare by code point, anything else
/// numerically, and NaN compares false
fn compare(
    left: &Value,
    right: &Value,
    accept: fn(std::cmp::Ordering) -> bool,
) -> bool {
    let left = left.to_primitive();
    let right = right.to_primitive();
    let ordering = match (&left, &right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    ordering.is_some_and(accept)
}
