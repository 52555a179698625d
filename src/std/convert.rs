//! Standard conversion library
//!
//! Global conversion functions and the methods of number and boolean values.

use crate::runtime::interpreter::{Interpreter, RuntimeError};
use crate::runtime::value::{
    number_to_radix_string, number_to_string, parse_digits, string_to_number, to_integer, NativeFn,
    NativeFunction, Value,
};
use crate::std::{arg, number_arg, string_arg, NativeExport, StdModule};

/// Conversion globals (`String`, `Number`, `parseInt`, ...)
pub struct ConvertModule;

impl StdModule for ConvertModule {
    fn namespace(&self) -> Option<&'static str> {
        None
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::function("String", global_string),
            NativeExport::function("Number", global_number),
            NativeExport::function("Boolean", global_boolean),
            NativeExport::function("parseInt", global_parse_int),
            NativeExport::function("parseFloat", global_parse_float),
            NativeExport::function("isNaN", global_is_nan),
            NativeExport::function("isFinite", global_is_finite),
        ]
    }
}

/// Singleton instance for the conversion module.
pub const CONVERT_MODULE: ConvertModule = ConvertModule;

const NUMBER_METHODS: &[(&str, NativeFn)] = &[
    ("toFixed", number_to_fixed),
    ("toString", number_to_string_method),
];

const BOOL_METHODS: &[(&str, NativeFn)] = &[("toString", bool_to_string)];

/// Look up a number method by name
pub fn number_method(name: &str) -> Option<NativeFunction> {
    NUMBER_METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, f)| NativeFunction::new(n, f))
}

/// Look up a boolean method by name
pub fn bool_method(name: &str) -> Option<NativeFunction> {
    BOOL_METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, f)| NativeFunction::new(n, f))
}

fn global_string(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Ok(Value::from(""));
    }
    Ok(Value::from(string_arg(args, 0)))
}

fn global_number(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Ok(Value::Number(0.0));
    }
    Ok(Value::Number(number_arg(args, 0)))
}

fn global_boolean(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(arg(args, 0).is_truthy()))
}

/// `parseInt(s, radix?)`: leading integer prefix, NaN when there is none
fn global_parse_int(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let text = string_arg(args, 0);
    let mut s = text.trim_start();

    let negative = s.starts_with('-');
    if negative || s.starts_with('+') {
        s = &s[1..];
    }

    let mut radix = match arg(args, 1) {
        Value::Undefined => 0,
        v => to_integer(v.to_number()) as i64,
    };
    if radix != 0 && !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }
    if (radix == 0 || radix == 16) && (s.starts_with("0x") || s.starts_with("0X")) {
        s = &s[2..];
        radix = 16;
    }
    if radix == 0 {
        radix = 10;
    }

    let radix = radix as u32;
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let n = parse_digits(&s[..end], radix).unwrap_or(f64::NAN);
    Ok(Value::Number(if negative { -n } else { n }))
}

/// `parseFloat(s)`: longest leading decimal literal
fn global_parse_float(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let text = string_arg(args, 0);
    let s = text.trim_start();

    for prefix in ["Infinity", "+Infinity", "-Infinity"] {
        if s.starts_with(prefix) {
            return Ok(Value::Number(string_to_number(prefix)));
        }
    }

    // scan sign, digits, fraction, exponent
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if s[digits_start..end].trim_matches('.').is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    Ok(Value::Number(s[..end].parse().unwrap_or(f64::NAN)))
}

fn global_is_nan(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(number_arg(args, 0).is_nan()))
}

fn global_is_finite(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(number_arg(args, 0).is_finite()))
}

/// `n.toFixed(digits?)`
fn number_to_fixed(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let n = this.to_number();
    let digits = match arg(args, 0) {
        Value::Undefined => 0.0,
        v => to_integer(v.to_number()),
    };
    if !(0.0..=100.0).contains(&digits) {
        return Err(RuntimeError::Range(
            "toFixed() digits argument must be between 0 and 100".to_string(),
        ));
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(Value::from(number_to_string(n)));
    }
    Ok(Value::from(format!("{:.*}", digits as usize, n)))
}

/// `n.toString(radix?)`
fn number_to_string_method(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let radix = match arg(args, 0) {
        Value::Undefined => 10.0,
        v => to_integer(v.to_number()),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(RuntimeError::Range(
            "toString() radix must be between 2 and 36".to_string(),
        ));
    }
    Ok(Value::from(number_to_radix_string(this.to_number(), radix as u32)))
}

fn bool_to_string(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this.to_js_string()))
}
