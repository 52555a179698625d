//! Standard Math library

use crate::runtime::interpreter::{ops, Interpreter, RuntimeError};
use crate::runtime::value::Value;
use crate::std::{number_arg, NativeExport, StdModule};

/// `Math`
pub struct MathModule;

impl StdModule for MathModule {
    fn namespace(&self) -> Option<&'static str> {
        Some("Math")
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::constant("PI", std::f64::consts::PI),
            NativeExport::constant("E", std::f64::consts::E),
            NativeExport::constant("LN2", std::f64::consts::LN_2),
            NativeExport::constant("LN10", std::f64::consts::LN_10),
            NativeExport::constant("SQRT2", std::f64::consts::SQRT_2),
            NativeExport::function("abs", math_abs),
            NativeExport::function("floor", math_floor),
            NativeExport::function("ceil", math_ceil),
            NativeExport::function("round", math_round),
            NativeExport::function("trunc", math_trunc),
            NativeExport::function("sign", math_sign),
            NativeExport::function("sqrt", math_sqrt),
            NativeExport::function("cbrt", math_cbrt),
            NativeExport::function("pow", math_pow),
            NativeExport::function("exp", math_exp),
            NativeExport::function("log", math_log),
            NativeExport::function("log2", math_log2),
            NativeExport::function("log10", math_log10),
            NativeExport::function("sin", math_sin),
            NativeExport::function("cos", math_cos),
            NativeExport::function("tan", math_tan),
            NativeExport::function("atan", math_atan),
            NativeExport::function("atan2", math_atan2),
            NativeExport::function("min", math_min),
            NativeExport::function("max", math_max),
            NativeExport::function("hypot", math_hypot),
            NativeExport::function("random", math_random),
        ]
    }
}

/// Singleton instance for the Math module.
pub const MATH_MODULE: MathModule = MathModule;

/// Define a native taking one number
macro_rules! unary_math {
    ($($name:ident => $f:expr;)*) => {
        $(
            fn $name(
                _: &mut Interpreter<'_>,
                _: &Value,
                args: &[Value],
            ) -> Result<Value, RuntimeError> {
                let f: fn(f64) -> f64 = $f;
                Ok(Value::Number(f(number_arg(args, 0))))
            }
        )*
    };
}

unary_math! {
    math_abs => f64::abs;
    math_floor => f64::floor;
    math_ceil => f64::ceil;
    math_round => round;
    math_trunc => f64::trunc;
    math_sign => sign;
    math_sqrt => f64::sqrt;
    math_cbrt => f64::cbrt;
    math_exp => f64::exp;
    math_log => f64::ln;
    math_log2 => f64::log2;
    math_log10 => f64::log10;
    math_sin => f64::sin;
    math_cos => f64::cos;
    math_tan => f64::tan;
    math_atan => f64::atan;
}

/// Round half up (`Math.round(-2.5)` is -2)
fn round(n: f64) -> f64 {
    if !n.is_finite() || n.fract() == 0.0 {
        return n;
    }
    (n + 0.5).floor()
}

fn sign(n: f64) -> f64 {
    if n.is_nan() || n == 0.0 {
        n
    } else {
        n.signum()
    }
}

fn math_pow(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Number(ops::pow(number_arg(args, 0), number_arg(args, 1))))
}

fn math_atan2(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Number(number_arg(args, 0).atan2(number_arg(args, 1))))
}

fn math_min(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let mut result = f64::INFINITY;
    for n in args.iter().map(Value::to_number) {
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        result = result.min(n);
    }
    Ok(Value::Number(result))
}

fn math_max(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let mut result = f64::NEG_INFINITY;
    for n in args.iter().map(Value::to_number) {
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        result = result.max(n);
    }
    Ok(Value::Number(result))
}

fn math_hypot(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let sum: f64 = args.iter().map(|v| v.to_number().powi(2)).sum();
    Ok(Value::Number(sum.sqrt()))
}

fn math_random(
    _: &mut Interpreter<'_>,
    _: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Number(rand::random::<f64>()))
}
