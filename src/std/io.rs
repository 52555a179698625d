//! Standard console library
//!
//! `console.*` writes through the logger (stderr) so that standard output
//! carries nothing but one outcome line per input.

use tracing::{debug, error, info, warn};

use crate::runtime::interpreter::{Interpreter, RuntimeError};
use crate::runtime::value::{json, Value};
use crate::std::{NativeExport, StdModule};

/// `console`
pub struct ConsoleModule;

impl StdModule for ConsoleModule {
    fn namespace(&self) -> Option<&'static str> {
        Some("console")
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::function("log", console_log),
            NativeExport::function("info", console_info),
            NativeExport::function("warn", console_warn),
            NativeExport::function("error", console_error),
            NativeExport::function("debug", console_debug),
        ]
    }
}

/// Singleton instance for the console module.
pub const CONSOLE_MODULE: ConsoleModule = ConsoleModule;

/// Format console arguments: strings as-is, everything else as JSON when
/// it has a JSON form
pub fn format_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.to_string(),
            Value::Array(_) | Value::Object(_) => match json::stringify(arg) {
                Ok(Some(text)) => text,
                _ => arg.to_js_string(),
            },
            other => other.to_js_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn console_log(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    info!(target: "console", "{}", format_args(args));
    Ok(Value::Undefined)
}

fn console_info(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    info!(target: "console", "{}", format_args(args));
    Ok(Value::Undefined)
}

fn console_warn(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    warn!(target: "console", "{}", format_args(args));
    Ok(Value::Undefined)
}

fn console_error(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    error!(target: "console", "{}", format_args(args));
    Ok(Value::Undefined)
}

fn console_debug(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    debug!(target: "console", "{}", format_args(args));
    Ok(Value::Undefined)
}
