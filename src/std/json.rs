//! Standard JSON library

use crate::runtime::interpreter::{Interpreter, RuntimeError};
use crate::runtime::value::{json, Value};
use crate::std::{arg, string_arg, NativeExport, StdModule};

/// `JSON`
pub struct JsonModule;

impl StdModule for JsonModule {
    fn namespace(&self) -> Option<&'static str> {
        Some("JSON")
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::function("stringify", json_stringify),
            NativeExport::function("parse", json_parse),
        ]
    }
}

/// Singleton instance for the JSON module.
pub const JSON_MODULE: JsonModule = JsonModule;

/// `JSON.stringify(value, replacer?, space?)`; replacers are ignored
fn json_stringify(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let value = arg(args, 0);
    let indent = match arg(args, 2) {
        Value::Number(n) if n >= 1.0 => n as usize,
        Value::String(s) => s.chars().count(),
        _ => 0,
    };
    let text = json::stringify_pretty(&value, indent)?;
    Ok(text.map(Value::from).unwrap_or_default())
}

/// `JSON.parse(text)`
fn json_parse(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    json::parse(&string_arg(args, 0))
}
