//! JSON encoding and decoding of runtime values
//!
//! Encoding follows `JSON.stringify`: non-finite numbers become `null`,
//! `undefined` and functions are dropped from objects and become `null`
//! inside arrays, and cyclic structures are rejected.

use std::rc::Rc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number};

use super::{number_to_string, Value, MAX_VALUE_DEPTH};
use crate::runtime::interpreter::RuntimeError;

/// Encode a value as a JSON tree
///
/// Returns `None` when the value has no JSON form (`undefined`, functions).
pub fn to_json(value: &Value) -> Result<Option<serde_json::Value>, RuntimeError> {
    let mut stack = Vec::new();
    encode(value, &mut stack)
}

fn encode(
    value: &Value,
    stack: &mut Vec<*const ()>,
) -> Result<Option<serde_json::Value>, RuntimeError> {
    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => encode_number(*n),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => {
            enter(Rc::as_ptr(items) as *const (), stack)?;
            let items = items.borrow().clone();
            let mut out = Vec::with_capacity(items.len());
            for item in &items {
                out.push(encode(item, stack)?.unwrap_or(serde_json::Value::Null));
            }
            stack.pop();
            serde_json::Value::Array(out)
        }
        Value::Object(props) => {
            enter(Rc::as_ptr(props) as *const (), stack)?;
            let props = props.borrow().clone();
            let mut out = Map::new();
            for (key, item) in &props {
                if let Some(json) = encode(item, stack)? {
                    out.insert(key.clone(), json);
                }
            }
            stack.pop();
            serde_json::Value::Object(out)
        }
    };
    Ok(Some(json))
}

fn enter(
    ptr: *const (),
    stack: &mut Vec<*const ()>,
) -> Result<(), RuntimeError> {
    if stack.contains(&ptr) {
        return Err(RuntimeError::CircularStructure);
    }
    if stack.len() >= MAX_VALUE_DEPTH {
        return Err(RuntimeError::StackOverflow);
    }
    stack.push(ptr);
    Ok(())
}

fn encode_number(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    // finite numbers are written exactly as `String(n)` writes them
    number_to_string(n)
        .parse::<Number>()
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// `JSON.stringify(value)`; `None` when the result would be `undefined`
pub fn stringify(value: &Value) -> Result<Option<String>, RuntimeError> {
    Ok(to_json(value)?.map(|json| json.to_string()))
}

/// `JSON.stringify(value, null, indent)` with an indentation of `indent` spaces
pub fn stringify_pretty(
    value: &Value,
    indent: usize,
) -> Result<Option<String>, RuntimeError> {
    let Some(json) = to_json(value)? else {
        return Ok(None);
    };
    if indent == 0 {
        return Ok(Some(json.to_string()));
    }

    let indent = " ".repeat(indent.min(10));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut serializer)
        .map_err(|e| RuntimeError::Json(e.to_string()))?;
    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| RuntimeError::Json(e.to_string()))
}

/// Convert a parsed JSON tree into a runtime value
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(
            n.as_f64()
                .or_else(|| n.to_string().parse().ok())
                .unwrap_or(f64::NAN),
        ),
        serde_json::Value::String(s) => Value::from(s),
        serde_json::Value::Array(items) => {
            Value::new_array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(props) => {
            let props: IndexMap<String, Value> = props
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect();
            Value::new_object(props)
        }
    }
}

/// `JSON.parse(text)`
pub fn parse(text: &str) -> Result<Value, RuntimeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| RuntimeError::Json(e.to_string()))?;
    Ok(from_json(json))
}
