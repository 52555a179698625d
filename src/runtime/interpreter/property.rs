//! Property access on values

use super::RuntimeError;
use crate::runtime::value::{number_to_string, Function, Value};
use crate::std::{convert, list, string};

/// Arrays may grow by at most this many elements in one indexed write
const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// ToPropertyKey
pub fn property_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.to_string(),
        Value::Number(n) => number_to_string(*n),
        other => other.to_js_string(),
    }
}

/// Canonical array index (`"0"`, `"12"`, never `"01"` or `"1.0"`)
fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Read `object[key]`
pub fn get_property(
    object: &Value,
    key: &str,
) -> Result<Value, RuntimeError> {
    match object {
        Value::Undefined | Value::Null => Err(RuntimeError::ReadOfNullish {
            target: if matches!(object, Value::Null) {
                "null"
            } else {
                "undefined"
            },
            key: key.to_string(),
        }),
        Value::Object(props) => Ok(props.borrow().get(key).cloned().unwrap_or_default()),
        Value::Array(items) => {
            if key == "length" {
                return Ok(Value::from(items.borrow().len()));
            }
            if let Some(index) = array_index(key) {
                return Ok(items.borrow().get(index).cloned().unwrap_or_default());
            }
            Ok(list::method(key)
                .map(|native| Function::method(native, object.clone()))
                .unwrap_or_default())
        }
        Value::String(s) => {
            if key == "length" {
                return Ok(Value::from(s.chars().count()));
            }
            if let Some(index) = array_index(key) {
                return Ok(s
                    .chars()
                    .nth(index)
                    .map(|c| Value::from(c.to_string()))
                    .unwrap_or_default());
            }
            Ok(string::method(key)
                .map(|native| Function::method(native, object.clone()))
                .unwrap_or_default())
        }
        Value::Number(_) => Ok(convert::number_method(key)
            .map(|native| Function::method(native, object.clone()))
            .unwrap_or_default()),
        Value::Bool(_) => Ok(convert::bool_method(key)
            .map(|native| Function::method(native, object.clone()))
            .unwrap_or_default()),
        Value::Function(func) => Ok(match key {
            "name" => Value::from(func.name()),
            "length" => match func.as_ref() {
                Function::Closure { def, .. } => {
                    Value::from(def.params.iter().filter(|p| !p.rest && p.default.is_none()).count())
                }
                Function::Native { .. } => Value::Number(0.0),
            },
            _ => Value::Undefined,
        }),
    }
}

/// Write `object[key] = value`
pub fn set_property(
    object: &Value,
    key: &str,
    value: Value,
) -> Result<(), RuntimeError> {
    match object {
        Value::Undefined | Value::Null => Err(RuntimeError::WriteToNullish {
            target: if matches!(object, Value::Null) {
                "null"
            } else {
                "undefined"
            },
            key: key.to_string(),
        }),
        Value::Object(props) => {
            props.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            if key == "length" {
                // converted before borrowing; the new length may be this array
                let len = value.to_number();
                let mut items = items.borrow_mut();
                if len < 0.0 || len.fract() != 0.0 || len > (items.len() + MAX_ARRAY_GROWTH) as f64 {
                    return Err(RuntimeError::Range("invalid array length".to_string()));
                }
                items.resize(len as usize, Value::Undefined);
                return Ok(());
            }
            let mut items = items.borrow_mut();
            let Some(index) = array_index(key) else {
                return Err(RuntimeError::ArrayProperty {
                    key: key.to_string(),
                });
            };
            if index >= items.len() + MAX_ARRAY_GROWTH {
                return Err(RuntimeError::Range("invalid array length".to_string()));
            }
            if index >= items.len() {
                items.resize(index + 1, Value::Undefined);
            }
            items[index] = value;
            Ok(())
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Function(_) => {
            Err(RuntimeError::PrimitiveProperty {
                key: key.to_string(),
                type_name: object.type_of(),
                value: object.to_js_string(),
            })
        }
    }
}
