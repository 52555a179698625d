//! Standard Object library

use indexmap::IndexMap;

use crate::runtime::interpreter::{property_key, set_property, Interpreter, RuntimeError};
use crate::runtime::value::Value;
use crate::std::{arg, NativeExport, StdModule};

/// `Object`
pub struct ObjectModule;

impl StdModule for ObjectModule {
    fn namespace(&self) -> Option<&'static str> {
        Some("Object")
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::function("keys", object_keys),
            NativeExport::function("values", object_values),
            NativeExport::function("entries", object_entries),
            NativeExport::function("assign", object_assign),
            NativeExport::function("fromEntries", object_from_entries),
        ]
    }
}

/// Singleton instance for the Object module.
pub const OBJECT_MODULE: ObjectModule = ObjectModule;

/// Own enumerable entries of a value, in order
fn entries_of(
    value: &Value,
    method: &str,
) -> Result<Vec<(String, Value)>, RuntimeError> {
    Ok(match value {
        Value::Undefined | Value::Null => {
            return Err(RuntimeError::Type(format!(
                "Object.{method} called on {}",
                value.to_js_string()
            )))
        }
        Value::Object(props) => props
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::from(c.to_string())))
            .collect(),
        _ => Vec::new(),
    })
}

fn object_keys(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let keys = entries_of(&arg(args, 0), "keys")?
        .into_iter()
        .map(|(k, _)| Value::from(k))
        .collect();
    Ok(Value::new_array(keys))
}

fn object_values(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let values = entries_of(&arg(args, 0), "values")?
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    Ok(Value::new_array(values))
}

fn object_entries(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let entries = entries_of(&arg(args, 0), "entries")?
        .into_iter()
        .map(|(k, v)| Value::new_array(vec![Value::from(k), v]))
        .collect();
    Ok(Value::new_array(entries))
}

/// `Object.assign(target, ...sources)`
fn object_assign(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let target = arg(args, 0);
    if target.is_nullish() {
        return Err(RuntimeError::Type(
            "cannot convert undefined or null to object".to_string(),
        ));
    }
    for source in args.iter().skip(1).filter(|s| !s.is_nullish()) {
        for (key, value) in entries_of(source, "assign")? {
            set_property(&target, &key, value)?;
        }
    }
    Ok(target)
}

/// `Object.fromEntries([[k, v], ...])`
fn object_from_entries(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let Value::Array(pairs) = arg(args, 0) else {
        return Err(RuntimeError::NotIterable {
            what: arg(args, 0).to_js_string(),
        });
    };
    let mut props = IndexMap::new();
    for pair in pairs.borrow().iter() {
        let Value::Array(pair) = pair else {
            return Err(RuntimeError::Type(format!(
                "iterator value {} is not an entry object",
                pair.to_js_string()
            )));
        };
        let pair = pair.borrow();
        let key = pair
            .first()
            .map(property_key)
            .unwrap_or_else(|| "undefined".to_string());
        props.insert(key, pair.get(1).cloned().unwrap_or_default());
    }
    Ok(Value::new_object(props))
}
