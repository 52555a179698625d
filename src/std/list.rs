//! Standard Array library
//!
//! The `Array` global and the methods available on array values.

use std::cmp::Ordering;

use crate::runtime::interpreter::{Interpreter, RuntimeError};
use crate::runtime::value::{
    relative_index, NativeFn, NativeFunction, Value, MAX_VALUE_DEPTH,
};
use crate::std::{arg, number_arg, this_array, NativeExport, StdModule};

/// `Array`
pub struct ArrayModule;

impl StdModule for ArrayModule {
    fn namespace(&self) -> Option<&'static str> {
        Some("Array")
    }

    fn exports(&self) -> Vec<NativeExport> {
        vec![
            NativeExport::function("isArray", array_is_array),
            NativeExport::function("of", array_of),
            NativeExport::function("from", array_from),
        ]
    }
}

/// Singleton instance for the Array module.
pub const ARRAY_MODULE: ArrayModule = ArrayModule;

/// Methods of array values
const METHODS: &[(&str, NativeFn)] = &[
    ("push", array_push),
    ("pop", array_pop),
    ("shift", array_shift),
    ("unshift", array_unshift),
    ("slice", array_slice),
    ("concat", array_concat),
    ("join", array_join),
    ("reverse", array_reverse),
    ("indexOf", array_index_of),
    ("lastIndexOf", array_last_index_of),
    ("includes", array_includes),
    ("at", array_at),
    ("fill", array_fill),
    ("map", array_map),
    ("filter", array_filter),
    ("reduce", array_reduce),
    ("forEach", array_for_each),
    ("find", array_find),
    ("findIndex", array_find_index),
    ("some", array_some),
    ("every", array_every),
    ("flat", array_flat),
    ("sort", array_sort),
    ("toString", array_to_string),
];

/// Look up an array method by name
pub fn method(name: &str) -> Option<NativeFunction> {
    METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, f)| NativeFunction::new(n, f))
}

// ============================================================================
// Array.*
// ============================================================================

fn array_is_array(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Array(_))))
}

fn array_of(
    _: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::new_array(args.to_vec()))
}

/// `Array.from(arrayOrString)`
fn array_from(
    interp: &mut Interpreter<'_>,
    _: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let source = arg(args, 0);
    let items = match &source {
        Value::Array(items) => items.borrow().clone(),
        Value::String(s) => s.chars().map(|c| Value::from(c.to_string())).collect(),
        Value::Undefined | Value::Null => {
            return Err(RuntimeError::NotIterable {
                what: source.to_js_string(),
            })
        }
        _ => Vec::new(),
    };
    let mapper = arg(args, 1);
    if matches!(mapper, Value::Undefined) {
        return Ok(Value::new_array(items));
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(interp.call(&mapper, Value::Undefined, &[item, Value::from(i)])?);
    }
    Ok(Value::new_array(out))
}

// ============================================================================
// Mutators
// ============================================================================

fn array_push(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "push")?;
    let mut items = items.borrow_mut();
    items.extend_from_slice(args);
    Ok(Value::from(items.len()))
}

fn array_pop(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "pop")?;
    let popped = items.borrow_mut().pop();
    Ok(popped.unwrap_or_default())
}

fn array_shift(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "shift")?;
    let mut items = items.borrow_mut();
    if items.is_empty() {
        return Ok(Value::Undefined);
    }
    Ok(items.remove(0))
}

fn array_unshift(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "unshift")?;
    let mut items = items.borrow_mut();
    items.splice(0..0, args.iter().cloned());
    Ok(Value::from(items.len()))
}

fn array_reverse(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    this_array(this, "reverse")?.borrow_mut().reverse();
    Ok(this.clone())
}

/// `fill(value, start?, end?)`
fn array_fill(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "fill")?;
    let mut items = items.borrow_mut();
    let (start, end) = range_args(args, 1, items.len());
    let value = arg(args, 0);
    for item in items.iter_mut().take(end).skip(start) {
        *item = value.clone();
    }
    Ok(this.clone())
}

/// `sort(compare?)`; without a comparator elements sort by their string
/// form, `undefined` last
fn array_sort(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "sort")?;
    let snapshot = items.borrow().clone();
    let (mut defined, undefined): (Vec<Value>, Vec<Value>) = snapshot
        .into_iter()
        .partition(|v| !matches!(v, Value::Undefined));

    let comparator = arg(args, 0);
    let mut compare = |a: &Value, b: &Value| -> Result<Ordering, RuntimeError> {
        if comparator.is_nullish() {
            return Ok(a.to_js_string().cmp(&b.to_js_string()));
        }
        let n = interp
            .call(&comparator, Value::Undefined, &[a.clone(), b.clone()])?
            .to_number();
        Ok(n.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
    };
    merge_sort(&mut defined, &mut compare)?;

    defined.extend(undefined);
    let mut items = items.borrow_mut();
    items.clear();
    items.extend(defined);
    Ok(this.clone())
}

/// Stable merge sort with a fallible comparator; an inconsistent
/// comparator yields some order instead of a panic
fn merge_sort<F>(
    items: &mut Vec<Value>,
    compare: &mut F,
) -> Result<(), RuntimeError>
where
    F: FnMut(&Value, &Value) -> Result<Ordering, RuntimeError>,
{
    if items.len() <= 1 {
        return Ok(());
    }
    let mut right = items.split_off(items.len() / 2);
    merge_sort(items, compare)?;
    merge_sort(&mut right, compare)?;

    let left = std::mem::take(items);
    items.reserve(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        if compare(a, b)? == Ordering::Greater {
            items.extend(right.next());
        } else {
            items.extend(left.next());
        }
    }
    items.extend(left);
    items.extend(right);
    Ok(())
}

// ============================================================================
// Accessors
// ============================================================================

/// Resolve `(start?, end?)` arguments at `first` into a range of `0..len`
fn range_args(
    args: &[Value],
    first: usize,
    len: usize,
) -> (usize, usize) {
    let start = match args.get(first) {
        Some(v) if !matches!(v, Value::Undefined) => relative_index(v.to_number(), len),
        _ => 0,
    };
    let end = match args.get(first + 1) {
        Some(v) if !matches!(v, Value::Undefined) => relative_index(v.to_number(), len),
        _ => len,
    };
    (start, end.max(start))
}

fn array_slice(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "slice")?;
    let items = items.borrow();
    let (start, end) = range_args(args, 0, items.len());
    Ok(Value::new_array(items[start..end].to_vec()))
}

fn array_concat(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let mut out = this_array(this, "concat")?.borrow().clone();
    for value in args {
        match value {
            Value::Array(other) => out.extend(other.borrow().iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    Ok(Value::new_array(out))
}

fn array_join(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "join")?;
    let separator = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        other => other.to_js_string(),
    };
    if separator == "," {
        return Ok(Value::from(this.to_js_string()));
    }
    let parts: Vec<String> = items
        .borrow()
        .iter()
        .map(|v| if v.is_nullish() { String::new() } else { v.to_js_string() })
        .collect();
    Ok(Value::from(parts.join(&separator)))
}

fn array_to_string(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    this_array(this, "toString")?;
    Ok(Value::from(this.to_js_string()))
}

fn array_index_of(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "indexOf")?;
    let items = items.borrow();
    let needle = arg(args, 0);
    let start = match args.get(1) {
        Some(v) => relative_index(v.to_number(), items.len()),
        None => 0,
    };
    let found = items
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, v)| v.strict_equals(&needle))
        .map(|(i, _)| i as f64);
    Ok(Value::Number(found.unwrap_or(-1.0)))
}

fn array_last_index_of(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "lastIndexOf")?;
    let needle = arg(args, 0);
    let found = items
        .borrow()
        .iter()
        .rposition(|v| v.strict_equals(&needle))
        .map(|i| i as f64);
    Ok(Value::Number(found.unwrap_or(-1.0)))
}

/// SameValueZero: like `===` but NaN equals NaN
fn same_value_zero(
    a: &Value,
    b: &Value,
) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

fn array_includes(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "includes")?;
    let needle = arg(args, 0);
    let found = items.borrow().iter().any(|v| same_value_zero(v, &needle));
    Ok(Value::Bool(found))
}

fn array_at(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "at")?;
    let items = items.borrow();
    let n = number_arg(args, 0);
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    let index = if n < 0.0 { items.len() as f64 + n } else { n };
    if index < 0.0 {
        return Ok(Value::Undefined);
    }
    Ok(items.get(index as usize).cloned().unwrap_or_default())
}

/// Longest array `flat` builds
const MAX_FLAT_LENGTH: usize = 1 << 22;

fn flatten_into(
    out: &mut Vec<Value>,
    items: &[Value],
    depth: f64,
    level: usize,
) -> Result<(), RuntimeError> {
    for item in items {
        match item {
            Value::Array(inner) if depth >= 1.0 => {
                // arrays nested in themselves end here too
                if level >= MAX_VALUE_DEPTH {
                    return Err(RuntimeError::StackOverflow);
                }
                let inner = inner.borrow().clone();
                flatten_into(out, &inner, depth - 1.0, level + 1)?;
            }
            other => {
                if out.len() >= MAX_FLAT_LENGTH {
                    return Err(RuntimeError::Range("invalid array length".to_string()));
                }
                out.push(other.clone());
            }
        }
    }
    Ok(())
}

/// `flat(depth = 1)`
fn array_flat(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = this_array(this, "flat")?.borrow().clone();
    let depth = match arg(args, 0) {
        Value::Undefined => 1.0,
        other => other.to_number(),
    };
    let mut out = Vec::with_capacity(items.len());
    flatten_into(&mut out, &items, if depth.is_nan() { 0.0 } else { depth }, 0)?;
    Ok(Value::new_array(out))
}

// ============================================================================
// Iteration with callbacks
// ============================================================================

/// Snapshot of the receiver and the callback argument
fn iteration_args(
    this: &Value,
    args: &[Value],
    method: &str,
) -> Result<(Vec<Value>, Value), RuntimeError> {
    let snapshot = this_array(this, method)?.borrow().clone();
    Ok((snapshot, arg(args, 0)))
}

/// Call `callback(item, index, array)`
fn visit(
    interp: &mut Interpreter<'_>,
    callback: &Value,
    item: &Value,
    index: usize,
    this: &Value,
) -> Result<Value, RuntimeError> {
    interp.call(
        callback,
        Value::Undefined,
        &[item.clone(), Value::from(index), this.clone()],
    )
}

fn array_map(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let (items, callback) = iteration_args(this, args, "map")?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(visit(interp, &callback, item, i, this)?);
    }
    Ok(Value::new_array(out))
}

fn array_filter(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let (items, callback) = iteration_args(this, args, "filter")?;
    let mut out = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if visit(interp, &callback, item, i, this)?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::new_array(out))
}

fn array_for_each(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let (items, callback) = iteration_args(this, args, "forEach")?;
    for (i, item) in items.iter().enumerate() {
        visit(interp, &callback, item, i, this)?;
    }
    Ok(Value::Undefined)
}

/// `reduce(callback, initial?)`
fn array_reduce(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let (items, callback) = iteration_args(this, args, "reduce")?;
    let mut iter = items.iter().enumerate();
    let mut acc = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match iter.next() {
            Some((_, first)) => first.clone(),
            None => {
                return Err(RuntimeError::Type(
                    "reduce of empty array with no initial value".to_string(),
                ))
            }
        },
    };
    for (i, item) in iter {
        acc = interp.call(
            &callback,
            Value::Undefined,
            &[acc, item.clone(), Value::from(i), this.clone()],
        )?;
    }
    Ok(acc)
}

/// First index whose callback result is truthy
fn find_position(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
    method: &str,
) -> Result<Option<(usize, Value)>, RuntimeError> {
    let (items, callback) = iteration_args(this, args, method)?;
    for (i, item) in items.iter().enumerate() {
        if visit(interp, &callback, item, i, this)?.is_truthy() {
            return Ok(Some((i, item.clone())));
        }
    }
    Ok(None)
}

fn array_find(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(find_position(interp, this, args, "find")?
        .map(|(_, v)| v)
        .unwrap_or_default())
}

fn array_find_index(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Number(
        find_position(interp, this, args, "findIndex")?
            .map(|(i, _)| i as f64)
            .unwrap_or(-1.0),
    ))
}

fn array_some(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(find_position(interp, this, args, "some")?.is_some()))
}

fn array_every(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let (items, callback) = iteration_args(this, args, "every")?;
    for (i, item) in items.iter().enumerate() {
        if !visit(interp, &callback, item, i, this)?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}
