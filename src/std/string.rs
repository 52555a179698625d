//! Standard String library
//!
//! Methods available on string values. Lengths and indices count Unicode
//! scalar values.

use crate::runtime::interpreter::{Interpreter, RuntimeError};
use crate::runtime::value::{relative_index, to_integer, NativeFn, NativeFunction, Value};
use crate::std::{arg, number_arg, string_arg, this_string};

/// Longest string `repeat`/`padStart`/`padEnd` may build
const MAX_STRING_LEN: usize = 1 << 28;

/// Methods of string values
const METHODS: &[(&str, NativeFn)] = &[
    ("toUpperCase", string_to_upper_case),
    ("toLowerCase", string_to_lower_case),
    ("trim", string_trim),
    ("trimStart", string_trim_start),
    ("trimEnd", string_trim_end),
    ("slice", string_slice),
    ("substring", string_substring),
    ("split", string_split),
    ("includes", string_includes),
    ("indexOf", string_index_of),
    ("lastIndexOf", string_last_index_of),
    ("startsWith", string_starts_with),
    ("endsWith", string_ends_with),
    ("repeat", string_repeat),
    ("padStart", string_pad_start),
    ("padEnd", string_pad_end),
    ("charAt", string_char_at),
    ("charCodeAt", string_char_code_at),
    ("at", string_at),
    ("concat", string_concat),
    ("replace", string_replace),
    ("replaceAll", string_replace_all),
    ("toString", string_to_string),
];

/// Look up a string method by name
pub fn method(name: &str) -> Option<NativeFunction> {
    METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, f)| NativeFunction::new(n, f))
}

/// Char index of a byte offset
fn char_index(
    s: &str,
    byte: usize,
) -> usize {
    s[..byte].chars().count()
}

/// Byte offset of a char index, clamped to the end
fn byte_offset(
    s: &str,
    index: usize,
) -> usize {
    s.char_indices().nth(index).map(|(b, _)| b).unwrap_or(s.len())
}

/// Substring by char indices
fn substring(
    s: &str,
    start: usize,
    end: usize,
) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn string_to_upper_case(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this_string(this, "toUpperCase")?.to_uppercase()))
}

fn string_to_lower_case(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this_string(this, "toLowerCase")?.to_lowercase()))
}

fn string_trim(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this_string(this, "trim")?.trim()))
}

fn string_trim_start(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this_string(this, "trimStart")?.trim_start()))
}

fn string_trim_end(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::from(this_string(this, "trimEnd")?.trim_end()))
}

/// `slice(start?, end?)`, negative indices count from the end
fn string_slice(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "slice")?;
    let len = s.chars().count();
    let start = match arg(args, 0) {
        Value::Undefined => 0,
        v => relative_index(v.to_number(), len),
    };
    let end = match arg(args, 1) {
        Value::Undefined => len,
        v => relative_index(v.to_number(), len),
    };
    Ok(Value::from(substring(&s, start, end)))
}

/// `substring(start, end?)`: negative clamps to 0, arguments swap if reversed
fn string_substring(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "substring")?;
    let len = s.chars().count();
    let clamp = |v: Value| to_integer(v.to_number()).clamp(0.0, len as f64) as usize;
    let start = clamp(arg(args, 0));
    let end = match arg(args, 1) {
        Value::Undefined => len,
        v => clamp(v),
    };
    Ok(Value::from(substring(&s, start.min(end), start.max(end))))
}

/// `split(separator?, limit?)`
fn string_split(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "split")?;
    let limit = match arg(args, 1) {
        Value::Undefined => usize::MAX,
        v => to_integer(v.to_number()).max(0.0) as usize,
    };
    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::String(s.clone())],
        sep => {
            let sep = sep.to_js_string();
            if sep.is_empty() {
                s.chars().map(|c| Value::from(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(Value::from).collect()
            }
        }
    };
    Ok(Value::new_array(parts.into_iter().take(limit).collect()))
}

/// Char index to start searching from
fn position_arg(
    s: &str,
    args: &[Value],
    i: usize,
) -> usize {
    let len = s.chars().count();
    match args.get(i) {
        Some(v) if !matches!(v, Value::Undefined) => {
            to_integer(v.to_number()).clamp(0.0, len as f64) as usize
        }
        _ => 0,
    }
}

fn string_includes(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "includes")?;
    let from = byte_offset(&s, position_arg(&s, args, 1));
    Ok(Value::Bool(s[from..].contains(string_arg(args, 0).as_str())))
}

fn string_index_of(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "indexOf")?;
    let from = byte_offset(&s, position_arg(&s, args, 1));
    let found = s[from..]
        .find(string_arg(args, 0).as_str())
        .map(|b| char_index(&s, from + b) as f64);
    Ok(Value::Number(found.unwrap_or(-1.0)))
}

fn string_last_index_of(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "lastIndexOf")?;
    let found = s
        .rfind(string_arg(args, 0).as_str())
        .map(|b| char_index(&s, b) as f64);
    Ok(Value::Number(found.unwrap_or(-1.0)))
}

fn string_starts_with(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "startsWith")?;
    let from = byte_offset(&s, position_arg(&s, args, 1));
    Ok(Value::Bool(s[from..].starts_with(string_arg(args, 0).as_str())))
}

fn string_ends_with(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "endsWith")?;
    let end = match arg(args, 1) {
        Value::Undefined => s.len(),
        _ => byte_offset(&s, position_arg(&s, args, 1)),
    };
    Ok(Value::Bool(s[..end].ends_with(string_arg(args, 0).as_str())))
}

fn string_repeat(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "repeat")?;
    let count = to_integer(number_arg(args, 0));
    if count < 0.0 || count.is_infinite() || count * s.len() as f64 > MAX_STRING_LEN as f64 {
        return Err(RuntimeError::Range(format!(
            "invalid count value: {}",
            arg(args, 0).to_js_string()
        )));
    }
    Ok(Value::from(s.repeat(count as usize)))
}

/// Padding to bring `s` to `target` chars
fn padding(
    s: &str,
    args: &[Value],
) -> Result<String, RuntimeError> {
    let target = to_integer(number_arg(args, 0));
    if target > MAX_STRING_LEN as f64 {
        return Err(RuntimeError::Range("invalid string length".to_string()));
    }
    let fill = match arg(args, 1) {
        Value::Undefined => " ".to_string(),
        v => v.to_js_string(),
    };
    let len = s.chars().count();
    if target <= len as f64 || fill.is_empty() {
        return Ok(String::new());
    }
    Ok(fill.chars().cycle().take(target as usize - len).collect())
}

fn string_pad_start(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "padStart")?;
    let mut out = padding(&s, args)?;
    out.push_str(&s);
    Ok(Value::from(out))
}

fn string_pad_end(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "padEnd")?;
    let pad = padding(&s, args)?;
    Ok(Value::from(format!("{s}{pad}")))
}

fn string_char_at(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "charAt")?;
    let index = to_integer(number_arg(args, 0));
    if index < 0.0 {
        return Ok(Value::from(""));
    }
    Ok(Value::from(
        s.chars()
            .nth(index as usize)
            .map(String::from)
            .unwrap_or_default(),
    ))
}

fn string_char_code_at(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "charCodeAt")?;
    let index = to_integer(number_arg(args, 0));
    if index < 0.0 {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(
        s.chars()
            .nth(index as usize)
            .map(|c| c as u32 as f64)
            .unwrap_or(f64::NAN),
    ))
}

fn string_at(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "at")?;
    let len = s.chars().count() as f64;
    let n = to_integer(number_arg(args, 0));
    let index = if n < 0.0 { len + n } else { n };
    if index < 0.0 {
        return Ok(Value::Undefined);
    }
    Ok(s.chars()
        .nth(index as usize)
        .map(|c| Value::from(c.to_string()))
        .unwrap_or_default())
}

fn string_concat(
    _: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let mut out = this_string(this, "concat")?.to_string();
    for value in args {
        out.push_str(&value.to_js_string());
    }
    Ok(Value::from(out))
}

/// `replace(pattern, replacement)` with a string pattern; first match only
fn string_replace(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "replace")?;
    let pattern = string_arg(args, 0);
    let Some(at) = s.find(pattern.as_str()) else {
        return Ok(Value::String(s));
    };
    let replacement = replacement_for(interp, args, &pattern, char_index(&s, at))?;
    Ok(Value::from(format!(
        "{}{}{}",
        &s[..at],
        replacement,
        &s[at + pattern.len()..]
    )))
}

fn string_replace_all(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let s = this_string(this, "replaceAll")?;
    let pattern = string_arg(args, 0);
    if pattern.is_empty() {
        let replacement = replacement_for(interp, args, &pattern, 0)?;
        return Ok(Value::from(s.replace("", &replacement)));
    }
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for (at, _) in s.match_indices(pattern.as_str()) {
        out.push_str(&s[last..at]);
        out.push_str(&replacement_for(interp, args, &pattern, char_index(&s, at))?);
        last = at + pattern.len();
    }
    out.push_str(&s[last..]);
    Ok(Value::from(out))
}

/// Replacement text: a string, or the result of calling a function with
/// `(match, index)`
fn replacement_for(
    interp: &mut Interpreter<'_>,
    args: &[Value],
    matched: &str,
    index: usize,
) -> Result<String, RuntimeError> {
    let replacement = arg(args, 1);
    if replacement.as_function().is_some() {
        let result = interp.call(
            &replacement,
            Value::Undefined,
            &[Value::from(matched), Value::from(index)],
        )?;
        return Ok(result.to_js_string());
    }
    Ok(replacement.to_js_string())
}

fn string_to_string(
    _: &mut Interpreter<'_>,
    this: &Value,
    _: &[Value],
) -> Result<Value, RuntimeError> {
    Ok(Value::String(this_string(this, "toString")?))
}
