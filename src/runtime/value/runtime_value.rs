//! Runtime value type
//!
//! `Value` is the representation of every value an evaluated program can
//! produce. Primitives are stored inline; arrays and objects are shared,
//! mutable and compared by identity, like JavaScript references.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::convert::{number_to_string, string_to_number};
use super::function::Function;
use super::storage::{Elements, Properties, MAX_VALUE_DEPTH};

/// Shared, mutable array storage
pub type ArrayRef = Rc<RefCell<Elements>>;

/// Shared, mutable object storage; keys keep insertion order
pub type ObjectRef = Rc<RefCell<Properties>>;

/// Runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,

    /// `null`
    Null,

    /// Boolean
    Bool(bool),

    /// IEEE-754 double
    Number(f64),

    /// Immutable string
    String(Rc<str>),

    /// Array (reference semantics)
    Array(ArrayRef),

    /// Plain object (reference semantics)
    Object(ObjectRef),

    /// Closure or native function
    Function(Rc<Function>),
}

impl Value {
    /// Create a new array value
    pub fn new_array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(Elements::from(items))))
    }

    /// Create a new object value
    pub fn new_object(props: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(Properties::from(props))))
    }

    /// Create an empty object value
    pub fn empty_object() -> Self {
        Self::new_object(IndexMap::new())
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// ToBoolean
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// ToNumber
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// ToString
    pub fn to_js_string(&self) -> String {
        let mut seen = Vec::new();
        self.write_js_string(&mut seen)
    }

    fn write_js_string(
        &self,
        seen: &mut Vec<*const ()>,
    ) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => {
                let ptr = Rc::as_ptr(items) as *const ();
                // cyclic arrays join as empty, and so do levels past the depth bound
                if seen.contains(&ptr) || seen.len() >= MAX_VALUE_DEPTH {
                    return String::new();
                }
                seen.push(ptr);
                let parts: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.write_js_string(seen)
                        }
                    })
                    .collect();
                seen.pop();
                parts.join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(func) => func.to_string(),
        }
    }

    /// Strict equality (`===`)
    pub fn strict_equals(
        &self,
        other: &Value,
    ) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`)
    pub fn loose_equals(
        &self,
        other: &Value,
    ) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::String(_))
            | (Value::String(_), Value::Number(_))
            | (Value::Bool(_), _)
            | (_, Value::Bool(_)) => {
                if matches!(self, Value::Array(_) | Value::Object(_))
                    || matches!(other, Value::Array(_) | Value::Object(_))
                {
                    self.to_primitive().loose_equals(&other.to_primitive())
                } else {
                    self.to_number() == other.to_number()
                }
            }
            (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::String(_))
            | (Value::Number(_) | Value::String(_), Value::Array(_) | Value::Object(_)) => {
                self.to_primitive().loose_equals(&other.to_primitive())
            }
            _ => self.strict_equals(other),
        }
    }

    /// ToPrimitive with string hint; primitives are returned unchanged
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Function(_) => {
                Value::from(self.to_js_string())
            }
            other => other.clone(),
        }
    }

    /// Borrow the string contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Get the number, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the function, if this is callable
    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.strict_equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::new_array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(props: IndexMap<String, Value>) -> Self {
        Value::new_object(props)
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            // contents are not followed; they may be cyclic
            Value::Array(items) => write!(f, "Array(len={})", items.borrow().len()),
            Value::Object(props) => write!(f, "Object(keys={:?})", props.borrow().keys().collect::<Vec<_>>()),
            Value::Function(func) => write!(f, "{func:?}"),
        }
    }
}
