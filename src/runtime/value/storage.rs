//! Backing storage of arrays and objects
//!
//! Values can nest arbitrarily deep (`a = [a]` in a loop), so nothing that
//! follows nested values may recurse without a bound. Dropping storage
//! releases nested values through an explicit work list; traversals that do
//! recurse stop at [`MAX_VALUE_DEPTH`].

use std::mem;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Function, Value};

/// Deepest value that conversions and `JSON.stringify` descend into
pub const MAX_VALUE_DEPTH: usize = 2048;

/// Elements of an array
#[derive(Debug, Default)]
pub struct Elements(Vec<Value>);

/// Properties of an object, in insertion order
#[derive(Debug, Default)]
pub struct Properties(IndexMap<String, Value>);

impl From<Vec<Value>> for Elements {
    fn from(items: Vec<Value>) -> Self {
        Self(items)
    }
}

impl From<IndexMap<String, Value>> for Properties {
    fn from(props: IndexMap<String, Value>) -> Self {
        Self(props)
    }
}

impl Deref for Elements {
    type Target = Vec<Value>;

    fn deref(&self) -> &Vec<Value> {
        &self.0
    }
}

impl DerefMut for Elements {
    fn deref_mut(&mut self) -> &mut Vec<Value> {
        &mut self.0
    }
}

impl Deref for Properties {
    type Target = IndexMap<String, Value>;

    fn deref(&self) -> &IndexMap<String, Value> {
        &self.0
    }
}

impl DerefMut for Properties {
    fn deref_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.0
    }
}

impl Drop for Elements {
    fn drop(&mut self) {
        release(mem::take(&mut self.0));
    }
}

impl Drop for Properties {
    fn drop(&mut self) {
        if !self.0.is_empty() {
            release(mem::take(&mut self.0).into_values().collect());
        }
    }
}

/// Drop values without recursing into the ones they own
///
/// Storage whose last reference is released here is emptied into the work
/// list first, so its own drop has nothing left to follow.
pub(crate) fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => {
                if let Ok(cell) = Rc::try_unwrap(items) {
                    pending.append(&mut cell.into_inner().0);
                }
            }
            Value::Object(props) => {
                if let Ok(cell) = Rc::try_unwrap(props) {
                    pending.extend(mem::take(&mut cell.into_inner().0).into_values());
                }
            }
            Value::Function(func) => match Rc::try_unwrap(func) {
                Ok(Function::Closure {
                    scope: Some(scope), ..
                }) => {
                    if let Ok(mut scope) = Rc::try_unwrap(scope) {
                        pending.extend(scope.take_values());
                    }
                }
                Ok(Function::Native {
                    receiver: Some(receiver),
                    ..
                }) => pending.push(receiver),
                _ => {}
            },
            _ => {}
        }
    }
}
