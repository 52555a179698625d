//! Runtime values
//!
//! This module provides the value representation used by the interpreter,
//! the JavaScript conversion rules between values, and JSON encoding.

mod convert;
mod function;
pub mod json;
mod runtime_value;
mod storage;

pub use convert::*;
pub use function::*;
pub use runtime_value::*;
pub(crate) use storage::release;
pub use storage::{Elements, Properties, MAX_VALUE_DEPTH};

#[cfg(test)]
mod tests;
