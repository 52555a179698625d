//! Tree-walking interpreter
//!
//! Executes parsed programs against a persistent [`Context`](crate::repl::engine::Context).
//! Name resolution goes local scopes, then the context, then the native globals.

mod errors;
mod executor;
mod expr;
pub mod ops;
mod property;
mod scope;

pub use errors::{EvaluationError, RuntimeError};
pub use executor::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use property::{get_property, property_key, set_property};
pub use scope::Scope;
