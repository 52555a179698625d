//! REPL Engine Module
//!
//! The persistent context and the evaluator that runs input against it.

pub mod context;
pub mod evaluator;

pub use context::{Binding, BindingKind, Context};
pub use evaluator::{normalize, Evaluator};
