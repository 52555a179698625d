//! REPL Module
//!
//! This module contains:
//! - [`backend_trait::REPLBackend`] - Abstract interface the loops drive
//! - [`engine::Evaluator`] - Normalize, evaluate, encode
//! - [`engine::Context`] - Bindings persisted across evaluations
//! - [`commands::CommandHandler`] - Reserved inputs (`env`)
//! - [`line::LineLoop`] - Stream loop over a reader/writer pair
//! - [`interactive::LineREPL`] - Terminal loop with rustyline
//! - [`outcome::Outcome`] - Output line encoding

pub mod backend_trait;
pub mod commands;
pub mod engine;
pub mod interactive;
pub mod line;
pub mod outcome;

pub use backend_trait::{EvalResult, ExecutionStats, REPLBackend, SymbolInfo};
pub use commands::{CommandHandler, CommandResult};
pub use engine::{Context, Evaluator};
pub use interactive::LineREPL;
pub use line::LineLoop;
pub use outcome::Outcome;
