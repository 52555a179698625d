//! remeval
//!
//! A line-oriented evaluator loop: each line of input is evaluated as
//! strict-mode JavaScript against a context that persists for the whole
//! session, and answered with one line of JSON.
//!
//! # Example
//!
//! ```no_run
//! use remeval::util::config::ReplConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let stdin = std::io::stdin();
//!     remeval::run_loop(&ReplConfig::default(), stdin.lock(), std::io::stdout())
//! }
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod frontend;
pub mod repl;
pub mod runtime;
pub mod std;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use repl::{EvalResult, Evaluator, LineLoop, REPLBackend};
pub use runtime::interpreter::EvaluationError;
pub use runtime::value::Value;

use ::std::io::{BufRead, Write};

use tracing::debug;

use crate::runtime::interpreter::Interpreter;
use crate::util::config::ReplConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "remeval";

/// Evaluate a program in a fresh context and return its completion value
///
/// # Example
///
/// ```
/// let value = remeval::run("let x = 2; x * 21").unwrap();
/// assert_eq!(value.to_number(), 42.0);
/// ```
pub fn run(source: &str) -> ::std::result::Result<Value, EvaluationError> {
    debug!("run called ({} bytes)", source.len());
    let program = frontend::parse_source(source)?;
    let mut context = repl::Context::new();
    let globals = crate::std::Globals::new();
    let mut interpreter = Interpreter::new(&mut context, &globals);
    Ok(interpreter.run(&program)?)
}

/// Run the evaluator loop over a reader/writer pair until end of input
pub fn run_loop<R: BufRead, W: Write>(
    config: &ReplConfig,
    reader: R,
    writer: W,
) -> Result<()> {
    let evaluator = Evaluator::new().with_max_call_depth(config.max_call_depth);
    LineLoop::new(evaluator, config).run(reader, writer)
}
