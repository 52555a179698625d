//! REPL Backend Trait
//!
//! Defines the abstract interface the input loop drives.

use std::time::Duration;

/// Evaluation result
#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    /// Evaluation produced a value; carries its JSON text
    Value(String),
    /// Evaluation produced `null`, `undefined` or a value without a JSON form
    Nil,
    /// Evaluation failed; carries the message
    Error(String),
}

/// Bound name information
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    /// Symbol name
    pub name: String,
    /// Declaration kind (`let`, `const`, `var`, `function`, `implicit`)
    pub kind: &'static str,
    /// `typeof` of the current value
    pub type_name: &'static str,
}

/// Execution statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExecutionStats {
    /// Number of evaluations
    pub eval_count: usize,
    /// Number of evaluations that failed
    pub error_count: usize,
    /// Total execution time
    pub total_time: Duration,
}

/// REPL Backend Trait
///
/// The loop only needs evaluation, the bound names for `env`, and state
/// management; anything that implements this can sit behind it.
pub trait REPLBackend {
    /// Evaluate one normalized unit of input
    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult;

    /// Names bound in the persistent context, in binding order
    fn get_symbols(&self) -> Vec<SymbolInfo>;

    /// Clear all state
    fn clear(&mut self);

    /// Get execution statistics
    fn stats(&self) -> ExecutionStats;
}
