//! REPL Execution Context
//!
//! The persistent global scope shared by every evaluation of a session.

use std::time::Duration;

use indexmap::IndexMap;

use crate::repl::backend_trait::{ExecutionStats, SymbolInfo};
use crate::runtime::interpreter::RuntimeError;
use crate::runtime::value::Value;

/// How a context binding was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Let,
    Const,
    Var,
    Function,
    /// Created by assigning to an unbound name
    Implicit,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Var => "var",
            BindingKind::Function => "function",
            BindingKind::Implicit => "implicit",
        }
    }
}

/// A named value in the context
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub kind: BindingKind,
}

/// REPL Execution Context
///
/// Stores bindings across evaluations, in the order they were first made.
#[derive(Debug, Default)]
pub struct Context {
    /// name -> binding
    bindings: IndexMap<String, Binding>,
    /// Execution statistics
    stats: ExecutionStats,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a binding; a redeclaration replaces the old one in place
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        value: Value,
        kind: BindingKind,
    ) {
        self.bindings.insert(name.into(), Binding { value, kind });
    }

    /// Assign to a binding, creating an implicit one when `name` is unbound
    pub fn assign(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        match self.bindings.get_mut(name) {
            Some(binding) if binding.kind == BindingKind::Const => {
                Err(RuntimeError::ConstAssignment {
                    name: name.to_string(),
                })
            }
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => {
                self.declare(name, value, BindingKind::Implicit);
                Ok(())
            }
        }
    }

    /// Get a bound value
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.bindings.get(name).map(|b| &b.value)
    }

    /// Get a binding with its kind
    pub fn binding(
        &self,
        name: &str,
    ) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Whether `name` is bound
    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names in binding order
    pub fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Describe every binding
    pub fn get_all_symbols(&self) -> Vec<SymbolInfo> {
        self.bindings
            .iter()
            .map(|(name, binding)| SymbolInfo {
                name: name.clone(),
                kind: binding.kind.as_str(),
                type_name: binding.value.type_of(),
            })
            .collect()
    }

    /// Record one evaluation
    pub fn increment_eval(
        &mut self,
        duration: Duration,
        failed: bool,
    ) {
        self.stats.eval_count += 1;
        if failed {
            self.stats.error_count += 1;
        }
        self.stats.total_time += duration;
    }

    /// Clear all state
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.stats = ExecutionStats::default();
    }

    /// Get statistics
    pub fn stats(&self) -> ExecutionStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_keep_binding_order() {
        let mut context = Context::new();
        context.declare("b", Value::Null, BindingKind::Let);
        context.declare("a", Value::Null, BindingKind::Var);
        context.declare("b", Value::Bool(true), BindingKind::Const);
        assert_eq!(context.names(), ["b", "a"]);
        assert_eq!(context.binding("b").unwrap().kind, BindingKind::Const);
    }

    #[test]
    fn test_assign() {
        let mut context = Context::new();
        context.assign("x", Value::from(1.0)).unwrap();
        assert_eq!(context.binding("x").unwrap().kind, BindingKind::Implicit);

        context.declare("c", Value::from(1.0), BindingKind::Const);
        assert_eq!(
            context.assign("c", Value::from(2.0)),
            Err(RuntimeError::ConstAssignment {
                name: "c".to_string()
            })
        );
        assert_eq!(context.get("c"), Some(&Value::from(1.0)));
    }

    #[test]
    fn test_symbols_and_clear() {
        let mut context = Context::new();
        context.declare("f", Value::from("s"), BindingKind::Function);
        let symbols = context.get_all_symbols();
        assert_eq!(symbols[0].kind, "function");
        assert_eq!(symbols[0].type_name, "string");

        context.increment_eval(Duration::from_millis(2), true);
        assert_eq!(context.stats().error_count, 1);
        context.clear();
        assert!(context.is_empty());
        assert_eq!(context.stats(), ExecutionStats::default());
    }
}
