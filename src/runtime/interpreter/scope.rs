//! Lexical scopes for function calls and blocks
//!
//! The persistent context is the outermost scope and is not represented
//! here; a scope chain ending in `None` continues into the context.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::RuntimeError;
use crate::runtime::value::{release, Value};

#[derive(Debug, Clone)]
struct Local {
    value: Value,
    constant: bool,
}

/// One lexical scope
#[derive(Debug)]
pub struct Scope {
    bindings: RefCell<HashMap<String, Local>>,
    parent: Option<Rc<Scope>>,
    /// `this` of a non-arrow function scope
    this: Option<Value>,
    /// Function scopes receive `var` declarations
    is_function: bool,
}

impl Scope {
    /// Scope of a function call
    pub fn function(
        parent: Option<Rc<Scope>>,
        this: Option<Value>,
    ) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent,
            this,
            is_function: true,
        })
    }

    /// Scope of a block or loop
    pub fn block(parent: Option<Rc<Scope>>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent,
            this: None,
            is_function: false,
        })
    }

    /// Sibling scope with a copy of the current bindings (per-iteration loop scope)
    pub fn copy(&self) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(self.bindings.borrow().clone()),
            parent: self.parent.clone(),
            this: self.this.clone(),
            is_function: self.is_function,
        })
    }

    /// Declare or redeclare a binding in this scope
    pub fn declare(
        &self,
        name: &str,
        value: Value,
        constant: bool,
    ) {
        self.bindings
            .borrow_mut()
            .insert(name.to_string(), Local { value, constant });
    }

    /// Resolve a name along the scope chain
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<Value> {
        if let Some(local) = self.bindings.borrow().get(name) {
            return Some(local.value.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Assign to an existing binding along the chain
    ///
    /// Returns `None` when no scope declares `name`.
    pub fn assign(
        &self,
        name: &str,
        value: Value,
    ) -> Option<Result<(), RuntimeError>> {
        if let Some(local) = self.bindings.borrow_mut().get_mut(name) {
            if local.constant {
                return Some(Err(RuntimeError::ConstAssignment {
                    name: name.to_string(),
                }));
            }
            local.value = value;
            return Some(Ok(()));
        }
        self.parent.as_ref().and_then(|p| p.assign(name, value))
    }

    /// `this` of the nearest non-arrow function
    pub fn this(&self) -> Option<Value> {
        match &self.this {
            Some(this) => Some(this.clone()),
            None => self.parent.as_ref().and_then(|p| p.this()),
        }
    }

    /// Move every value out of this scope, leaving it empty
    pub(crate) fn take_values(&mut self) -> Vec<Value> {
        let mut values: Vec<Value> = std::mem::take(self.bindings.get_mut())
            .into_values()
            .map(|local| local.value)
            .collect();
        values.extend(self.this.take());
        values
    }

    /// Nearest function scope, which receives `var` declarations
    pub fn function_scope(self: &Rc<Self>) -> Option<Rc<Scope>> {
        if self.is_function {
            return Some(Rc::clone(self));
        }
        self.parent.as_ref().and_then(|p| p.function_scope())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        release(self.take_values());
    }
}
