//! Function values

use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::frontend::parser::ast::FunctionDef;
use crate::runtime::interpreter::{Interpreter, RuntimeError, Scope};

/// Signature of a native function: interpreter, `this`, arguments
pub type NativeFn = fn(&mut Interpreter<'_>, &Value, &[Value]) -> Result<Value, RuntimeError>;

/// Native function with a static name
#[derive(Clone, Copy)]
pub struct NativeFunction {
    /// Name used in messages
    pub name: &'static str,
    /// Implementation
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(
        name: &'static str,
        func: NativeFn,
    ) -> Self {
        Self { name, func }
    }
}

/// Callable value
pub enum Function {
    /// User function closing over the scope it was created in
    Closure {
        def: Rc<FunctionDef>,
        /// `None` when created at top level; globals resolve through the context
        scope: Option<Rc<Scope>>,
    },
    /// Native function, optionally bound to a receiver (methods of primitives,
    /// arrays and strings)
    Native {
        native: NativeFunction,
        receiver: Option<Value>,
    },
}

impl Function {
    /// Unbound native function value
    pub fn native(native: NativeFunction) -> Value {
        Value::Function(Rc::new(Function::Native {
            native,
            receiver: None,
        }))
    }

    /// Native method bound to `receiver`
    pub fn method(
        native: NativeFunction,
        receiver: Value,
    ) -> Value {
        Value::Function(Rc::new(Function::Native {
            native,
            receiver: Some(receiver),
        }))
    }

    /// Function name, empty for anonymous functions
    pub fn name(&self) -> &str {
        match self {
            Function::Closure { def, .. } => def.name.as_deref().unwrap_or(""),
            Function::Native { native, .. } => native.name,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Function::Closure { def, .. } if def.is_arrow => write!(f, "() => {{ ... }}"),
            Function::Closure { .. } => write!(f, "function {}() {{ ... }}", self.name()),
            Function::Native { .. } => write!(f, "function {}() {{ [native code] }}", self.name()),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Function::Closure { def, .. } => f
                .debug_struct("Closure")
                .field("name", &def.name)
                .field("params", &def.params.len())
                .finish(),
            Function::Native { native, receiver } => f
                .debug_struct("Native")
                .field("name", &native.name)
                .field("bound", &receiver.is_some())
                .finish(),
        }
    }
}
