//! Standard library
//!
//! Native functions available to evaluated programs. Each submodule is a
//! [`StdModule`] listing its exports; the registry collects them once per
//! process and [`Globals`] turns them into values for one evaluator.

use std::rc::Rc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::runtime::interpreter::RuntimeError;
use crate::runtime::value::{ArrayRef, Function, NativeFn, NativeFunction, Value};

pub mod convert;
pub mod dict;
pub mod io;
pub mod json;
pub mod list;
pub mod math;
pub mod string;

#[cfg(test)]
mod tests;

/// What a native export provides
#[derive(Clone, Copy)]
pub enum ExportValue {
    Function(NativeFn),
    Number(f64),
}

/// A named export of a std module
#[derive(Clone, Copy)]
pub struct NativeExport {
    /// Name inside the module (or global name for modules without namespace)
    pub name: &'static str,
    pub value: ExportValue,
}

impl NativeExport {
    pub const fn function(
        name: &'static str,
        func: NativeFn,
    ) -> Self {
        Self {
            name,
            value: ExportValue::Function(func),
        }
    }

    pub const fn constant(
        name: &'static str,
        value: f64,
    ) -> Self {
        Self {
            name,
            value: ExportValue::Number(value),
        }
    }

    fn to_value(self) -> Value {
        match self.value {
            ExportValue::Function(func) => Function::native(NativeFunction::new(self.name, func)),
            ExportValue::Number(n) => Value::Number(n),
        }
    }
}

/// A std module
pub trait StdModule: Sync {
    /// Global object the exports live on (`Math`), or `None` when every
    /// export is a global of its own (`parseInt`)
    fn namespace(&self) -> Option<&'static str>;

    /// Exported functions and constants
    fn exports(&self) -> Vec<NativeExport>;
}

/// Every module installed as a global
const STD_MODULES: &[&dyn StdModule] = &[
    &math::MATH_MODULE,
    &json::JSON_MODULE,
    &dict::OBJECT_MODULE,
    &list::ARRAY_MODULE,
    &convert::CONVERT_MODULE,
    &io::CONSOLE_MODULE,
];

enum RegistryEntry {
    Function(NativeExport),
    Namespace(Vec<NativeExport>),
}

/// Native function registry
pub struct NativeRegistry {
    entries: IndexMap<&'static str, RegistryEntry>,
}

/// Process-wide registry of the std modules
pub static NATIVE_REGISTRY: Lazy<NativeRegistry> = Lazy::new(|| {
    let mut registry = NativeRegistry {
        entries: IndexMap::new(),
    };
    for module in STD_MODULES {
        registry.register(*module);
    }
    registry
});

impl NativeRegistry {
    /// Register a module's exports
    pub fn register(
        &mut self,
        module: &dyn StdModule,
    ) {
        match module.namespace() {
            Some(namespace) => {
                self.entries
                    .insert(namespace, RegistryEntry::Namespace(module.exports()));
            }
            None => {
                for export in module.exports() {
                    self.entries.insert(export.name, RegistryEntry::Function(export));
                }
            }
        }
    }

    /// Global names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Look up a native by path (`parseInt`, `Math.max`)
    pub fn get(
        &self,
        path: &str,
    ) -> Option<NativeExport> {
        match path.split_once('.') {
            Some((namespace, name)) => match self.entries.get(namespace)? {
                RegistryEntry::Namespace(exports) => {
                    exports.iter().find(|e| e.name == name).copied()
                }
                RegistryEntry::Function(_) => None,
            },
            None => match self.entries.get(path)? {
                RegistryEntry::Function(export) => Some(*export),
                RegistryEntry::Namespace(_) => None,
            },
        }
    }
}

/// Global values for one evaluator
///
/// Built from the registry; namespaces become plain objects. These are not
/// context bindings, so they never show up in `env`, but a context binding
/// of the same name shadows them.
#[derive(Debug)]
pub struct Globals {
    values: IndexMap<&'static str, Value>,
}

impl Default for Globals {
    fn default() -> Self {
        Self::new()
    }
}

impl Globals {
    /// Instantiate every registered native
    pub fn new() -> Self {
        let values = NATIVE_REGISTRY
            .entries
            .iter()
            .map(|(name, entry)| {
                let value = match entry {
                    RegistryEntry::Function(export) => export.to_value(),
                    RegistryEntry::Namespace(exports) => Value::new_object(
                        exports
                            .iter()
                            .map(|e| (e.name.to_string(), e.to_value()))
                            .collect(),
                    ),
                };
                (*name, value)
            })
            .collect();
        Self { values }
    }

    /// Get a global by name
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether `name` is a global
    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.values.contains_key(name)
    }
}

// ============================================================================
// Argument helpers shared by the modules
// ============================================================================

/// Argument `i`, `undefined` when missing
pub(crate) fn arg(
    args: &[Value],
    i: usize,
) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

/// Argument `i` converted with ToNumber
pub(crate) fn number_arg(
    args: &[Value],
    i: usize,
) -> f64 {
    args.get(i).map(Value::to_number).unwrap_or(f64::NAN)
}

/// Argument `i` converted with ToString
pub(crate) fn string_arg(
    args: &[Value],
    i: usize,
) -> String {
    args.get(i).map(Value::to_js_string).unwrap_or_else(|| "undefined".to_string())
}

/// Receiver of an array method
pub(crate) fn this_array(
    this: &Value,
    method: &str,
) -> Result<ArrayRef, RuntimeError> {
    match this {
        Value::Array(items) => Ok(Rc::clone(items)),
        other => Err(RuntimeError::Type(format!(
            "Array.prototype.{method} called on {}",
            other.type_of()
        ))),
    }
}

/// Receiver of a string method
pub(crate) fn this_string(
    this: &Value,
    method: &str,
) -> Result<Rc<str>, RuntimeError> {
    match this {
        Value::String(s) => Ok(Rc::clone(s)),
        other if other.is_nullish() => Err(RuntimeError::Type(format!(
            "String.prototype.{method} called on {}",
            other.to_js_string()
        ))),
        other => Ok(Rc::from(other.to_js_string())),
    }
}
