//! Expression evaluation

use std::rc::Rc;

use indexmap::IndexMap;

use super::executor::Args;
use super::ops;
use super::property::{get_property, property_key, set_property};
use super::{Interpreter, RuntimeError, Scope};
use crate::frontend::parser::ast::*;
use crate::runtime::value::{number_to_string, Function, Value};

/// Place an assignment writes to
enum Target {
    Name(String),
    Property(Value, String),
}

impl Interpreter<'_> {
    /// Evaluate an expression
    pub(super) fn eval_expr(
        &mut self,
        expr: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Value, RuntimeError> {
        self.nested(|interp| interp.eval_node(expr, scope))
    }

    fn eval_node(
        &mut self,
        expr: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Lit(lit, _) => Ok(match lit {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::from(s.as_str()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
                Literal::Undefined => Value::Undefined,
            }),
            Expr::Ident(name, _) => self.lookup(name, scope).ok_or_else(|| {
                RuntimeError::NotDefined {
                    name: name.clone(),
                }
            }),
            Expr::This(_) => Ok(scope.and_then(|s| s.this()).unwrap_or_default()),
            Expr::Array(items, _) => Ok(Value::new_array(self.eval_list(items, scope)?.into_vec())),
            Expr::Object(props, _) => self.eval_object(props, scope),
            Expr::Function(def) => Ok(Value::Function(Rc::new(Function::Closure {
                def: Rc::clone(def),
                scope: scope.cloned(),
            }))),
            Expr::UnOp { op, expr, .. } => self.eval_unary(*op, expr, scope),
            Expr::Update {
                op, prefix, target, ..
            } => {
                let target = self.resolve_target(target, scope)?;
                let old = self.read_target(&target, scope)?.to_number();
                let new = match op {
                    UpdateOp::Inc => old + 1.0,
                    UpdateOp::Dec => old - 1.0,
                };
                self.write_target(target, Value::Number(new), scope)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expr::BinOp {
                op, left, right, ..
            } => {
                let left = self.eval_expr(left, scope)?;
                let right = self.eval_expr(right, scope)?;
                Ok(ops::binary(*op, &left, &right))
            }
            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.eval_expr(left, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval_expr(right, scope)
                }
            }
            Expr::Assign {
                op, target, value, ..
            } => {
                let target = self.resolve_target(target, scope)?;
                let value = match op {
                    AssignOp::Assign => self.eval_expr(value, scope)?,
                    AssignOp::Compound(bin) => {
                        let current = self.read_target(&target, scope)?;
                        let rhs = self.eval_expr(value, scope)?;
                        ops::binary(*bin, &current, &rhs)
                    }
                };
                self.write_target(target, value.clone(), scope)?;
                Ok(value)
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                if self.eval_expr(condition, scope)?.is_truthy() {
                    self.eval_expr(then_expr, scope)
                } else {
                    self.eval_expr(else_expr, scope)
                }
            }
            Expr::Call { .. } | Expr::Member { .. } => {
                Ok(self.eval_chain(expr, scope)?.unwrap_or_default())
            }
        }
    }

    /// Evaluate a member/call chain; `None` when an optional link short-circuits
    fn eval_chain(
        &mut self,
        expr: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Option<Value>, RuntimeError> {
        self.nested(|interp| interp.eval_link(expr, scope))
    }

    fn eval_link(
        &mut self,
        expr: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Option<Value>, RuntimeError> {
        match expr {
            Expr::Member {
                object,
                property,
                optional,
                ..
            } => {
                let Some(object) = self.eval_chain(object, scope)? else {
                    return Ok(None);
                };
                if *optional && object.is_nullish() {
                    return Ok(None);
                }
                let key = self.member_key(property, scope)?;
                get_property(&object, &key).map(Some)
            }
            Expr::Call {
                func,
                args,
                optional,
                ..
            } => {
                let (callee, this) = match func.as_ref() {
                    Expr::Member {
                        object,
                        property,
                        optional: member_optional,
                        ..
                    } => {
                        let Some(object) = self.eval_chain(object, scope)? else {
                            return Ok(None);
                        };
                        if *member_optional && object.is_nullish() {
                            return Ok(None);
                        }
                        let key = self.member_key(property, scope)?;
                        (get_property(&object, &key)?, object)
                    }
                    other => match self.eval_chain(other, scope)? {
                        Some(callee) => (callee, Value::Undefined),
                        None => return Ok(None),
                    },
                };
                if *optional && callee.is_nullish() {
                    return Ok(None);
                }
                if callee.as_function().is_none() {
                    return Err(RuntimeError::NotAFunction {
                        callee: describe_callee(func),
                    });
                }
                let args = self.eval_list(args, scope)?;
                self.call(&callee, this, &args).map(Some)
            }
            other => self.eval_expr(other, scope).map(Some),
        }
    }

    fn member_key(
        &mut self,
        property: &MemberKey,
        scope: Option<&Rc<Scope>>,
    ) -> Result<String, RuntimeError> {
        match property {
            MemberKey::Named(name) => Ok(name.clone()),
            MemberKey::Computed(expr) => Ok(property_key(&self.eval_expr(expr, scope)?)),
        }
    }

    /// Evaluate array items or call arguments, expanding spreads
    fn eval_list(
        &mut self,
        items: &[ExprOrSpread],
        scope: Option<&Rc<Scope>>,
    ) -> Result<Args, RuntimeError> {
        let mut out = Args::new();
        for item in items {
            match item {
                ExprOrSpread::Expr(expr) => out.push(self.eval_expr(expr, scope)?),
                ExprOrSpread::Spread(expr) => {
                    let value = self.eval_expr(expr, scope)?;
                    out.extend(iterate(&value, expr)?);
                }
            }
        }
        Ok(out)
    }

    fn eval_object(
        &mut self,
        props: &[Property],
        scope: Option<&Rc<Scope>>,
    ) -> Result<Value, RuntimeError> {
        let mut out = IndexMap::new();
        for prop in props {
            match prop {
                Property::KeyValue(key, value) => {
                    let key = match key {
                        PropertyKey::Named(name) => name.clone(),
                        PropertyKey::Computed(expr) => property_key(&self.eval_expr(expr, scope)?),
                    };
                    let value = self.eval_expr(value, scope)?;
                    out.insert(key, value);
                }
                Property::Shorthand(name, _) => {
                    let value = self.lookup(name, scope).ok_or_else(|| {
                        RuntimeError::NotDefined {
                            name: name.clone(),
                        }
                    })?;
                    out.insert(name.clone(), value);
                }
                Property::Spread(expr) => match self.eval_expr(expr, scope)? {
                    Value::Object(source) => {
                        for (key, value) in source.borrow().iter() {
                            out.insert(key.clone(), value.clone());
                        }
                    }
                    Value::Array(items) => {
                        for (i, value) in items.borrow().iter().enumerate() {
                            out.insert(i.to_string(), value.clone());
                        }
                    }
                    Value::String(s) => {
                        for (i, c) in s.chars().enumerate() {
                            out.insert(i.to_string(), Value::from(c.to_string()));
                        }
                    }
                    // spreading other primitives adds nothing
                    _ => {}
                },
            }
        }
        Ok(Value::new_object(out))
    }

    fn eval_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Value, RuntimeError> {
        // `typeof` of an unbound name is not an error
        if let (UnOp::Typeof, Expr::Ident(name, _)) = (op, operand) {
            let value = self.lookup(name, scope).unwrap_or_default();
            return Ok(Value::from(value.type_of()));
        }

        let value = self.eval_expr(operand, scope)?;
        Ok(match op {
            UnOp::Neg => Value::Number(-value.to_number()),
            UnOp::Pos => Value::Number(value.to_number()),
            UnOp::Not => Value::Bool(!value.is_truthy()),
            UnOp::Typeof => Value::from(value.type_of()),
            UnOp::Void => Value::Undefined,
        })
    }

    fn resolve_target(
        &mut self,
        target: &Expr,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Target, RuntimeError> {
        match target {
            Expr::Ident(name, _) => Ok(Target::Name(name.clone())),
            Expr::Member {
                object, property, ..
            } => {
                let object = self.eval_expr(object, scope)?;
                let key = self.member_key(property, scope)?;
                Ok(Target::Property(object, key))
            }
            // rejected by the parser
            other => Err(RuntimeError::Type(format!(
                "invalid assignment target at {}",
                other.span().start
            ))),
        }
    }

    fn read_target(
        &mut self,
        target: &Target,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Value, RuntimeError> {
        match target {
            Target::Name(name) => self.lookup(name, scope).ok_or_else(|| {
                RuntimeError::NotDefined {
                    name: name.clone(),
                }
            }),
            Target::Property(object, key) => get_property(object, key),
        }
    }

    fn write_target(
        &mut self,
        target: Target,
        value: Value,
        scope: Option<&Rc<Scope>>,
    ) -> Result<(), RuntimeError> {
        match target {
            Target::Name(name) => self.assign_name(&name, value, scope),
            Target::Property(object, key) => set_property(&object, &key, value),
        }
    }
}

/// Items produced by spreading `value`
fn iterate(
    value: &Value,
    source: &Expr,
) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::from(c.to_string())).collect()),
        _ => Err(RuntimeError::NotIterable {
            what: describe_callee(source),
        }),
    }
}

/// Source-like name of an expression for error messages
fn describe_callee(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name, _) => name.clone(),
        Expr::This(_) => "this".to_string(),
        Expr::Member {
            object, property, ..
        } => match property {
            MemberKey::Named(name) => format!("{}.{}", describe_callee(object), name),
            MemberKey::Computed(key) => match key.as_ref() {
                Expr::Lit(Literal::Number(n), _) => {
                    format!("{}[{}]", describe_callee(object), number_to_string(*n))
                }
                Expr::Lit(Literal::String(s), _) => format!("{}[{:?}]", describe_callee(object), s),
                _ => format!("{}[...]", describe_callee(object)),
            },
        },
        Expr::Call { func, .. } => format!("{}(...)", describe_callee(func)),
        Expr::Lit(Literal::Number(n), _) => number_to_string(*n),
        Expr::Lit(Literal::String(s), _) => format!("{s:?}"),
        Expr::Lit(Literal::Bool(b), _) => b.to_string(),
        Expr::Lit(Literal::Null, _) => "null".to_string(),
        Expr::Lit(Literal::Undefined, _) => "undefined".to_string(),
        _ => "expression".to_string(),
    }
}
