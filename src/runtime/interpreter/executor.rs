//! Statement execution and function calls

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use super::{RuntimeError, Scope};
use crate::frontend::parser::ast::*;
use crate::repl::engine::context::{BindingKind, Context};
use crate::runtime::value::{Function, Value};
use crate::std::Globals;

/// Call depth allowed before `maximum call stack size exceeded`
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Statement and expression levels allowed per permitted call
const NESTING_PER_CALL: usize = 16;

/// Argument list of a call; most calls fit inline
pub(super) type Args = SmallVec<[Value; 4]>;

/// How a statement finished
#[derive(Debug)]
pub(super) enum Completion {
    /// Ran to the end, with the completion value of the last expression statement
    Normal(Option<Value>),
    Return(Value),
    Break,
    Continue,
}

/// Interpreter over one context
///
/// Borrowed for the duration of one evaluation; all persistent state lives
/// in the context.
pub struct Interpreter<'a> {
    pub(super) context: &'a mut Context,
    pub(super) globals: &'a Globals,
    depth: usize,
    max_depth: usize,
    /// Statements and expressions currently being evaluated, across calls
    nesting: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with the default call depth limit
    pub fn new(
        context: &'a mut Context,
        globals: &'a Globals,
    ) -> Self {
        Self {
            context,
            globals,
            depth: 0,
            max_depth: DEFAULT_MAX_CALL_DEPTH,
            nesting: 0,
        }
    }

    /// Set the call depth limit
    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The persistent context
    pub fn context(&self) -> &Context {
        self.context
    }

    /// Run `f` one evaluation level deeper
    ///
    /// Every level costs host stack, so the total is bounded together with
    /// the call depth.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        if self.nesting >= self.max_depth.saturating_mul(NESTING_PER_CALL) {
            return Err(RuntimeError::StackOverflow);
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    /// Run a program; its value is the value of the last expression
    /// statement executed, `undefined` if there was none
    pub fn run(
        &mut self,
        program: &Program,
    ) -> Result<Value, RuntimeError> {
        self.hoist_functions(&program.body, None);
        match self.exec_block(&program.body, None)? {
            Completion::Normal(value) => Ok(value.unwrap_or_default()),
            Completion::Return(value) => Ok(value),
            // rejected by the parser
            Completion::Break | Completion::Continue => Ok(Value::Undefined),
        }
    }

    /// Call a function value
    pub fn call(
        &mut self,
        callee: &Value,
        this: Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let Some(func) = callee.as_function() else {
            return Err(RuntimeError::NotAFunction {
                callee: callee.to_js_string(),
            });
        };

        if self.depth >= self.max_depth {
            return Err(RuntimeError::StackOverflow);
        }
        self.depth += 1;
        let result = match func.as_ref() {
            Function::Native { native, receiver } => {
                let this = receiver.clone().unwrap_or(this);
                (native.func)(self, &this, args)
            }
            Function::Closure { def, scope } => self.call_closure(callee, def, scope, this, args),
        };
        self.depth -= 1;
        result
    }

    fn call_closure(
        &mut self,
        callee: &Value,
        def: &Rc<FunctionDef>,
        captured: &Option<Rc<Scope>>,
        this: Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let this = if def.is_arrow { None } else { Some(this) };
        let scope = Scope::function(captured.clone(), this);

        // a named function expression can refer to itself
        if let (Some(name), false) = (&def.name, def.is_arrow) {
            scope.declare(name, callee.clone(), false);
        }

        for (i, param) in def.params.iter().enumerate() {
            let value = if param.rest {
                Value::new_array(args.get(i..).map(<[Value]>::to_vec).unwrap_or_default())
            } else {
                match (args.get(i), &param.default) {
                    (Some(arg), _) if !matches!(arg, Value::Undefined) => arg.clone(),
                    (_, Some(default)) => self.eval_expr(default, Some(&scope))?,
                    _ => Value::Undefined,
                }
            };
            scope.declare(&param.name, value, false);
        }

        match &def.body {
            FunctionBody::Expr(expr) => self.eval_expr(expr, Some(&scope)),
            FunctionBody::Block(body) => {
                self.hoist_functions(body, Some(&scope));
                match self.exec_block(body, Some(&scope))? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    /// Bind function declarations before the statements of a body run
    fn hoist_functions(
        &mut self,
        body: &[Stmt],
        scope: Option<&Rc<Scope>>,
    ) {
        for stmt in body {
            if let Stmt::Function(def) = stmt {
                let Some(name) = def.name.as_deref() else {
                    continue;
                };
                trace!("hoisting function {}", name);
                let value = Value::Function(Rc::new(Function::Closure {
                    def: Rc::clone(def),
                    scope: scope.cloned(),
                }));
                match scope {
                    Some(scope) => scope.declare(name, value, false),
                    None => self.context.declare(name, value, BindingKind::Function),
                }
            }
        }
    }

    /// Execute statements in order, stopping at the first abrupt completion
    fn exec_block(
        &mut self,
        body: &[Stmt],
        scope: Option<&Rc<Scope>>,
    ) -> Result<Completion, RuntimeError> {
        let mut last = None;
        for stmt in body {
            match self.exec_stmt(stmt, scope)? {
                Completion::Normal(Some(value)) => last = Some(value),
                Completion::Normal(None) => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn exec_stmt(
        &mut self,
        stmt: &Stmt,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Completion, RuntimeError> {
        self.nested(|interp| interp.exec_stmt_inner(stmt, scope))
    }

    fn exec_stmt_inner(
        &mut self,
        stmt: &Stmt,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Completion, RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => Ok(Completion::Normal(Some(self.eval_expr(expr, scope)?))),
            Stmt::VarDecl {
                kind, declarators, ..
            } => {
                for declarator in declarators {
                    let value = match &declarator.init {
                        Some(init) => self.eval_expr(init, scope)?,
                        None => Value::Undefined,
                    };
                    self.declare(*kind, &declarator.name, value, scope);
                }
                Ok(Completion::Normal(None))
            }
            // bound by hoisting
            Stmt::Function(_) | Stmt::Empty(_) => Ok(Completion::Normal(None)),
            Stmt::Return(value, _) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_expr(condition, scope)?.is_truthy() {
                    self.exec_stmt(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, scope)
                } else {
                    Ok(Completion::Normal(None))
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                let mut last = None;
                while self.eval_expr(condition, scope)?.is_truthy() {
                    match self.exec_stmt(body, scope)? {
                        Completion::Normal(value) => last = value.or(last),
                        Completion::Continue => {}
                        Completion::Break => break,
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                }
                Ok(Completion::Normal(last))
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => self.exec_for(init.as_deref(), test.as_ref(), update.as_ref(), body, scope),
            Stmt::Block(body, _) => {
                let block = Scope::block(scope.cloned());
                self.hoist_functions(body, Some(&block));
                self.exec_block(body, Some(&block))
            }
            Stmt::Break(_) => Ok(Completion::Break),
            Stmt::Continue(_) => Ok(Completion::Continue),
        }
    }

    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Completion, RuntimeError> {
        // `let`/`const` loop variables live in a per-iteration scope so that
        // closures created in the body see that iteration's values
        let per_iteration = matches!(
            init,
            Some(Stmt::VarDecl {
                kind: DeclKind::Let | DeclKind::Const,
                ..
            })
        );
        let mut iteration = Scope::block(scope.cloned());
        if let Some(init) = init {
            self.exec_stmt(init, Some(&iteration))?;
        }

        let mut last = None;
        loop {
            if let Some(test) = test {
                if !self.eval_expr(test, Some(&iteration))?.is_truthy() {
                    break;
                }
            }
            match self.exec_stmt(body, Some(&iteration))? {
                Completion::Normal(value) => last = value.or(last),
                Completion::Continue => {}
                Completion::Break => break,
                ret @ Completion::Return(_) => return Ok(ret),
            }
            if per_iteration {
                iteration = iteration.copy();
            }
            if let Some(update) = update {
                self.eval_expr(update, Some(&iteration))?;
            }
        }
        Ok(Completion::Normal(last))
    }

    /// Bind a declared name in the right place: the innermost scope for
    /// `let`/`const`, the enclosing function for `var`, the context at top level
    fn declare(
        &mut self,
        kind: DeclKind,
        name: &str,
        value: Value,
        scope: Option<&Rc<Scope>>,
    ) {
        let target = match kind {
            DeclKind::Var => scope.and_then(|s| s.function_scope()),
            DeclKind::Let | DeclKind::Const => scope.cloned(),
        };
        match target {
            Some(target) => target.declare(name, value, kind == DeclKind::Const),
            None => {
                let kind = match kind {
                    DeclKind::Let => BindingKind::Let,
                    DeclKind::Const => BindingKind::Const,
                    DeclKind::Var => BindingKind::Var,
                };
                self.context.declare(name, value, kind);
            }
        }
    }

    /// Resolve a name: local scopes, then the context, then native globals
    pub(super) fn lookup(
        &self,
        name: &str,
        scope: Option<&Rc<Scope>>,
    ) -> Option<Value> {
        scope
            .and_then(|s| s.lookup(name))
            .or_else(|| self.context.get(name).cloned())
            .or_else(|| self.globals.get(name).cloned())
    }

    /// Assign to a name; unbound names become context bindings
    pub(super) fn assign_name(
        &mut self,
        name: &str,
        value: Value,
        scope: Option<&Rc<Scope>>,
    ) -> Result<(), RuntimeError> {
        if let Some(result) = scope.and_then(|s| s.assign(name, value.clone())) {
            return result;
        }
        self.context.assign(name, value)
    }
}
