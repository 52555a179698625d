//! Abstract Syntax Tree for the evaluated language

use std::rc::Rc;

use crate::util::span::Span;

/// A parsed input unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    VarDecl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
        span: Span,
    },
    Function(Rc<FunctionDef>),
    Return(Option<Expr>, Span),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    Block(Vec<Stmt>, Span),
    Break(Span),
    Continue(Span),
    Empty(Span),
}

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

/// `name = init` inside a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function literal, declaration or arrow
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    /// Arrow functions capture `this` from their defining scope
    pub is_arrow: bool,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
    pub rest: bool,
}

/// Function body
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// `x => x + 1`
    Expr(Box<Expr>),
    /// `function () { ... }`
    Block(Vec<Stmt>),
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Literal, Span),
    Ident(String, Span),
    This(Span),
    Array(Vec<ExprOrSpread>, Span),
    Object(Vec<Property>, Span),
    Function(Rc<FunctionDef>),
    UnOp {
        op: UnOp,
        expr: Box<Expr>,
        span: Span,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
        span: Span,
    },
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<ExprOrSpread>,
        optional: bool,
        span: Span,
    },
    Member {
        object: Box<Expr>,
        property: MemberKey,
        optional: bool,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Lit(_, span)
            | Expr::Ident(_, span)
            | Expr::This(span)
            | Expr::Array(_, span)
            | Expr::Object(_, span) => *span,
            Expr::Function(def) => def.span,
            Expr::UnOp { span, .. }
            | Expr::Update { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::Logical { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::Call { span, .. }
            | Expr::Member { span, .. } => *span,
        }
    }

    /// Whether the expression may appear on the left of `=`
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Ident(..) | Expr::Member { optional: false, .. }
        )
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

/// Array element or call argument
#[derive(Debug, Clone, PartialEq)]
pub enum ExprOrSpread {
    Expr(Expr),
    Spread(Expr),
}

/// Object literal entry
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    KeyValue(PropertyKey, Expr),
    Shorthand(String, Span),
    Spread(Expr),
}

/// Object literal key
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Named(String),
    Computed(Expr),
}

/// Member access key
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKey {
    /// `a.b`
    Named(String),
    /// `a[b]`
    Computed(Box<Expr>),
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Pos,
    Not,
    Typeof,
    Void,
}

/// `++` / `--`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Inc,
    Dec,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Neq,
    StrictEq,
    StrictNeq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuit operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

/// Assignment operators; compound forms carry their binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinOp),
}
