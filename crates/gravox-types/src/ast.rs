//! AST node types for Gravox.
//!
//! Every node carries a [`Span`] for diagnostics. Nodes own their children
//! and are never mutated after parsing.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed source unit: a flat list of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Types
// ══════════════════════════════════════════════════════════════════════════════

/// A declared type such as `int`, `string[]` or `any`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `int`, `float`, `string`, `bool`, `any`, or any other name.
    Named(String),
    /// `T[]`
    Array(Box<TypeKind>),
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Named(name) => f.write_str(name),
            TypeKind::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Show(ShowStmt),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Expr(ExprStmt),
    Action(ActionDecl),
    Alias(AliasStmt),
    Return(ReturnStmt),
    Import(ImportStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::Show(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::Action(s) => s.span,
            Stmt::Alias(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Import(s) => s.span,
        }
    }
}

/// `type name [= expr];`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub type_ann: TypeAnnotation,
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// `show(expr, ...);`
#[derive(Debug, Clone, PartialEq)]
pub struct ShowStmt {
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `if (cond) stmt [else stmt]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// `while (cond) stmt`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `for (name in range(start, end)) stmt` over the half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub variable: Ident,
    pub start: Expr,
    pub end: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `expr;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `action name(params) { body }`, or the type-led form `int name(params) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    /// Set only for the type-led form. Not enforced at runtime.
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    pub span: Span,
}

/// A parameter: `type name [= default]`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub type_ann: TypeAnnotation,
    pub name: Ident,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `use original as alias;`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasStmt {
    pub original: Ident,
    pub alias: Ident,
    pub span: Span,
}

/// `return [expr, ...];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub span: Span,
}

/// `import "path";` or `import { a, b as c } from "path";`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub kind: ImportKind,
    pub source: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportKind {
    /// Every export is copied into the importing scope.
    Wildcard,
    /// Only the listed exports, optionally renamed.
    Named(Vec<ImportItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub name: Ident,
    pub alias: Option<Ident>,
}

impl ImportItem {
    /// The name the item is bound under in the importing scope.
    pub fn local_name(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).name.as_str()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLit(f64),
    StringLit(String),
    BoolLit(bool),
    /// `[a, b, c]`
    ArrayLit(Vec<Expr>),
    Variable(String),
    /// `name[index]`
    Index {
        name: Ident,
        index: Box<Expr>,
    },
    /// `name(args)`
    Call {
        callee: Ident,
        args: Vec<Expr>,
    },
    /// `name = value`
    Assign {
        name: Ident,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Less,
    Greater,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Less => "<",
            BinOp::Greater => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}
