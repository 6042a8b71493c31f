//! Expression forms of the subject language.
//!
//! The secrecy checker runs after parsing and name resolution, so variable
//! and call expressions already carry the `DeclId` of the declaration the
//! resolver found (when it found one). Expression kinds are a closed sum
//! type; the level evaluator matches exhaustively over it.

use lasso::Spur;
use serde::{Deserialize, Serialize};

use super::decl::DeclId;
use super::location::WithLoc;

/// Expression with source location
pub type Expr = WithLoc<Expr_>;

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal `42`
    Int(i64),
    /// Boolean literal `True` / `False`
    Bool(bool),
    /// String literal `"hello"`
    Str(String),
    /// Unit value
    Unit,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation `-e`
    Neg,
    /// Logical negation `!e`
    Not,
}

/// Binary operators: arithmetic, comparison, logical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Reference to a variable or field, with the declaration the resolver
/// bound it to. `decl` is `None` when resolution failed; the checker then
/// reads the use at the lattice minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarRef {
    /// Source name of the variable or field
    pub name: Spur,
    /// Resolved declaration, if any
    pub decl: Option<DeclId>,
}

impl VarRef {
    /// A resolved reference
    pub const fn new(name: Spur, decl: DeclId) -> Self {
        Self {
            name,
            decl: Some(decl),
        }
    }

    /// An unresolved reference
    pub const fn unresolved(name: Spur) -> Self {
        Self { name, decl: None }
    }
}

/// A method call, asynchronous (`o!m(..)`) or synchronous (`o.m(..)`).
/// `callee` is the `DeclId` of the resolved `MethodSig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Callee object expression
    pub target: Box<Expr>,
    /// Method name
    pub method: Spur,
    /// Resolved method signature, if any
    pub callee: Option<DeclId>,
    /// Argument expressions
    pub args: Vec<Expr>,
}

/// Expression underlying type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr_ {
    /// Literal value
    Lit(Literal),
    /// Local variable or parameter use
    Var(VarRef),
    /// Field use `this.f`
    FieldUse(VarRef),
    /// Unary operation `-e`, `!e`
    Unary(UnaryOp, Box<Expr>),
    /// Binary operation `a + b`, `a && b`, `a < b`
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Pure function application `f(e1, .., en)`
    FnApp { name: Spur, args: Vec<Expr> },
    /// Asynchronous method call `o!m(e1, .., en)`, yields a future
    AsyncCall(CallExpr),
    /// Synchronous method call `o.m(e1, .., en)`
    SyncCall(CallExpr),
    /// Resolve a future `f.get`
    Get(Box<Expr>),
    /// Object creation `new C(e1, .., en)`
    New { class: Spur, args: Vec<Expr> },
}

impl Expr_ {
    /// The variable reference behind this expression, if it is a plain
    /// variable or field use.
    pub fn as_var_use(&self) -> Option<&VarRef> {
        match self {
            Self::Var(v) | Self::FieldUse(v) => Some(v),
            _ => None,
        }
    }
}
