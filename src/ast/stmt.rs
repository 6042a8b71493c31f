//! Statement forms of the subject language.

use lasso::Spur;
use serde::{Deserialize, Serialize};

use super::decl::{DeclId, TypeUse};
use super::expr::{Expr, VarRef};
use super::location::WithLoc;

/// Statement with source location
pub type Stmt = WithLoc<Stmt_>;

/// Statement underlying type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt_ {
    /// Local variable declaration `T x = e;` (initializer optional).
    /// The type use may carry a `Secrecy(L)` annotation.
    VarDecl {
        id: DeclId,
        name: Spur,
        ty: TypeUse,
        init: Option<Expr>,
    },
    /// Assignment `x = e;` to a variable or field
    Assign { target: VarRef, value: Expr },
    /// Return from the enclosing method
    Return(Option<Expr>),
    /// Conditional; the else branch may be empty
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    /// While loop
    While { cond: Expr, body: Vec<Stmt> },
    /// Await on a future `f?`
    Await(Expr),
    /// Expression evaluated for effect, value discarded
    Expr(Expr),
    /// Nested block
    Block(Vec<Stmt>),
}
