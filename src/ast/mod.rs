//! Subject-language AST.
//!
//! The parser and name resolver are external to this crate; they produce
//! a [`Model`] whose uses and call sites already point at the
//! declarations they resolve to. The secrecy checker only reads this
//! tree (plus the [`DeclId`]s it allocates for local variables).

pub mod decl;
pub mod expr;
pub mod location;
pub mod stmt;

pub use decl::{
    Annotation, AnnotationValue, ClassDecl, CompilationUnit, Decl, DeclId, DeclIdCounter,
    FieldDecl, InterfaceDecl, LatticeDecl, MethodImpl, MethodSig, Model, ModuleDecl, ParamDecl,
    TypeUse,
};
pub use expr::{BinaryOp, CallExpr, Expr, Expr_, Literal, UnaryOp, VarRef};
pub use location::{Pos, WithLoc};
pub use stmt::{Stmt, Stmt_};
