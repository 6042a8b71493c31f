//! Shared builders for assembling models in tests.
//!
//! The parser normally produces the AST; tests assemble the same shapes
//! by hand, with resolved decl ids wired the way the resolver would.

#![allow(dead_code)]

use secflow::ast::{
    Annotation, ClassDecl, CompilationUnit, Decl, DeclId, Expr, Expr_, FieldDecl, InterfaceDecl,
    Literal, MethodImpl, MethodSig, Model, ModuleDecl, ParamDecl, Pos, Stmt, Stmt_, TypeUse,
    VarRef,
};
use secflow::ast::{BinaryOp, CallExpr, UnaryOp};
use secflow::{check_model, CheckConfig, DiagnosticSink, SECRECY_ANNOTATION};

/// A `[Secrecy: <label>]` annotation at the given line.
pub fn secrecy(m: &mut Model, label: &str, line: u32) -> Annotation {
    let name = m.intern(SECRECY_ANNOTATION);
    let ctor = m.intern(label);
    Annotation::constructor(name, ctor, Pos::line(line))
}

/// Unannotated type use.
pub fn ty(m: &mut Model, name: &str, line: u32) -> TypeUse {
    TypeUse::plain(m.intern(name), Pos::line(line))
}

/// Type use carrying a secrecy annotation.
pub fn ty_secrecy(m: &mut Model, name: &str, label: &str, line: u32) -> TypeUse {
    let ann = secrecy(m, label, line);
    ty(m, name, line).with_annotation(ann)
}

/// Field declaration; returns it with a fresh decl id.
pub fn field(m: &mut Model, name: &str, ty: TypeUse, line: u32) -> FieldDecl {
    FieldDecl {
        id: m.fresh_decl(),
        name: m.intern(name),
        ty,
        pos: Pos::line(line),
    }
}

/// Parameter declaration with a fresh decl id.
pub fn param(m: &mut Model, name: &str, ty: TypeUse) -> ParamDecl {
    ParamDecl {
        id: m.fresh_decl(),
        name: m.intern(name),
        ty,
    }
}

/// Method signature with a fresh decl id.
pub fn sig(m: &mut Model, name: &str, ret: TypeUse, params: Vec<ParamDecl>, line: u32) -> MethodSig {
    MethodSig {
        id: m.fresh_decl(),
        name: m.intern(name),
        ret,
        params,
        pos: Pos::line(line),
    }
}

/// Integer literal expression.
pub fn int(value: i64, line: u32) -> Expr {
    Expr::at_line(Expr_::Lit(Literal::Int(value)), line)
}

/// Use of a resolved variable or parameter.
pub fn var(m: &mut Model, name: &str, decl: DeclId, line: u32) -> Expr {
    Expr::at_line(Expr_::Var(VarRef::new(m.intern(name), decl)), line)
}

/// Use of an unresolved variable.
pub fn var_unresolved(m: &mut Model, name: &str, line: u32) -> Expr {
    Expr::at_line(Expr_::Var(VarRef::unresolved(m.intern(name))), line)
}

/// Use of a resolved field.
pub fn field_use(decl: &FieldDecl, line: u32) -> Expr {
    Expr::at_line(Expr_::FieldUse(VarRef::new(decl.name, decl.id)), line)
}

/// Binary expression.
pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, line: u32) -> Expr {
    Expr::at_line(Expr_::Binary(op, Box::new(lhs), Box::new(rhs)), line)
}

/// Unary expression.
pub fn unary(op: UnaryOp, inner: Expr, line: u32) -> Expr {
    Expr::at_line(Expr_::Unary(op, Box::new(inner)), line)
}

/// `new C(args)` expression.
pub fn new_expr(m: &mut Model, class: &str, args: Vec<Expr>, line: u32) -> Expr {
    Expr::at_line(
        Expr_::New {
            class: m.intern(class),
            args,
        },
        line,
    )
}

/// Nested block statement.
pub fn block(stmts: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::at_line(Stmt_::Block(stmts), line)
}

/// Pure function application.
pub fn fn_app(m: &mut Model, name: &str, args: Vec<Expr>, line: u32) -> Expr {
    Expr::at_line(
        Expr_::FnApp {
            name: m.intern(name),
            args,
        },
        line,
    )
}

/// Asynchronous call `o!method(args)` resolved to `callee`.
pub fn async_call(
    m: &mut Model,
    method: &str,
    callee: DeclId,
    args: Vec<Expr>,
    line: u32,
) -> Expr {
    let target = var_unresolved(m, "o", line);
    Expr::at_line(
        Expr_::AsyncCall(CallExpr {
            target: Box::new(target),
            method: m.intern(method),
            callee: Some(callee),
            args,
        }),
        line,
    )
}

/// Synchronous call `o.method(args)` resolved to `callee`.
pub fn sync_call(m: &mut Model, method: &str, callee: DeclId, args: Vec<Expr>, line: u32) -> Expr {
    let target = var_unresolved(m, "o", line);
    Expr::at_line(
        Expr_::SyncCall(CallExpr {
            target: Box::new(target),
            method: m.intern(method),
            callee: Some(callee),
            args,
        }),
        line,
    )
}

/// `f.get` on a resolved future variable.
pub fn get(m: &mut Model, name: &str, decl: DeclId, line: u32) -> Expr {
    let target = var(m, name, decl, line);
    Expr::at_line(Expr_::Get(Box::new(target)), line)
}

/// Assignment to a resolved field.
pub fn assign_field(decl: &FieldDecl, value: Expr, line: u32) -> Stmt {
    Stmt::at_line(
        Stmt_::Assign {
            target: VarRef::new(decl.name, decl.id),
            value,
        },
        line,
    )
}

/// Assignment to a resolved local variable.
pub fn assign_var(m: &mut Model, name: &str, decl: DeclId, value: Expr, line: u32) -> Stmt {
    Stmt::at_line(
        Stmt_::Assign {
            target: VarRef::new(m.intern(name), decl),
            value,
        },
        line,
    )
}

/// Local variable declaration with an initializer; the id is allocated
/// by the caller so uses can refer back to it.
pub fn var_decl(m: &mut Model, id: DeclId, name: &str, ty: TypeUse, init: Expr, line: u32) -> Stmt {
    Stmt::at_line(
        Stmt_::VarDecl {
            id,
            name: m.intern(name),
            ty,
            init: Some(init),
        },
        line,
    )
}

/// If statement.
pub fn if_stmt(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::at_line(
        Stmt_::If {
            cond,
            then_branch,
            else_branch,
        },
        line,
    )
}

/// While statement.
pub fn while_stmt(cond: Expr, body: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::at_line(Stmt_::While { cond, body }, line)
}

/// `f?` await statement.
pub fn await_stmt(future: Expr, line: u32) -> Stmt {
    Stmt::at_line(Stmt_::Await(future), line)
}

/// Return statement.
pub fn return_stmt(value: Option<Expr>, line: u32) -> Stmt {
    Stmt::at_line(Stmt_::Return(value), line)
}

/// Expression statement.
pub fn expr_stmt(e: Expr, line: u32) -> Stmt {
    Stmt::at_line(Stmt_::Expr(e), line)
}

/// Wrap declarations into a one-module model.
pub fn install(m: &mut Model, decls: Vec<Decl>) {
    let unit = m.intern("Test.abs");
    let module = m.intern("Test");
    m.units.push(CompilationUnit {
        name: unit,
        modules: vec![ModuleDecl {
            name: module,
            decls,
        }],
    });
}

/// A class named `C` with the given fields and a single method `run`
/// whose body is `stmts`.
pub fn class_with_run(m: &mut Model, fields: Vec<FieldDecl>, stmts: Vec<Stmt>) -> ClassDecl {
    let unit = ty(m, "Unit", 1);
    let run = sig(m, "run", unit, vec![], 1);
    ClassDecl {
        name: m.intern("C"),
        implements: vec![],
        fields,
        methods: vec![MethodImpl {
            sig: run,
            body: stmts,
        }],
        pos: Pos::line(1),
    }
}

/// Interface declaration.
pub fn interface(m: &mut Model, name: &str, sigs: Vec<MethodSig>, line: u32) -> InterfaceDecl {
    InterfaceDecl {
        name: m.intern(name),
        sigs,
        pos: Pos::line(line),
    }
}

/// Run the checker with the default config, expecting a usable lattice.
pub fn run_check(model: &mut Model) -> DiagnosticSink {
    let mut sink = DiagnosticSink::new();
    check_model(model, &CheckConfig::new(), &mut sink).expect("lattice should be well-formed");
    sink
}
