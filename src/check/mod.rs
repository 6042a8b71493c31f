//! Checking pass: flow-sensitive second traversal.
//!
//! [`check_model`] is the engine entry point. It builds the lattice,
//! runs extraction, then walks every class method body with a
//! [`CheckingContext`] that bundles the lattice, symbol table, PC stack
//! and error sink. The statement walker lives here; the expression
//! evaluator is in [`expr`](self::expr) and shares the same context, so
//! neither side needs a reference to the other.

mod expr;

use lasso::Rodeo;
use tracing::debug;

use crate::ast::{MethodImpl, Model, Stmt, Stmt_};
use crate::config::CheckConfig;
use crate::diagnostics::{DiagnosticSink, SecrecyViolation};
use crate::error::CheckResult;
use crate::extract;
use crate::lattice::{Label, SecrecyLattice};
use crate::pc::{FrameOrigin, PcStack};
use crate::symbols::SymbolTable;

/// Run the secrecy analysis over a model, appending diagnostics to the
/// shared sink.
///
/// A model without a lattice declaration leaves the analysis disabled
/// (nothing is emitted) unless the config enables the `Low ⊑ High`
/// fallback. A lattice declaration that fails validation returns
/// `CheckError::MalformedLattice` and suppresses the pass.
pub fn check_model(
    model: &mut Model,
    config: &CheckConfig,
    sink: &mut DiagnosticSink,
) -> CheckResult<()> {
    if model.lattice.is_none() && config.fallback_to_default_lattice {
        model.ensure_default_lattice();
    }
    let Some(decl) = model.lattice.as_ref() else {
        debug!("no secrecy lattice declared, analysis disabled");
        return Ok(());
    };
    let lattice = SecrecyLattice::from_decl(decl, model.interner())?;
    debug!(labels = lattice.len(), "secrecy lattice constructed");

    let mut symbols = SymbolTable::new();
    extract::run(model, &lattice, &mut symbols, sink);

    {
        let mut cx = CheckingContext {
            lattice: &lattice,
            symbols: &mut symbols,
            interner: model.interner(),
            sink: &mut *sink,
            pc: PcStack::new(),
            current_sig: None,
        };
        for class in model.classes() {
            for method in &class.methods {
                cx.check_method(method);
            }
        }
    }

    debug!(diagnostics = sink.len(), "secrecy checking finished");
    Ok(())
}

/// Shared state of one checking traversal. The statement walker and the
/// expression evaluator are both methods on this context.
pub(crate) struct CheckingContext<'a> {
    pub(crate) lattice: &'a SecrecyLattice,
    pub(crate) symbols: &'a mut SymbolTable,
    pub(crate) interner: &'a Rodeo,
    pub(crate) sink: &'a mut DiagnosticSink,
    pub(crate) pc: PcStack,
    current_sig: Option<crate::ast::DeclId>,
}

impl CheckingContext<'_> {
    fn check_method(&mut self, method: &MethodImpl) {
        // Unmatched await frames from the previous method are discarded.
        self.pc.clear();
        self.current_sig = Some(method.sig.id);
        for stmt in &method.body {
            self.check_stmt(stmt);
        }
    }

    fn check_body(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.value {
            Stmt_::VarDecl { id, ty, init, .. } => {
                let declared =
                    extract::secrecy_label(&ty.annotations, self.lattice, self.interner, self.sink);
                if let Some(level) = declared {
                    self.symbols.set_level(*id, level);
                }
                if let Some(init) = init {
                    let level = self.level_of(init);
                    if let Some(declared) = declared {
                        if !self.lattice.leq(level, declared) {
                            self.leakage(stmt.pos.line, level, declared);
                        }
                    }
                }
            }

            Stmt_::Assign { target, value } => {
                let level = self.level_of(value);
                let declared = self.symbols.level_or(target.decl, self.lattice.min());
                if !self.lattice.leq(level, declared) {
                    self.leakage(stmt.pos.line, level, declared);
                }
            }

            Stmt_::Return(value) => {
                let level = match value {
                    Some(e) => self.level_of(e),
                    // A bare return still carries the control context.
                    None => self.pc_level(),
                };
                let declared = self
                    .current_sig
                    .and_then(|sig| self.symbols.level(sig))
                    .unwrap_or(self.lattice.min());
                if !self.lattice.leq(level, declared) {
                    self.leakage(stmt.pos.line, level, declared);
                }
            }

            Stmt_::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let guard = self.level_of(cond);
                let level = self.lattice.join(guard, self.pc_level());
                self.with_frame(FrameOrigin::Branch, level, |cx| cx.check_body(then_branch));
                self.with_frame(FrameOrigin::Branch, level, |cx| cx.check_body(else_branch));
            }

            Stmt_::While { cond, body } => {
                // Flow-sensitive but not iterative: one frame for the
                // whole body, no fixpoint.
                let guard = self.level_of(cond);
                let level = self.lattice.join(guard, self.pc_level());
                self.with_frame(FrameOrigin::Loop, level, |cx| cx.check_body(body));
            }

            Stmt_::Await(future) => {
                let level = self.level_of(future);
                if let Some(var) = future.as_var_use() {
                    // Persists until the matching get, or method exit.
                    self.pc.push(FrameOrigin::Future(var.name), level);
                }
            }

            Stmt_::Expr(e) => {
                // Value discarded; call-site checks still fire.
                let _ = self.level_of(e);
            }

            Stmt_::Block(stmts) => self.check_body(stmts),
        }
    }

    /// Push a frame for the duration of `f`. Release is by token, so a
    /// `get` removing an older await frame inside `f` cannot unbalance
    /// the stack.
    fn with_frame<R>(
        &mut self,
        origin: FrameOrigin,
        level: Label,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let token = self.pc.push(origin, level);
        let result = f(self);
        self.pc.release(token);
        result
    }

    pub(crate) fn pc_level(&self) -> Label {
        self.lattice.eval_stack(&self.pc)
    }

    fn leakage(&mut self, line: u32, from: Label, to: Label) {
        self.sink.push(
            line,
            SecrecyViolation::LeakageFromTo {
                from: self.interner.resolve(&from).to_string(),
                to: self.interner.resolve(&to).to_string(),
            },
        );
    }
}
