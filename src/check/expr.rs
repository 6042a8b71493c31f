//! Expression evaluator: the secrecy level of any expression.
//!
//! Every arm ends by joining with the current PC level, so the returned
//! level is never below the control context. Call expressions also
//! check each argument against the declared parameter level.

use tracing::trace;

use crate::ast::{CallExpr, DeclId, Expr, Expr_};
use crate::diagnostics::SecrecyViolation;
use crate::lattice::Label;

use super::CheckingContext;

impl CheckingContext<'_> {
    /// The secrecy level of an expression: the join of its parts,
    /// joined with the current PC.
    pub(crate) fn level_of(&mut self, expr: &Expr) -> Label {
        let min = self.lattice.min();
        let level = match &expr.value {
            Expr_::Lit(_) => min,

            Expr_::Var(v) | Expr_::FieldUse(v) => self.symbols.level_or(v.decl, min),

            Expr_::Unary(_, inner) => self.level_of(inner),

            Expr_::Binary(_, lhs, rhs) => {
                let left = self.level_of(lhs);
                let right = self.level_of(rhs);
                self.lattice.join(left, right)
            }

            Expr_::FnApp { args, .. } => {
                let mut level = min;
                for arg in args {
                    let arg_level = self.level_of(arg);
                    level = self.lattice.join(level, arg_level);
                }
                level
            }

            Expr_::AsyncCall(call) | Expr_::SyncCall(call) => {
                self.call_level(call, expr.pos.line)
            }

            Expr_::Get(target) => {
                // Resolving the reply releases the await frames this
                // future contributed; the PC drops before the join
                // below. Only variable targets name a future.
                if let Some(var) = target.as_var_use() {
                    let released = self.pc.release_future(var.name);
                    if released > 0 {
                        trace!(
                            future = self.interner.resolve(&var.name),
                            released,
                            "get released pending await frames"
                        );
                    }
                }
                min
            }

            // Object creation and anything else without flow rules.
            Expr_::New { .. } => min,
        };

        self.lattice.join(level, self.pc_level())
    }

    /// Method calls, asynchronous or synchronous: check every argument
    /// against the declared parameter level, result is the callee's
    /// return label.
    fn call_level(&mut self, call: &CallExpr, line: u32) -> Label {
        let min = self.lattice.min();

        let params: Option<Vec<DeclId>> = call
            .callee
            .and_then(|sig| self.symbols.sig(sig))
            .map(|shape| shape.params.clone());

        match params {
            Some(params) => {
                for (arg, &param) in call.args.iter().zip(params.iter()) {
                    let supplied = self.level_of(arg);
                    let declared = self.symbols.level_or(Some(param), min);
                    if !self.lattice.leq(supplied, declared) {
                        self.sink.push(
                            line,
                            SecrecyViolation::ParameterTooHigh {
                                supplied: self.interner.resolve(&supplied).to_string(),
                                declared: self.interner.resolve(&declared).to_string(),
                            },
                        );
                    }
                }
            }
            // Unresolved callee: argument levels are still computed so
            // nested checks fire.
            None => {
                for arg in &call.args {
                    let _ = self.level_of(arg);
                }
            }
        }

        self.symbols.level_or(call.callee, min)
    }
}
