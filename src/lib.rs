//! Static secrecy (information-flow) type checking for actor-model
//! languages.
//!
//! `secflow` augments a modeling-language compiler with a confidentiality
//! analysis. It runs after parsing and name resolution on an
//! already-constructed [`ast::Model`] and enforces a non-interference
//! discipline against a user-declarable security lattice (default
//! `Low ⊑ High`):
//!
//! - declarations carry `Secrecy(L)` annotations, read into a symbol
//!   table by an extraction pass;
//! - a checking pass walks each method body, tracking the control
//!   context as a stack of PC frames (conditionals, loops, and pending
//!   asynchronous replies between `await` and `get`);
//! - expression levels are computed by lattice join; assignments,
//!   returns, call arguments and interface overrides are checked with
//!   the lattice order.
//!
//! Violations accumulate as [`diagnostics::Diagnostic`]s in a shared
//! append-only sink; the engine never aborts on them.
//!
//! # Example
//!
//! ```
//! use secflow::{check_model, CheckConfig, DiagnosticSink};
//! use secflow::ast::Model;
//!
//! let mut model = Model::new();
//! model.ensure_default_lattice();
//!
//! let mut sink = DiagnosticSink::new();
//! check_model(&mut model, &CheckConfig::new(), &mut sink)?;
//! assert!(sink.is_empty());
//! # Ok::<(), secflow::CheckError>(())
//! ```

pub mod ast;
pub mod check;
pub mod diagnostics;
pub mod lattice;
pub mod pc;
pub mod symbols;

mod config;
mod error;
mod extract;

pub use check::check_model;
pub use config::CheckConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, SecrecyViolation};
pub use error::{CheckError, CheckResult};
pub use extract::SECRECY_ANNOTATION;
pub use lattice::{Label, LatticeError, SecrecyLattice};
pub use pc::{FrameOrigin, PcFrame, PcStack};
pub use symbols::{SigShape, SymbolTable};
