//! Extraction pass: first traversal over the model.
//!
//! Reads `Secrecy(L)` annotations off fields, method returns and
//! parameters into the symbol table, validates each label against the
//! lattice, and checks every class method that implements an interface
//! signature for override compatibility.

use lasso::{Rodeo, Spur};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ast::{Annotation, AnnotationValue, ClassDecl, InterfaceDecl, MethodSig, Model};
use crate::diagnostics::{DiagnosticSink, SecrecyViolation};
use crate::lattice::{Label, SecrecyLattice};
use crate::symbols::{SigShape, SymbolTable};

/// Annotation type name the checker reacts to.
pub const SECRECY_ANNOTATION: &str = "Secrecy";

/// Read the secrecy label off an annotation list.
///
/// An annotation applies iff it is typed `Secrecy` and its value is a
/// data constructor; the constructor name is the label. The first such
/// annotation wins. An invalid label reports `WrongAnnotationValue` and
/// yields no mapping. Shared with the checking pass, which extracts
/// local variable declarations the same way.
pub(crate) fn secrecy_label(
    annotations: &[Annotation],
    lattice: &SecrecyLattice,
    interner: &Rodeo,
    sink: &mut DiagnosticSink,
) -> Option<Label> {
    // If nothing in the model ever interned "Secrecy", no annotation
    // can carry one either.
    let secrecy = interner.get(SECRECY_ANNOTATION)?;

    for ann in annotations {
        if ann.name != secrecy {
            continue;
        }
        let AnnotationValue::Constructor(label) = ann.value else {
            continue;
        };
        if !lattice.is_valid(label) {
            sink.push(
                ann.pos.line,
                SecrecyViolation::WrongAnnotationValue {
                    label: interner.resolve(&label).to_string(),
                },
            );
            return None;
        }
        return Some(label);
    }
    None
}

/// Run extraction over the whole model. Interfaces are processed before
/// any class so the override check never depends on declaration order.
pub(crate) fn run(
    model: &Model,
    lattice: &SecrecyLattice,
    symbols: &mut SymbolTable,
    sink: &mut DiagnosticSink,
) {
    let pass = ExtractionPass {
        lattice,
        interner: model.interner(),
    };

    let interfaces: FxHashMap<Spur, &InterfaceDecl> =
        model.interfaces().map(|i| (i.name, i)).collect();

    for iface in model.interfaces() {
        for sig in &iface.sigs {
            pass.extract_sig(sig, symbols, sink);
        }
    }

    for class in model.classes() {
        pass.extract_class(class, &interfaces, symbols, sink);
    }

    debug!(
        levels = symbols.len(),
        "secrecy annotation extraction finished"
    );
}

struct ExtractionPass<'a> {
    lattice: &'a SecrecyLattice,
    interner: &'a Rodeo,
}

impl ExtractionPass<'_> {
    /// Record the return and parameter labels of one signature, and its
    /// parameter layout for call-site checks.
    fn extract_sig(&self, sig: &MethodSig, symbols: &mut SymbolTable, sink: &mut DiagnosticSink) {
        if let Some(level) = secrecy_label(&sig.ret.annotations, self.lattice, self.interner, sink)
        {
            symbols.set_level(sig.id, level);
        }
        for param in &sig.params {
            if let Some(level) =
                secrecy_label(&param.ty.annotations, self.lattice, self.interner, sink)
            {
                symbols.set_level(param.id, level);
            }
        }
        symbols.record_sig(
            sig.id,
            SigShape {
                params: sig.params.iter().map(|p| p.id).collect(),
            },
        );
    }

    fn extract_class(
        &self,
        class: &ClassDecl,
        interfaces: &FxHashMap<Spur, &InterfaceDecl>,
        symbols: &mut SymbolTable,
        sink: &mut DiagnosticSink,
    ) {
        // Signatures this class's interfaces declare with at least one
        // known label; candidates for the override check.
        let declared: Vec<&MethodSig> = class
            .implements
            .iter()
            .filter_map(|name| interfaces.get(name))
            .flat_map(|iface| iface.sigs.iter())
            .filter(|sig| {
                symbols.level(sig.id).is_some()
                    || sig.params.iter().any(|p| symbols.level(p.id).is_some())
            })
            .collect();

        for field in &class.fields {
            if let Some(level) =
                secrecy_label(&field.ty.annotations, self.lattice, self.interner, sink)
            {
                symbols.set_level(field.id, level);
            }
        }

        for method in &class.methods {
            self.extract_sig(&method.sig, symbols, sink);

            for definition in &declared {
                if self.signatures_match(&method.sig, definition) {
                    trace!(
                        method = self.interner.resolve(&method.sig.name),
                        "checking override compatibility"
                    );
                    self.check_override(&method.sig, definition, symbols, sink);
                }
            }
        }
    }

    /// Two signatures match iff names and return-type forms are equal
    /// and the parameter lists agree as multisets of `(name, type)`,
    /// independent of order.
    fn signatures_match(&self, a: &MethodSig, b: &MethodSig) -> bool {
        if a.name != b.name || a.ret.name != b.ret.name || a.params.len() != b.params.len() {
            return false;
        }
        let mut counts: FxHashMap<(Spur, Spur), i32> = FxHashMap::default();
        for p in &a.params {
            *counts.entry((p.name, p.ty.name)).or_default() += 1;
        }
        for p in &b.params {
            *counts.entry((p.name, p.ty.name)).or_default() -= 1;
        }
        counts.values().all(|&n| n == 0)
    }

    /// An implementation's levels may be at most those of the interface
    /// declaration: the return label and each name-paired parameter
    /// label. Violations anchor at the implementation's return type.
    fn check_override(
        &self,
        implementation: &MethodSig,
        definition: &MethodSig,
        symbols: &SymbolTable,
        sink: &mut DiagnosticSink,
    ) {
        let bottom = self.lattice.min();
        let site = implementation.ret.pos.line;

        let declared = symbols.level_or(Some(definition.id), bottom);
        let actual = symbols.level_or(Some(implementation.id), bottom);
        if !self.lattice.leq(actual, declared) {
            sink.push(site, self.at_most(declared, actual));
        }

        for impl_param in &implementation.params {
            let Some(def_param) = definition.params.iter().find(|p| p.name == impl_param.name)
            else {
                continue;
            };
            let declared = symbols.level_or(Some(def_param.id), bottom);
            let actual = symbols.level_or(Some(impl_param.id), bottom);
            if !self.lattice.leq(actual, declared) {
                sink.push(site, self.at_most(declared, actual));
            }
        }
    }

    fn at_most(&self, declared: Label, actual: Label) -> SecrecyViolation {
        SecrecyViolation::LeakageAtMost {
            declared: self.interner.resolve(&declared).to_string(),
            actual: self.interner.resolve(&actual).to_string(),
        }
    }
}
