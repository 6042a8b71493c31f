//! Symbol table: declared secrecy levels and call-site signature shapes.

use rustc_hash::FxHashMap;

use crate::ast::DeclId;
use crate::lattice::Label;

/// Parameter layout of a method signature, recorded so call sites can
/// look up the declared level of each positional parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigShape {
    /// Parameter decl ids in declaration order
    pub params: Vec<DeclId>,
}

/// Mapping from declarations to their declared secrecy labels. A missing
/// entry reads as the lattice minimum at every use site.
///
/// Extraction fills in fields, parameters and method signatures; during
/// checking only local variable declarations add entries.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    levels: FxHashMap<DeclId, Label>,
    sigs: FxHashMap<DeclId, SigShape>,
}

impl SymbolTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declared level of a declaration.
    pub fn set_level(&mut self, decl: DeclId, level: Label) {
        self.levels.insert(decl, level);
    }

    /// Declared level of a declaration, if annotated.
    pub fn level(&self, decl: DeclId) -> Option<Label> {
        self.levels.get(&decl).copied()
    }

    /// Declared level of an optionally-resolved declaration, defaulting
    /// to `bottom` for unresolved uses and unannotated declarations.
    pub fn level_or(&self, decl: Option<DeclId>, bottom: Label) -> Label {
        decl.and_then(|d| self.level(d)).unwrap_or(bottom)
    }

    /// Record the parameter layout of a method signature.
    pub fn record_sig(&mut self, sig: DeclId, shape: SigShape) {
        self.sigs.insert(sig, shape);
    }

    /// Parameter layout of a resolved method signature.
    pub fn sig(&self, sig: DeclId) -> Option<&SigShape> {
        self.sigs.get(&sig)
    }

    /// All recorded `(decl, level)` pairs, in no particular order.
    pub fn levels(&self) -> impl Iterator<Item = (DeclId, Label)> + '_ {
        self.levels.iter().map(|(&d, &l)| (d, l))
    }

    /// Number of level entries
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when no level is recorded
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
