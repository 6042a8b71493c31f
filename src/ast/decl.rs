//! Declaration-level AST: models, modules, classes, interfaces, method
//! signatures, and the typed annotations the secrecy checker reads.
//!
//! A [`Model`] is the unit of analysis. It owns the string interner for
//! every identifier and label in the tree, and allocates the [`DeclId`]s
//! that the symbol table and resolved uses refer to.

use lasso::{Rodeo, Spur};
use serde::{Deserialize, Serialize};

use super::location::Pos;
use super::stmt::Stmt;

/// Identifier of a declaration node (field, parameter, local variable,
/// or method signature). Allocated per model, dense from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

/// Monotonic allocator for [`DeclId`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclIdCounter {
    next: u32,
}

impl DeclIdCounter {
    /// Allocate the next id
    pub fn next(&mut self) -> DeclId {
        let id = DeclId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Value of a typed annotation. Only data-constructor values are
/// meaningful to the secrecy checker; everything else is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValue {
    /// A nullary data-constructor expression, e.g. `High`
    Constructor(Spur),
    /// Any other annotation value (list, literal, ...)
    Other,
}

/// A typed annotation `[Name: Value]` attached to a type use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type name, e.g. `Secrecy`
    pub name: Spur,
    /// Annotation value
    pub value: AnnotationValue,
    /// Location of the annotation itself
    pub pos: Pos,
}

impl Annotation {
    /// Create a typed annotation with a constructor value
    pub const fn constructor(name: Spur, ctor: Spur, pos: Pos) -> Self {
        Self {
            name,
            value: AnnotationValue::Constructor(ctor),
            pos,
        }
    }
}

/// A use of a type, together with its annotation list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeUse {
    /// Type name as written, e.g. `Int`, `Fut<Int>`
    pub name: Spur,
    /// Annotations attached to this type use
    pub annotations: Vec<Annotation>,
    /// Location of the type use
    pub pos: Pos,
}

impl TypeUse {
    /// Unannotated type use
    pub const fn plain(name: Spur, pos: Pos) -> Self {
        Self {
            name,
            annotations: Vec::new(),
            pos,
        }
    }

    /// Attach an annotation
    #[must_use]
    pub fn with_annotation(mut self, ann: Annotation) -> Self {
        self.annotations.push(ann);
        self
    }
}

/// A method parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub id: DeclId,
    pub name: Spur,
    pub ty: TypeUse,
}

/// A class field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub id: DeclId,
    pub name: Spur,
    pub ty: TypeUse,
    pub pos: Pos,
}

/// A method signature. Interfaces declare bare signatures; classes pair
/// one with a body in [`MethodImpl`]. The return-type annotation carries
/// the method's secrecy label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSig {
    pub id: DeclId,
    pub name: Spur,
    /// Return type use; its annotation is the method's label, its
    /// location anchors override diagnostics
    pub ret: TypeUse,
    pub params: Vec<ParamDecl>,
    pub pos: Pos,
}

/// A method implementation inside a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodImpl {
    pub sig: MethodSig,
    pub body: Vec<Stmt>,
}

/// An interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: Spur,
    pub sigs: Vec<MethodSig>,
    pub pos: Pos,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: Spur,
    /// Names of implemented interfaces
    pub implements: Vec<Spur>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodImpl>,
    pub pos: Pos,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
}

/// A module: a named group of declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: Spur,
    pub decls: Vec<Decl>,
}

/// A compilation unit: one source file's worth of modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub name: Spur,
    pub modules: Vec<ModuleDecl>,
}

/// User-declared secrecy lattice, as parsed. `order` lists the declared
/// edges `a ⊑ b`; reflexivity and transitivity are closed over when the
/// lattice is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeDecl {
    pub labels: Vec<Spur>,
    pub order: Vec<(Spur, Spur)>,
    pub bottom: Spur,
}

impl LatticeDecl {
    /// The default two-point lattice `Low ⊑ High`.
    pub fn low_high(interner: &mut Rodeo) -> Self {
        let low = interner.get_or_intern_static("Low");
        let high = interner.get_or_intern_static("High");
        Self {
            labels: vec![low, high],
            order: vec![(low, high)],
            bottom: low,
        }
    }
}

/// An already-parsed and name-resolved model, the input to the secrecy
/// analysis. When `lattice` is `None` the analysis is disabled.
#[derive(Debug, Default)]
pub struct Model {
    pub units: Vec<CompilationUnit>,
    pub lattice: Option<LatticeDecl>,
    interner: Rodeo,
    ids: DeclIdCounter,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an identifier or label name
    pub fn intern(&mut self, s: &str) -> Spur {
        self.interner.get_or_intern(s)
    }

    /// Resolve an interned name
    pub fn resolve(&self, s: Spur) -> &str {
        self.interner.resolve(&s)
    }

    /// Borrow the interner
    pub fn interner(&self) -> &Rodeo {
        &self.interner
    }

    /// Allocate a fresh declaration id
    pub fn fresh_decl(&mut self) -> DeclId {
        self.ids.next()
    }

    /// Declare the default `Low ⊑ High` lattice if none is present.
    pub fn ensure_default_lattice(&mut self) {
        if self.lattice.is_none() {
            self.lattice = Some(LatticeDecl::low_high(&mut self.interner));
        }
    }

    /// Iterate all class declarations in the model
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.all_decls().filter_map(|d| match d {
            Decl::Class(c) => Some(c),
            Decl::Interface(_) => None,
        })
    }

    /// Iterate all interface declarations in the model
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.all_decls().filter_map(|d| match d {
            Decl::Interface(i) => Some(i),
            Decl::Class(_) => None,
        })
    }

    fn all_decls(&self) -> impl Iterator<Item = &Decl> {
        self.units
            .iter()
            .flat_map(|cu| cu.modules.iter())
            .flat_map(|m| m.decls.iter())
    }
}
