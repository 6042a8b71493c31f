//! Security lattice: finite partially-ordered label set with joins.
//!
//! Labels are interned names. The order is stored as reachability sets
//! `up(l) = { l' | l ⊑ l' }`, closed reflexively and transitively over
//! the declared edges, plus a precomputed least-upper-bound table so
//! `join` is a total lookup once construction has validated the decl.

use lasso::{Rodeo, Spur};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::ast::LatticeDecl;
use crate::pc::PcStack;

/// A secrecy level: an interned label name.
pub type Label = Spur;

/// Why a lattice declaration could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// No labels declared
    #[error("lattice declares no labels")]
    Empty,

    /// The designated bottom is not among the declared labels
    #[error("bottom label {0} is not declared")]
    UndeclaredBottom(String),

    /// An order edge names an undeclared label
    #[error("label {0} in the lattice order is not declared")]
    UndeclaredLabel(String),

    /// Two distinct labels are ordered both ways
    #[error("lattice order between {a} and {b} is cyclic")]
    CyclicOrder { a: String, b: String },

    /// The bottom label is not below some label
    #[error("bottom label {bottom} is not below {label}")]
    BottomNotMinimum { bottom: String, label: String },

    /// A label pair has no least upper bound
    #[error("labels {a} and {b} have no least upper bound")]
    NoJoin { a: String, b: String },
}

/// A validated secrecy lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct SecrecyLattice {
    labels: FxHashSet<Label>,
    up: FxHashMap<Label, FxHashSet<Label>>,
    lub: FxHashMap<(Label, Label), Label>,
    bottom: Label,
    top: Label,
}

impl SecrecyLattice {
    /// Build and validate a lattice from its declaration. The interner
    /// is only read, to name offending labels in errors.
    pub fn from_decl(decl: &LatticeDecl, interner: &Rodeo) -> Result<Self, LatticeError> {
        let name = |l: Label| interner.resolve(&l).to_string();

        if decl.labels.is_empty() {
            return Err(LatticeError::Empty);
        }
        let labels: FxHashSet<Label> = decl.labels.iter().copied().collect();
        if !labels.contains(&decl.bottom) {
            return Err(LatticeError::UndeclaredBottom(name(decl.bottom)));
        }

        let mut edges: FxHashMap<Label, FxHashSet<Label>> = FxHashMap::default();
        for (a, b) in &decl.order {
            for l in [a, b] {
                if !labels.contains(l) {
                    return Err(LatticeError::UndeclaredLabel(name(*l)));
                }
            }
            edges.entry(*a).or_default().insert(*b);
        }

        // Reflexive-transitive closure of the declared edges.
        let mut up: FxHashMap<Label, FxHashSet<Label>> = FxHashMap::default();
        for &start in &labels {
            let mut reached = FxHashSet::default();
            let mut stack = vec![start];
            while let Some(l) = stack.pop() {
                if reached.insert(l) {
                    if let Some(nexts) = edges.get(&l) {
                        stack.extend(nexts.iter().copied());
                    }
                }
            }
            up.insert(start, reached);
        }

        // Antisymmetry: distinct labels ordered both ways form a cycle.
        for &a in &labels {
            for &b in &labels {
                if a != b && up[&a].contains(&b) && up[&b].contains(&a) {
                    return Err(LatticeError::CyclicOrder {
                        a: name(a),
                        b: name(b),
                    });
                }
            }
        }

        // Bottom must reach every label.
        for &l in &labels {
            if !up[&decl.bottom].contains(&l) {
                return Err(LatticeError::BottomNotMinimum {
                    bottom: name(decl.bottom),
                    label: name(l),
                });
            }
        }

        // Every pair needs a unique least upper bound.
        let mut lub = FxHashMap::default();
        for &a in &labels {
            for &b in &labels {
                let candidates: Vec<Label> = up[&a]
                    .intersection(&up[&b])
                    .copied()
                    .collect();
                let least = candidates
                    .iter()
                    .copied()
                    .find(|&c| candidates.iter().all(|&d| up[&c].contains(&d)));
                match least {
                    Some(c) => {
                        lub.insert((a, b), c);
                    }
                    None => {
                        return Err(LatticeError::NoJoin {
                            a: name(a),
                            b: name(b),
                        })
                    }
                }
            }
        }

        // With all binary joins total, the fold over every label is the top.
        let mut top = decl.bottom;
        for &l in &labels {
            top = lub[&(top, l)];
        }

        Ok(Self {
            labels,
            up,
            lub,
            bottom: decl.bottom,
            top,
        })
    }

    /// The default two-point lattice `Low ⊑ High`.
    pub fn low_high(interner: &mut Rodeo) -> Self {
        let low = interner.get_or_intern_static("Low");
        let high = interner.get_or_intern_static("High");

        let labels: FxHashSet<Label> = [low, high].into_iter().collect();
        let mut up = FxHashMap::default();
        up.insert(low, labels.clone());
        up.insert(high, [high].into_iter().collect());
        let mut lub = FxHashMap::default();
        lub.insert((low, low), low);
        lub.insert((low, high), high);
        lub.insert((high, low), high);
        lub.insert((high, high), high);

        Self {
            labels,
            up,
            lub,
            bottom: low,
            top: high,
        }
    }

    /// Is `l` among the declared labels?
    pub fn is_valid(&self, l: Label) -> bool {
        self.labels.contains(&l)
    }

    /// Lattice ordering: `a ⊑ b`.
    pub fn leq(&self, a: Label, b: Label) -> bool {
        a == b || self.up.get(&a).is_some_and(|ups| ups.contains(&b))
    }

    /// Least upper bound of two labels. Total for valid labels;
    /// conservatively the top for anything else.
    pub fn join(&self, a: Label, b: Label) -> Label {
        debug_assert!(self.is_valid(a) && self.is_valid(b));
        self.lub.get(&(a, b)).copied().unwrap_or(self.top)
    }

    /// Join over any number of levels, `⊥` for none.
    pub fn join_all(&self, levels: impl IntoIterator<Item = Label>) -> Label {
        levels
            .into_iter()
            .fold(self.bottom, |acc, l| self.join(acc, l))
    }

    /// The set of labels reachable upward from `l`, including `l`.
    pub fn up(&self, l: Label) -> impl Iterator<Item = Label> + '_ {
        self.up.get(&l).into_iter().flatten().copied()
    }

    /// The designated minimum `⊥`, the default for unannotated decls.
    pub fn min(&self) -> Label {
        self.bottom
    }

    /// The greatest label.
    pub fn top(&self) -> Label {
        self.top
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the lattice has no labels. Construction rejects this, so
    /// a validated lattice always returns false.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Current PC level: join of every frame on the stack, `⊥` when the
    /// stack is empty.
    pub fn eval_stack(&self, stack: &PcStack) -> Label {
        self.join_all(stack.levels())
    }
}
