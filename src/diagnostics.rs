//! Secrecy diagnostics and the append-only sink they accumulate in.
//!
//! Diagnostics store resolved label names, not interner keys, so a sink
//! outlives the model it was produced from and renders without one.
//! `fixture_lines` produces the `<line>:<message>` form that
//! expected-error files use.

use serde::{Deserialize, Serialize};

/// Kind codes for filtering and fixture comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    WrongAnnotationValue,
    LeakageFromTo,
    LeakageAtMost,
    ParameterTooHigh,
}

/// A secrecy rule violation with its label details.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecrecyViolation {
    /// An annotation names a label outside the lattice
    WrongAnnotationValue { label: String },
    /// A value of level `from` flows into a sink of level `to`
    LeakageFromTo { from: String, to: String },
    /// An implementation exceeds the level its interface declares
    LeakageAtMost { declared: String, actual: String },
    /// A call-site argument exceeds the declared parameter level
    ParameterTooHigh { supplied: String, declared: String },
}

impl SecrecyViolation {
    /// The kind code of this violation
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::WrongAnnotationValue { .. } => DiagnosticKind::WrongAnnotationValue,
            Self::LeakageFromTo { .. } => DiagnosticKind::LeakageFromTo,
            Self::LeakageAtMost { .. } => DiagnosticKind::LeakageAtMost,
            Self::ParameterTooHigh { .. } => DiagnosticKind::ParameterTooHigh,
        }
    }
}

impl std::fmt::Display for SecrecyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongAnnotationValue { label } => {
                write!(
                    f,
                    "Secrecy annotation value {label} is not a label of the declared lattice"
                )
            }
            Self::LeakageFromTo { from, to } => {
                write!(f, "Secrecy leakage from level {from} to level {to}")
            }
            Self::LeakageAtMost { declared, actual } => {
                write!(
                    f,
                    "Secrecy level may be at most {declared} but was {actual}"
                )
            }
            Self::ParameterTooHigh { supplied, declared } => {
                write!(
                    f,
                    "Secrecy level {supplied} of argument is higher than declared parameter level {declared}"
                )
            }
        }
    }
}

/// One reported diagnostic: a violation anchored at a source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source line (1-indexed; 0 for synthetic positions)
    pub line: u32,
    /// The violation
    pub violation: SecrecyViolation,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.violation)
    }
}

/// Append-only container the engine reports into. The compiler shares
/// one sink across its checking extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic
    pub fn push(&mut self, line: u32, violation: SecrecyViolation) {
        self.entries.push(Diagnostic { line, violation });
    }

    /// All diagnostics, in emission order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render all diagnostics as `<line>:<message>` fixture lines.
    pub fn fixture_lines(&self) -> Vec<String> {
        self.entries.iter().map(Diagnostic::to_string).collect()
    }

    /// Render only diagnostics whose kind passes the predicate.
    pub fn fixture_lines_where(
        &self,
        mut keep: impl FnMut(DiagnosticKind) -> bool,
    ) -> Vec<String> {
        self.entries
            .iter()
            .filter(|d| keep(d.violation.kind()))
            .map(Diagnostic::to_string)
            .collect()
    }
}

impl<'a> IntoIterator for &'a DiagnosticSink {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
