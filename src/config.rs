//! Configuration for one secrecy-checking invocation.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticKind;

/// Knobs for the checking entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Run under the default `Low ⊑ High` lattice when the model
    /// declares none. Off by default: an undeclared lattice disables
    /// the analysis entirely.
    pub fallback_to_default_lattice: bool,

    /// Restrict reporting to these kinds. `None` reports all four.
    pub kinds: Option<FxHashSet<DiagnosticKind>>,
}

impl CheckConfig {
    /// Default configuration: disabled without a lattice, all kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the default-lattice fallback.
    #[must_use]
    pub fn with_default_lattice_fallback(mut self) -> Self {
        self.fallback_to_default_lattice = true;
        self
    }

    /// Report only the given kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = DiagnosticKind>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Whether a diagnostic of this kind passes the filter.
    pub fn should_report(&self, kind: DiagnosticKind) -> bool {
        self.kinds.as_ref().is_none_or(|ks| ks.contains(&kind))
    }
}
