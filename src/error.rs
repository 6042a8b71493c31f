//! Error types for the secrecy analysis.
//!
//! Rule violations are diagnostics, not errors; `CheckError` is reserved
//! for configuration problems that suppress the pass altogether.

use thiserror::Error;

use crate::lattice::LatticeError;

/// Result type alias for checker operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The declared lattice is unusable; no analysis was performed.
    #[error("malformed secrecy lattice: {0}")]
    MalformedLattice(#[from] LatticeError),
}
