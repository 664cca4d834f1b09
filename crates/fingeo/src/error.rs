//! Error taxonomy for the verification engine.
//!
//! Arithmetic and construction failures propagate to the caller unchanged.
//! Expected mathematical negatives (a graph that is not strongly regular, a
//! refuted isomorphism) are ordinary return values and never appear here,
//! except through the explicit [`crate::iso::IsomorphismCertificate::into_result`]
//! conversion.

use thiserror::Error;

/// Errors raised by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inversion of the zero element of GF(p).
    #[error("division by zero in GF({modulus})")]
    DivisionByZero {
        /// Modulus of the field in which the inversion was attempted.
        modulus: u32,
    },

    /// Inversion of a rank-deficient square matrix.
    #[error("singular matrix: rank {rank} < dimension {dimension}")]
    SingularMatrix {
        /// Computed rank.
        rank: usize,
        /// Order of the square matrix.
        dimension: usize,
    },

    /// A constructed structure does not match its closed-form description.
    #[error("structural mismatch in {what}: expected {expected}, found {found}")]
    StructuralMismatch {
        /// Which quantity was checked.
        what: String,
        /// Closed-form value.
        expected: String,
        /// Value produced by the construction.
        found: String,
    },

    /// A real eigenvalue is not within tolerance of an integer.
    #[error(
        "numerical instability: eigenvalue {value} deviates from {nearest} by {deviation:e} (tolerance {tolerance:e})"
    )]
    NumericalInstability {
        /// Raw eigenvalue.
        value: f64,
        /// Nearest integer.
        nearest: i64,
        /// `|value - nearest|`.
        deviation: f64,
        /// Tolerance in force.
        tolerance: f64,
    },

    /// Two structures already differ in a cheap invariant.
    #[error("spectrum mismatch on {invariant}: {left} vs {right}")]
    SpectrumMismatch {
        /// Name of the distinguishing invariant.
        invariant: String,
        /// Invariant value of the left structure.
        left: String,
        /// Invariant value of the right structure.
        right: String,
    },

    /// The isomorphism search ran out of budget; the question is undetermined.
    #[error("search budget exceeded after {nodes} nodes ({elapsed_ms} ms)")]
    SearchBudgetExceeded {
        /// Search nodes expanded before giving up.
        nodes: u64,
        /// Wall-clock time spent.
        elapsed_ms: u64,
    },

    /// Malformed input (non-prime modulus, mismatched dimensions, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for [`Error::StructuralMismatch`].
    pub fn mismatch(
        what: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::StructuralMismatch {
            what: what.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
