//! Error types for the mosprune relaxation engine.
//!
//! This module provides a unified error type [`PruneError`] that covers
//! malformed input (bad intervals, mismatched dimensions), circuit validation
//! failures and LP diagnostics. Solver outcomes during tightening are not
//! errors; they are reported through [`crate::lp::LpStatus`].

use thiserror::Error;

/// Result type alias using [`PruneError`].
pub type Result<T> = std::result::Result<T, PruneError>;

/// Unified error type for all mosprune operations.
#[derive(Error, Debug)]
pub enum PruneError {
    // ============ Input Errors ============
    /// Interval with lower bound above upper bound (or a NaN bound)
    #[error("Invalid interval [{lo}, {hi}]: lower bound must not exceed upper bound")]
    InvalidInterval { lo: f64, hi: f64 },

    /// A vector or hyperrectangle does not have the expected length
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A node index lies outside the circuit
    #[error("Node {node} is out of range for a circuit with {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    // ============ Circuit Validation Errors ============
    /// Circuit without devices
    #[error("Circuit has no devices")]
    EmptyCircuit,

    /// A node index in 0..N is not attached to any device
    #[error("Node {node} is not connected to any device")]
    UnusedNode { node: usize },

    /// Model parameters outside the supported convention
    #[error("Invalid model for device {device}: {message}")]
    InvalidModel { device: usize, message: String },

    // ============ LP Diagnostics ============
    /// The program has no feasible point
    #[error("Linear program is infeasible: {context}")]
    Infeasible { context: String },

    /// The LP backend produced no usable answer
    #[error("LP solver failure: {message}")]
    SolverFailure { message: String },
}

impl PruneError {
    /// Create a dimension mismatch error
    pub fn dimension(what: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            found,
        }
    }

    /// Create an invalid model error
    pub fn invalid_model(device: usize, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            device,
            message: message.into(),
        }
    }
}
