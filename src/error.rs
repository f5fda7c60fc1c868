//! Error types for the simulation engine.
//!
//! All errors are fail-fast input validation raised before any computation
//! begins. Soft "no solution" conditions (an unallocatable request, a graph
//! with no cycle) are ordinary return values, not errors.

/// Errors from simulator entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Malformed simulation input: empty process list, zero burst time,
    /// zero time quantum, or a duplicate identifier.
    InvalidInput(String),
    /// A resource-allocation-graph edge referenced a node that was never
    /// registered, or violated the single-instance invariants.
    GraphConsistency(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            SimError::GraphConsistency(msg) => write!(f, "graph inconsistency: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}
