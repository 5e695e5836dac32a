//! Error types shared across the solver.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    /// The instance or configuration was rejected before any simulation work.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The simulation finished without recording a single tour. Unreachable
    /// with a validated configuration; surfaced as an internal invariant
    /// violation rather than a user-facing condition.
    #[error("no tour was recorded during the simulation")]
    NoSolution,
}
