use crate::domain::SolverError;

/// Failures of a planning run
///
/// Infeasible and unbounded models are not errors; they are reported as
/// [`PlanOutcome`](super::PlanOutcome) variants.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("Invalid blending parameters: {}", .0.join("; "))]
    InvalidParameters(Vec<String>),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Solver returned {actual} values for a model with {expected} variables")]
    SolutionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PlanningError>;
