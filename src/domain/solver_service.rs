// Domain service interface for solving optimization problems
// Every LP backend is consumed through this trait and nothing else

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for LP solvers
///
/// Infeasible and unbounded problems are reported through `Solution::status`;
/// `Err` is reserved for problems the backend could not process at all.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        // Check objective has coefficients
        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }
        if problem.objective.coefficients.iter().any(|c| !c.is_finite()) {
            errors.push("Objective coefficients must be finite".to_string());
        }

        let num_vars = problem.num_variables();

        // Check variables match objective
        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        // Check constraints
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but problem has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            let finite = constraint.bound.is_finite()
                && constraint.coefficients.iter().all(|c| c.is_finite());
            if !finite {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite coefficient or bound",
                    i, constraint.name
                ));
            }
        }

        // Check variable bounds
        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
