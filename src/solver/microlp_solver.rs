use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::microlp::microlp;
use tracing::warn;

use super::good_lp_model::solve_with;

/// Pure-Rust simplex backend, available in every build
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicrolpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        if let Some(limit) = problem.solver_config.time_limit {
            warn!(time_limit = limit, "microlp has no time limit; option ignored");
        }

        solve_with(problem, microlp, |_| {})
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
