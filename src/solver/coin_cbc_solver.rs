use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::coin_cbc::{coin_cbc, CoinCbcProblem};

use super::good_lp_model::solve_with;

/// COIN-OR CBC backend, requires the native Cbc library
pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let config = &problem.solver_config;
        solve_with(problem, coin_cbc, |model: &mut CoinCbcProblem| {
            if let Some(limit) = config.time_limit {
                model.set_parameter("seconds", &limit.to_string());
            }
            model.set_parameter("logLevel", if config.verbose { "1" } else { "0" });
        })
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
