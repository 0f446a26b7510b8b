// HiGHS Solver Adapter
// Translates the dense domain problem into a HiGHS row problem

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        // Columns first, then rows
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        for (&obj_coeff, var) in problem.objective.coefficients.iter().zip(&problem.variables) {
            let upper = var.upper_bound.unwrap_or(f64::INFINITY);
            cols.push(pb.add_column(obj_coeff, var.lower_bound..=upper));
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|(coeff, _)| **coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };

        let mut model = pb.optimise(sense);
        model.set_option("output_flag", problem.solver_config.verbose);
        if let Some(limit) = problem.solver_config.time_limit {
            model.set_option("time_limit", limit);
        }

        let solved = model.solve();
        let statistics =
            SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let value = problem.objective.evaluate(&variable_values);
                let quality = SolutionQuality {
                    max_constraint_violation: problem.max_violation(&variable_values),
                };

                Ok(DomainSolution::optimal(value, variable_values)
                    .with_statistics(statistics)
                    .with_quality(quality)
                    .with_message(format!("Optimal solution found for '{}'", problem.name)))
            }
            HighsModelStatus::Infeasible => {
                Ok(DomainSolution::infeasible().with_statistics(statistics))
            }
            HighsModelStatus::Unbounded => {
                Ok(DomainSolution::unbounded().with_statistics(statistics))
            }
            // Presolve may stop short of telling the two apart; with every
            // column boxed the problem cannot be unbounded.
            HighsModelStatus::UnboundedOrInfeasible if problem.is_bounded() => {
                Ok(DomainSolution::infeasible().with_statistics(statistics))
            }
            HighsModelStatus::UnboundedOrInfeasible => Ok(DomainSolution::new(
                DomainSolutionStatus::Error,
                "HiGHS could not tell an infeasible problem from an unbounded one",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedTimeLimit => Ok(DomainSolution::new(
                DomainSolutionStatus::TimeLimit,
                "HiGHS stopped at the time limit",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedIterationLimit => Ok(DomainSolution::new(
                DomainSolutionStatus::IterationLimit,
                "HiGHS stopped at the iteration limit",
            )
            .with_statistics(statistics)),
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blending::{interpret, BlendingParameters, ModelBuilder, PlanOutcome};

    #[test]
    fn infeasible_blend_is_not_reported_as_unbounded() {
        let params = BlendingParameters::reference()
            .with_refining_caps(0.0, 0.0)
            .with_final_stock(0.0);
        let model = ModelBuilder::new(&params).build().unwrap();
        assert!(model.problem().is_bounded());

        let solution = HighsSolver::new().solve(model.problem()).unwrap();

        assert_eq!(solution.status, DomainSolutionStatus::Infeasible);
        assert_eq!(interpret(&model, &solution).unwrap(), PlanOutcome::Infeasible);
    }
}
