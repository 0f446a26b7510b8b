// Translation of the dense domain problem into a good_lp model
// Shared by every backend reached through good_lp

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution as GoodLpSolutionTrait,
    SolutionStatus as LpStatus, Solver, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

/// Solve `problem` with a good_lp backend; `configure` may set backend options
pub(crate) fn solve_with<S, F>(
    problem: &OptimizationProblem,
    solver: S,
    configure: F,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(&mut S::Model),
{
    let start_time = Instant::now();
    let num_vars = problem.num_variables();

    let mut vars = ProblemVariables::new();
    let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

    for var_def in &problem.variables {
        let mut definition = variable().min(var_def.lower_bound);
        if let Some(upper) = var_def.upper_bound {
            definition = definition.max(upper);
        }
        lp_variables.push(vars.add(definition));
    }

    let objective = linear_expression(&problem.objective.coefficients, &lp_variables);
    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Maximize => vars.maximise(objective),
        OptimizationType::Minimize => vars.minimise(objective),
    };

    let mut model = unsolved.using(solver);
    configure(&mut model);

    for constraint in &problem.constraints {
        let lhs = linear_expression(&constraint.coefficients, &lp_variables);
        let lp_constraint = match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => lhs.leq(constraint.bound),
            ConstraintType::Equal => lhs.eq(constraint.bound),
            ConstraintType::GreaterThanOrEqual => lhs.geq(constraint.bound),
        };
        model.add_constraint(lp_constraint);
    }

    debug!(
        variables = num_vars,
        constraints = problem.constraints.len(),
        "good_lp model assembled"
    );

    let outcome = model.solve();
    let statistics =
        SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

    match outcome {
        Ok(sol) => match sol.status() {
            LpStatus::Optimal => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();
                let value = problem.objective.evaluate(&variable_values);
                let quality = SolutionQuality {
                    max_constraint_violation: problem.max_violation(&variable_values),
                };

                Ok(DomainSolution::optimal(value, variable_values)
                    .with_statistics(statistics)
                    .with_quality(quality)
                    .with_message(format!("Optimal solution found for '{}'", problem.name)))
            }
            // The incumbent is not proven optimal; its values are not reported.
            LpStatus::TimeLimit => Ok(DomainSolution::new(
                SolutionStatus::TimeLimit,
                format!("{} stopped at the time limit", <S::Model as SolverModel>::name()),
            )
            .with_statistics(statistics)),
            LpStatus::GapLimit => Ok(DomainSolution::new(
                SolutionStatus::Feasible,
                format!("{} stopped at the gap limit", <S::Model as SolverModel>::name()),
            )
            .with_statistics(statistics)),
        },
        Err(ResolutionError::Infeasible) => {
            Ok(DomainSolution::infeasible().with_statistics(statistics))
        }
        Err(ResolutionError::Unbounded) => {
            Ok(DomainSolution::unbounded().with_statistics(statistics))
        }
        Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
    }
}

fn linear_expression(coefficients: &[f64], variables: &[GoodLpVariable]) -> Expression {
    let mut expr = Expression::from(0.0);
    for (&coeff, &var) in coefficients.iter().zip(variables) {
        if coeff != 0.0 {
            expr += coeff * var;
        }
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blending::{interpret, BlendingParameters, ModelBuilder, PlanOutcome};
    use good_lp::constraint::ConstraintReference;
    use good_lp::solvers::microlp::{microlp, MicroLpProblem, MicroLpSolution};
    use good_lp::variable::UnsolvedProblem;
    use good_lp::Constraint as LpConstraint;

    /// microlp model whose solution claims the backend stopped early
    struct StoppedEarly {
        inner: MicroLpProblem,
        status: LpStatus,
    }

    struct StoppedSolution {
        inner: MicroLpSolution,
        status: LpStatus,
    }

    impl GoodLpSolutionTrait for StoppedSolution {
        fn status(&self) -> LpStatus {
            self.status
        }

        fn value(&self, variable: GoodLpVariable) -> f64 {
            self.inner.value(variable)
        }
    }

    impl SolverModel for StoppedEarly {
        type Solution = StoppedSolution;
        type Error = ResolutionError;

        fn solve(self) -> std::result::Result<StoppedSolution, ResolutionError> {
            let status = self.status;
            self.inner
                .solve()
                .map(|inner| StoppedSolution { inner, status })
        }

        fn add_constraint(&mut self, c: LpConstraint) -> ConstraintReference {
            self.inner.add_constraint(c)
        }

        fn name() -> &'static str {
            "stopped-early"
        }
    }

    fn stopping_with(status: LpStatus) -> impl FnMut(UnsolvedProblem) -> StoppedEarly {
        move |problem| StoppedEarly {
            inner: microlp(problem),
            status,
        }
    }

    #[test]
    fn optimal_backend_status_keeps_values() {
        let model = ModelBuilder::new(&BlendingParameters::reference())
            .build()
            .unwrap();

        let solution = solve_with(model.problem(), microlp, |_| {}).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.variable_values.len(), model.num_variables());
    }

    #[test]
    fn time_limit_is_not_reported_as_optimal() {
        let model = ModelBuilder::new(&BlendingParameters::reference())
            .build()
            .unwrap();

        let solution =
            solve_with(model.problem(), stopping_with(LpStatus::TimeLimit), |_| {}).unwrap();

        assert_eq!(solution.status, SolutionStatus::TimeLimit);
        assert!(solution.variable_values.is_empty());
        assert!(solution.optimal_value.is_none());
        assert!(solution.message.contains("time limit"));

        match interpret(&model, &solution).unwrap() {
            PlanOutcome::Inconclusive { status, .. } => {
                assert_eq!(status, SolutionStatus::TimeLimit)
            }
            other => panic!("expected an inconclusive outcome, got {:?}", other),
        }
    }

    #[test]
    fn gap_limit_is_feasible_but_inconclusive() {
        let model = ModelBuilder::new(&BlendingParameters::reference())
            .build()
            .unwrap();

        let solution =
            solve_with(model.problem(), stopping_with(LpStatus::GapLimit), |_| {}).unwrap();

        assert_eq!(solution.status, SolutionStatus::Feasible);
        assert!(!solution.is_optimal());
        assert!(matches!(
            interpret(&model, &solution).unwrap(),
            PlanOutcome::Inconclusive {
                status: SolutionStatus::Feasible,
                ..
            }
        ));
    }
}
