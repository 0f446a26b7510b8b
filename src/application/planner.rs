// Application service: one planning run end to end
// validate -> build -> solve -> interpret, with no retries

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::blending::{interpret, BlendingParameters, ModelBuilder, PlanOutcome, PlanningError};
use crate::domain::{SolverConfig, SolverService};
use crate::solver::SolverFactory;

pub struct BlendingPlanner {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl BlendingPlanner {
    /// Planner over an explicit solver backend
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    /// Planner whose backend is chosen by `config.backend`
    pub fn from_config(config: SolverConfig) -> Result<Self, PlanningError> {
        let solver = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self { solver, config })
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solve one scenario
    pub fn plan(&self, params: &BlendingParameters) -> Result<PlanOutcome, PlanningError> {
        let model = ModelBuilder::new(params)
            .with_config(self.config.clone())
            .build()?;

        info!(
            event = "solve_start",
            solver = self.solver.name(),
            commodities = params.commodities.len(),
            periods = params.periods.len(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
        );

        let start = Instant::now();
        let solution = self.solver.solve(model.problem())?;
        let outcome = interpret(&model, &solution)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &outcome {
            PlanOutcome::Optimal(plan) => info!(
                event = "solve_end",
                status = %solution.status,
                objective = plan.objective_value,
                max_violation = solution.quality.max_constraint_violation,
                elapsed_ms,
            ),
            PlanOutcome::Infeasible => info!(
                event = "solve_end",
                status = %solution.status,
                elapsed_ms,
                "no schedule satisfies the constraints"
            ),
            PlanOutcome::Unbounded => warn!(
                event = "solve_end",
                status = %solution.status,
                "model is unbounded; every variable should carry a finite bound"
            ),
            PlanOutcome::Inconclusive { status, message } => warn!(
                event = "solve_end",
                status = %status,
                detail = message.as_str(),
                elapsed_ms,
            ),
        }

        Ok(outcome)
    }
}
