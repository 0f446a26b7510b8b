// Domain layer: generic LP model and the solver contract
pub mod domain;

// Blending model: parameters, model builder, result interpreter
pub mod blending;

// Application layer: planning use case
pub mod application;

// Infrastructure layer: logging setup
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType, Solution,
    SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService, Variable,
};

pub use blending::{
    interpret, BlendingModel, BlendingParameters, Category, Commodity, CommodityActivity,
    CommodityId, ModelBuilder, PeriodId, PlanOutcome, PlanningError, ProductionPlan, VariableKey,
};

pub use application::BlendingPlanner;

pub use infrastructure::init_tracing;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::{MicrolpSolver, SolverFactory};
