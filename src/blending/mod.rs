// Multi-period oil blending and inventory planning
// BlendingParameters describe a scenario, ModelBuilder turns them into an
// OptimizationProblem, and interpret maps the solver's answer to a PlanOutcome

pub mod builder;
pub mod error;
pub mod interpreter;
pub mod parameters;

pub use builder::{BlendingModel, ModelBuilder, VariableKey};
pub use error::PlanningError;
pub use interpreter::{
    interpret, CommodityActivity, PeriodSummary, PlanOutcome, ProductionPlan, NOISE_EPSILON,
};
pub use parameters::{
    BlendingParameters, Category, Commodity, CommodityId, PeriodId, PriceTable, RefiningCaps,
};
