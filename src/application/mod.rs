// Application layer: use cases orchestrating the domain and the solvers

pub mod planner;

pub use planner::BlendingPlanner;
