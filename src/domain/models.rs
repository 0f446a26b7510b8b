use super::value_objects::{ConstraintType, OptimizationType, SolutionStatus, SolverBackend};

/// Bounded continuous decision variable
#[derive(Debug, Clone)]
pub struct Variable {
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
    pub variable_names: Vec<String>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, coefficients: Vec<f64>) -> Self {
        let variable_names = (0..coefficients.len()).map(|i| format!("x{}", i)).collect();

        Self {
            optimization_type,
            coefficients,
            variable_names,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.variable_names = names;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Objective value at the given assignment
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }
}

/// Linear constraint on variables, stored densely
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Left-hand side value at the given assignment
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }

    /// Amount by which the assignment violates this constraint (0 when satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.activity(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds, forwarded to backends that support one
    pub time_limit: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            verbose: false,
        }
    }
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    /// Whether every variable has finite lower and upper bounds
    pub fn is_bounded(&self) -> bool {
        !self.variables.is_empty()
            && self.variables.iter().all(|var| {
                var.lower_bound.is_finite() && var.upper_bound.is_some_and(f64::is_finite)
            })
    }

    /// Largest constraint or bound violation of an assignment
    pub fn max_violation(&self, values: &[f64]) -> f64 {
        let rows = self
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0_f64, f64::max);

        let bounds = self
            .variables
            .iter()
            .zip(values)
            .map(|(var, &value)| {
                let below = (var.lower_bound - value).max(0.0);
                let above = var.upper_bound.map_or(0.0, |ub| (value - ub).max(0.0));
                below.max(above)
            })
            .fold(0.0_f64, f64::max);

        rows.max(bounds)
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn infeasible() -> Self {
        Self::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
    }

    pub fn unbounded() -> Self {
        Self::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
