// Model builder: blending parameters -> linear program
// Variables are laid out commodity-major (refine, buy, stock for every period
// of a commodity) followed by one produce variable per period. Callers address
// columns through VariableKey, never by position.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType,
    SolverConfig, Variable,
};

use super::error::Result;
use super::parameters::{BlendingParameters, Category, CommodityId, PeriodId};

/// Names one decision variable of the blending model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableKey {
    /// Tons of a commodity refined in a period
    Refine(CommodityId, PeriodId),
    /// Tons of a commodity purchased in a period
    Buy(CommodityId, PeriodId),
    /// Tons of a commodity in storage at the end of a period
    Stock(CommodityId, PeriodId),
    /// Tons of blended product made in a period
    Produce(PeriodId),
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKey::Refine(c, p) => write!(f, "refine[{},{}]", c.0, p.0),
            VariableKey::Buy(c, p) => write!(f, "buy[{},{}]", c.0, p.0),
            VariableKey::Stock(c, p) => write!(f, "stock[{},{}]", c.0, p.0),
            VariableKey::Produce(p) => write!(f, "produce[{}]", p.0),
        }
    }
}

/// A built linear program together with its variable index
#[derive(Debug, Clone)]
pub struct BlendingModel {
    parameters: BlendingParameters,
    problem: OptimizationProblem,
    keys: Vec<VariableKey>,
    index: HashMap<VariableKey, usize>,
}

impl BlendingModel {
    pub fn parameters(&self) -> &BlendingParameters {
        &self.parameters
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    /// Column of `key` in the problem, `None` if the model has no such variable
    pub fn index_of(&self, key: VariableKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Variable keys in column order
    pub fn keys(&self) -> &[VariableKey] {
        &self.keys
    }

    pub fn num_variables(&self) -> usize {
        self.keys.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.problem.constraints.len()
    }

    /// Value of `key` in a dense assignment
    pub fn value(&self, values: &[f64], key: VariableKey) -> Option<f64> {
        self.index_of(key).and_then(|i| values.get(i).copied())
    }
}

/// Builds the blending LP from a parameter set
pub struct ModelBuilder<'a> {
    params: &'a BlendingParameters,
    config: SolverConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(params: &'a BlendingParameters) -> Self {
        Self {
            params,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the parameters and emit variables, constraints and objective
    pub fn build(self) -> Result<BlendingModel> {
        self.params.validate()?;

        let params = self.params;
        let caps = params.refining_caps;

        // No feasible plan refines more than the larger cap of one commodity,
        // buys more than it can store and refine, or produces more than both lines.
        let refine_bound = caps.largest();
        let buy_bound = params.storage_capacity + refine_bound;
        let stock_bound = params.storage_capacity;
        let produce_bound = caps.total();

        let mut keys = Vec::new();
        let mut variables = Vec::new();
        for commodity in &params.commodities {
            for period in params.period_ids() {
                for (key, upper) in [
                    (VariableKey::Refine(commodity.id, period), refine_bound),
                    (VariableKey::Buy(commodity.id, period), buy_bound),
                    (VariableKey::Stock(commodity.id, period), stock_bound),
                ] {
                    keys.push(key);
                    variables.push(
                        Variable::continuous(key.to_string()).with_bounds(0.0, Some(upper)),
                    );
                }
            }
        }
        for period in params.period_ids() {
            let key = VariableKey::Produce(period);
            keys.push(key);
            variables.push(
                Variable::continuous(key.to_string()).with_bounds(0.0, Some(produce_bound)),
            );
        }

        let index: HashMap<VariableKey, usize> =
            keys.iter().enumerate().map(|(i, &key)| (key, i)).collect();
        let rows = RowBuilder {
            index: &index,
            width: keys.len(),
        };

        let mut constraints = Vec::new();

        for period in params.period_ids() {
            for category in Category::ALL {
                let terms: Vec<_> = params
                    .members(category)
                    .map(|c| (VariableKey::Refine(c.id, period), 1.0))
                    .collect();
                if terms.is_empty() {
                    continue;
                }
                constraints.push(
                    rows.constraint(ConstraintType::LessThanOrEqual, &terms, caps.cap(category))
                        .with_name(format!("capacity_{}_{}", category, period)),
                );
            }

            let mut mass = vec![(VariableKey::Produce(period), -1.0)];
            mass.extend(
                params
                    .commodities
                    .iter()
                    .map(|c| (VariableKey::Refine(c.id, period), 1.0)),
            );
            constraints.push(
                rows.constraint(ConstraintType::Equal, &mass, 0.0)
                    .with_name(format!("mass_balance_{}", period)),
            );

            for (bound, kind, label) in [
                (params.hardness_lower, ConstraintType::GreaterThanOrEqual, "lower"),
                (params.hardness_upper, ConstraintType::LessThanOrEqual, "upper"),
            ] {
                let mut terms = vec![(VariableKey::Produce(period), -bound)];
                terms.extend(
                    params
                        .commodities
                        .iter()
                        .map(|c| (VariableKey::Refine(c.id, period), c.hardness)),
                );
                constraints.push(
                    rows.constraint(kind, &terms, 0.0)
                        .with_name(format!("hardness_{}_{}", label, period)),
                );
            }
        }

        for commodity in &params.commodities {
            let c = commodity.id;
            for period in params.period_ids() {
                // stock[p] - stock[p-1] - buy[p] + refine[p] = 0
                // at p = 0 the initial stock moves to the right-hand side
                let mut terms = vec![
                    (VariableKey::Stock(c, period), 1.0),
                    (VariableKey::Buy(c, period), -1.0),
                    (VariableKey::Refine(c, period), 1.0),
                ];
                let rhs = match period.previous() {
                    Some(previous) => {
                        terms.push((VariableKey::Stock(c, previous), -1.0));
                        0.0
                    }
                    None => commodity.initial_stock,
                };
                constraints.push(
                    rows.constraint(ConstraintType::Equal, &terms, rhs)
                        .with_name(format!("inventory_{}_{}", c, period)),
                );
            }

            if let Some(last) = params.last_period() {
                constraints.push(
                    rows.constraint(
                        ConstraintType::Equal,
                        &[(VariableKey::Stock(c, last), 1.0)],
                        commodity.final_stock,
                    )
                    .with_name(format!("terminal_stock_{}", c)),
                );
            }
        }

        // revenue - purchase cost - holding cost
        let mut objective_terms = Vec::with_capacity(keys.len());
        for &key in &keys {
            let coeff = match key {
                VariableKey::Produce(_) => params.sale_price,
                VariableKey::Buy(c, p) => -params.prices.price(c, p).unwrap_or_default(),
                VariableKey::Stock(..) => -params.storage_cost,
                VariableKey::Refine(..) => 0.0,
            };
            objective_terms.push((key, coeff));
        }
        let objective = ObjectiveFunction::new(
            OptimizationType::Maximize,
            rows.coefficients(&objective_terms),
        )
        .with_names(keys.iter().map(|k| k.to_string()).collect());

        let problem = OptimizationProblem::new(objective)
            .with_name("food-manufacture")
            .with_description(format!(
                "{} commodities over {} periods",
                params.commodities.len(),
                params.periods.len()
            ))
            .with_variables(variables)
            .with_config(self.config);
        let problem = constraints
            .into_iter()
            .fold(problem, |problem, c| problem.add_constraint(c));

        debug!(
            variables = keys.len(),
            constraints = problem.constraints.len(),
            refine_bound,
            buy_bound,
            stock_bound,
            produce_bound,
            "blending model built"
        );

        Ok(BlendingModel {
            parameters: params.clone(),
            problem,
            keys,
            index,
        })
    }
}

/// Expands sparse `(key, coefficient)` terms into dense rows
struct RowBuilder<'a> {
    index: &'a HashMap<VariableKey, usize>,
    width: usize,
}

impl RowBuilder<'_> {
    fn coefficients(&self, terms: &[(VariableKey, f64)]) -> Vec<f64> {
        let mut row = vec![0.0; self.width];
        for &(key, coeff) in terms {
            // every key handed in was registered above
            if let Some(&i) = self.index.get(&key) {
                row[i] += coeff;
            }
        }
        row
    }

    fn constraint(
        &self,
        kind: ConstraintType,
        terms: &[(VariableKey, f64)],
        bound: f64,
    ) -> Constraint {
        Constraint::new(kind, self.coefficients(terms), bound)
    }
}
