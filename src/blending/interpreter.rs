// Result interpreter: maps a solver Solution back onto commodities and periods

use std::collections::BTreeMap;

use crate::domain::{Solution, SolutionStatus};

use super::builder::{BlendingModel, VariableKey};
use super::error::{PlanningError, Result};
use super::parameters::{Category, CommodityId, PeriodId};

/// Solver values smaller than this in magnitude are reported as zero
pub const NOISE_EPSILON: f64 = 1e-6;

/// What a planning run produced
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Optimal(ProductionPlan),
    /// No schedule satisfies every constraint
    Infeasible,
    /// The objective has no finite optimum; points at a bound derivation defect
    Unbounded,
    /// The solver stopped without proving optimality, infeasibility or unboundedness
    Inconclusive {
        status: SolutionStatus,
        message: String,
    },
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&ProductionPlan> {
        match self {
            PlanOutcome::Optimal(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, PlanOutcome::Optimal(_))
    }
}

/// Activity of one commodity in one period, in tons
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommodityActivity {
    pub bought: f64,
    pub refined: f64,
    /// Stock at the end of the period
    pub stock: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: PeriodId,
    pub label: String,
    pub produced: f64,
    /// Weighted hardness of the blend, `None` when nothing was produced
    pub hardness: Option<f64>,
}

/// Optimal purchase, refining and storage schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionPlan {
    pub objective_value: f64,
    pub revenue: f64,
    pub purchase_cost: f64,
    pub storage_cost: f64,
    pub activities: BTreeMap<(CommodityId, PeriodId), CommodityActivity>,
    pub periods: Vec<PeriodSummary>,
}

impl ProductionPlan {
    pub fn activity(&self, commodity: CommodityId, period: PeriodId) -> Option<&CommodityActivity> {
        self.activities.get(&(commodity, period))
    }

    /// Tons refined in `period` over commodities that are members of `category`
    ///
    /// Membership is read from `model` so the plan stays plain data.
    pub fn refined_in(&self, model: &BlendingModel, category: Category, period: PeriodId) -> f64 {
        model
            .parameters()
            .members(category)
            .filter_map(|c| self.activity(c.id, period))
            .map(|a| a.refined)
            .sum()
    }
}

/// Turn the solver outcome for `model` into a domain-level report
pub fn interpret(model: &BlendingModel, solution: &Solution) -> Result<PlanOutcome> {
    match solution.status {
        SolutionStatus::Optimal => {}
        SolutionStatus::Infeasible => return Ok(PlanOutcome::Infeasible),
        SolutionStatus::Unbounded => return Ok(PlanOutcome::Unbounded),
        status => {
            return Ok(PlanOutcome::Inconclusive {
                status,
                message: solution.message.clone(),
            })
        }
    }

    let values = &solution.variable_values;
    if values.len() != model.num_variables() {
        return Err(PlanningError::SolutionMismatch {
            expected: model.num_variables(),
            actual: values.len(),
        });
    }

    let params = model.parameters();
    let value = |key: VariableKey| denoise(model.value(values, key).unwrap_or_default());

    let mut activities = BTreeMap::new();
    let mut purchase_cost = 0.0;
    let mut total_stock = 0.0;
    for commodity in &params.commodities {
        for period in params.period_ids() {
            let activity = CommodityActivity {
                bought: value(VariableKey::Buy(commodity.id, period)),
                refined: value(VariableKey::Refine(commodity.id, period)),
                stock: value(VariableKey::Stock(commodity.id, period)),
            };
            purchase_cost +=
                params.prices.price(commodity.id, period).unwrap_or_default() * activity.bought;
            total_stock += activity.stock;
            activities.insert((commodity.id, period), activity);
        }
    }

    let periods: Vec<PeriodSummary> = params
        .period_ids()
        .map(|period| {
            let produced = value(VariableKey::Produce(period));
            let weighted: f64 = params
                .commodities
                .iter()
                .map(|c| c.hardness * activities[&(c.id, period)].refined)
                .sum();
            PeriodSummary {
                period,
                label: params.periods[period.0].clone(),
                produced,
                hardness: (produced > 0.0).then(|| weighted / produced),
            }
        })
        .collect();

    let revenue = params.sale_price * periods.iter().map(|p| p.produced).sum::<f64>();
    let storage_cost = params.storage_cost * total_stock;
    let objective_value = solution
        .optimal_value
        .unwrap_or_else(|| model.problem().objective.evaluate(values));

    Ok(PlanOutcome::Optimal(ProductionPlan {
        objective_value,
        revenue,
        purchase_cost,
        storage_cost,
        activities,
        periods,
    }))
}

fn denoise(value: f64) -> f64 {
    if value.abs() < NOISE_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blending::{BlendingParameters, ModelBuilder};

    fn model() -> BlendingModel {
        let params = BlendingParameters::reference();
        ModelBuilder::new(&params).build().unwrap()
    }

    fn assignment(model: &BlendingModel, entries: &[(VariableKey, f64)]) -> Vec<f64> {
        let mut values = vec![0.0; model.num_variables()];
        for &(key, value) in entries {
            values[model.index_of(key).unwrap()] = value;
        }
        values
    }

    #[test]
    fn optimal_solution_becomes_schedule() {
        let model = model();
        let (c, p) = (CommodityId(0), PeriodId(0));
        let values = assignment(
            &model,
            &[
                (VariableKey::Buy(c, p), 100.0),
                (VariableKey::Refine(c, p), 40.0),
                (VariableKey::Refine(CommodityId(2), p), 60.0),
                (VariableKey::Stock(c, p), 560.0),
                (VariableKey::Produce(p), 100.0),
            ],
        );
        let solution = Solution::optimal(1234.0, values);

        let outcome = interpret(&model, &solution).unwrap();
        let plan = outcome.plan().unwrap();

        assert_eq!(plan.objective_value, 1234.0);
        assert_eq!(
            plan.activity(c, p),
            Some(&CommodityActivity {
                bought: 100.0,
                refined: 40.0,
                stock: 560.0,
            })
        );
        assert_eq!(plan.activities.len(), 30);
        assert_eq!(plan.periods[0].label, "January");
        assert_eq!(plan.periods[0].produced, 100.0);
        // (8.8 * 40 + 2.0 * 60) / 100
        assert!((plan.periods[0].hardness.unwrap() - 4.72).abs() < 1e-12);
        assert_eq!(plan.periods[1].hardness, None);
        assert_eq!(plan.revenue, 15_000.0);
        assert_eq!(plan.purchase_cost, 11_000.0);
        assert_eq!(plan.storage_cost, 2_800.0);
        assert_eq!(plan.refined_in(&model, Category::Vegetable, p), 40.0);
        assert_eq!(plan.refined_in(&model, Category::NonVegetable, p), 60.0);
    }

    #[test]
    fn numerical_noise_is_rounded_to_zero() {
        let model = model();
        let (c, p) = (CommodityId(1), PeriodId(3));
        let values = assignment(
            &model,
            &[
                (VariableKey::Buy(c, p), 3e-9),
                (VariableKey::Refine(c, p), -4e-7),
                (VariableKey::Stock(c, p), 499.999_999_9),
            ],
        );

        let outcome = interpret(&model, &Solution::optimal(0.0, values)).unwrap();
        let activity = *outcome.plan().unwrap().activity(c, p).unwrap();

        assert_eq!(activity.bought, 0.0);
        assert_eq!(activity.refined, 0.0);
        assert_eq!(activity.stock, 499.999_999_9);
    }

    #[test]
    fn infeasible_and_unbounded_are_distinct() {
        let model = model();
        assert_eq!(
            interpret(&model, &Solution::infeasible()).unwrap(),
            PlanOutcome::Infeasible
        );
        assert_eq!(
            interpret(&model, &Solution::unbounded()).unwrap(),
            PlanOutcome::Unbounded
        );
    }

    #[test]
    fn time_limit_is_inconclusive() {
        let model = model();
        let solution = Solution::new(SolutionStatus::TimeLimit, "stopped");

        let outcome = interpret(&model, &solution).unwrap();
        assert_eq!(
            outcome,
            PlanOutcome::Inconclusive {
                status: SolutionStatus::TimeLimit,
                message: "stopped".to_string(),
            }
        );
        assert!(!outcome.is_optimal());
    }

    #[test]
    fn short_assignment_is_rejected() {
        let model = model();
        let err = interpret(&model, &Solution::optimal(1.0, vec![0.0; 3])).unwrap_err();
        assert!(matches!(
            err,
            PlanningError::SolutionMismatch {
                expected: 96,
                actual: 3
            }
        ));
    }
}
