//! Scenario tests for the food manufacture model, solved with microlp.

use std::sync::Arc;

use blendopt::{
    BlendingParameters, BlendingPlanner, Category, MicrolpSolver, PeriodId, PlanOutcome,
    ProductionPlan,
};

/// Tolerance for solver results, in tons
const TOL: f64 = 1e-4;

fn planner() -> BlendingPlanner {
    BlendingPlanner::new(Arc::new(MicrolpSolver::new()))
}

fn solve(params: &BlendingParameters) -> PlanOutcome {
    planner().plan(params).expect("planning run failed")
}

fn optimal(params: &BlendingParameters) -> ProductionPlan {
    match solve(params) {
        PlanOutcome::Optimal(plan) => plan,
        other => panic!("expected an optimal plan, got {:?}", other),
    }
}

fn refined(
    params: &BlendingParameters,
    plan: &ProductionPlan,
    category: Category,
    p: PeriodId,
) -> f64 {
    params
        .members(category)
        .map(|c| plan.activity(c.id, p).unwrap().refined)
        .sum()
}

/// Balance, terminal, capacity and quality laws
fn assert_schedule_laws(params: &BlendingParameters, plan: &ProductionPlan) {
    let last = params.last_period().unwrap();

    for commodity in &params.commodities {
        for period in params.period_ids() {
            let now = plan.activity(commodity.id, period).unwrap();
            let before = match period.previous() {
                Some(previous) => plan.activity(commodity.id, previous).unwrap().stock,
                None => commodity.initial_stock,
            };
            let residual = now.stock - before - now.bought + now.refined;
            assert!(
                residual.abs() < TOL,
                "balance of {} broken in {}: {}",
                commodity.name,
                params.periods[period.0],
                residual
            );
            assert!(now.bought >= 0.0 && now.refined >= 0.0 && now.stock >= 0.0);
            assert!(now.stock <= params.storage_capacity + TOL);
        }

        let terminal = plan.activity(commodity.id, last).unwrap().stock;
        assert!(
            (terminal - commodity.final_stock).abs() < TOL,
            "{} ends with {} instead of {}",
            commodity.name,
            terminal,
            commodity.final_stock
        );
    }

    for summary in &plan.periods {
        let p = summary.period;
        for category in Category::ALL {
            assert!(
                refined(params, plan, category, p) <= params.refining_caps.cap(category) + TOL,
                "{} cap exceeded in {}",
                category,
                summary.label
            );
        }

        let total: f64 = params
            .commodities
            .iter()
            .map(|c| plan.activity(c.id, p).unwrap().refined)
            .sum();
        assert!((total - summary.produced).abs() < TOL);

        if summary.produced > 1e-3 {
            let hardness = summary.hardness.unwrap();
            assert!(
                hardness >= params.hardness_lower - TOL && hardness <= params.hardness_upper + TOL,
                "hardness {} out of band in {}",
                hardness,
                summary.label
            );
        }
    }
}

#[test]
fn reference_scenario_is_optimal() {
    let params = BlendingParameters::reference();
    let plan = optimal(&params);

    assert!(plan.objective_value > 0.0);
    assert!(
        (plan.objective_value - 107_842.59).abs() < 0.5,
        "objective {}",
        plan.objective_value
    );
    assert!(
        (plan.revenue - plan.purchase_cost - plan.storage_cost - plan.objective_value).abs() < 1e-2
    );
    assert_schedule_laws(&params, &plan);
}

#[test]
fn relaxing_a_limit_never_lowers_profit() {
    let base = optimal(&BlendingParameters::reference()).objective_value;

    let relaxed = [
        BlendingParameters::reference().with_refining_caps(250.0, 250.0),
        BlendingParameters::reference().with_refining_caps(200.0, 300.0),
        BlendingParameters::reference().with_storage_capacity(1500.0),
        BlendingParameters::reference().with_hardness_band(2.5, 6.5),
    ];

    for params in &relaxed {
        let plan = optimal(params);
        assert!(
            plan.objective_value >= base - 1e-3,
            "relaxation lowered profit: {} < {}",
            plan.objective_value,
            base
        );
        assert_schedule_laws(params, &plan);
    }
}

#[test]
fn tightening_a_cap_never_raises_profit() {
    let base = optimal(&BlendingParameters::reference()).objective_value;
    let params = BlendingParameters::reference().with_refining_caps(150.0, 250.0);

    let plan = optimal(&params);
    assert!(plan.objective_value <= base + 1e-3);
    assert_schedule_laws(&params, &plan);
}

#[test]
fn zero_vegetable_cap_stops_vegetable_refining() {
    let params = BlendingParameters::reference().with_refining_caps(0.0, 250.0);
    let plan = optimal(&params);

    for period in params.period_ids() {
        for commodity in params.members(Category::Vegetable) {
            assert_eq!(plan.activity(commodity.id, period).unwrap().refined, 0.0);
        }
    }
    assert_schedule_laws(&params, &plan);
}

#[test]
fn zero_caps_leave_only_holding_cost() {
    let params = BlendingParameters::reference().with_refining_caps(0.0, 0.0);
    let plan = optimal(&params);

    // nothing can be refined, so every oil sits at 500 tons for six months
    assert!((plan.objective_value + 75_000.0).abs() < 1e-3);
    assert!(plan.periods.iter().all(|p| p.produced == 0.0 && p.hardness.is_none()));
    assert!(plan.activities.values().all(|a| a.bought == 0.0 && a.refined == 0.0));
    assert_schedule_laws(&params, &plan);
}

#[test]
fn unreachable_drawdown_is_infeasible() {
    // stock can only grow without refining, so it cannot fall from 500 to 0
    let params = BlendingParameters::reference()
        .with_refining_caps(0.0, 0.0)
        .with_final_stock(0.0);

    assert_eq!(solve(&params), PlanOutcome::Infeasible);
}

#[test]
fn target_above_storage_is_infeasible() {
    let params = BlendingParameters::reference()
        .with_refining_caps(0.0, 0.0)
        .with_final_stock(1200.0);

    assert_eq!(solve(&params), PlanOutcome::Infeasible);
}

#[test]
fn single_month_horizon() {
    let mut params = BlendingParameters::reference();
    params.periods.truncate(1);
    params.prices = blendopt::blending::PriceTable::from_series(&[
        vec![110.0],
        vec![120.0],
        vec![130.0],
        vec![110.0],
        vec![115.0],
    ]);

    let plan = optimal(&params);
    assert_eq!(plan.periods.len(), 1);
    assert_schedule_laws(&params, &plan);
}
