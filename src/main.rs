use blendopt::{
    init_tracing, BlendingParameters, BlendingPlanner, PlanOutcome, SolverBackend, SolverConfig,
};
use clap::Parser;

/// Plan oil purchases, storage and refining for the food manufacture scenario
#[derive(Parser)]
#[command(name = "blendopt")]
#[command(about = "Multi-period oil blending planner", long_about = None)]
struct Cli {
    /// Solver backend: auto, microlp, cbc or highs
    #[arg(short, long, default_value = "auto")]
    solver: SolverBackend,
    /// Wall-clock limit for the solve, in seconds
    #[arg(long)]
    time_limit: Option<f64>,
    /// Tons of vegetable oil refinable per month
    #[arg(long)]
    vegetable_cap: Option<f64>,
    /// Tons of non-vegetable oil refinable per month
    #[arg(long)]
    non_vegetable_cap: Option<f64>,
    /// Storage limit per oil, in tons
    #[arg(long)]
    storage_capacity: Option<f64>,
    /// Tons of each oil required in storage after the last month
    #[arg(long)]
    final_stock: Option<f64>,
    /// Debug logging and solver output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut params = BlendingParameters::reference();
    let caps = params.refining_caps;
    params = params.with_refining_caps(
        cli.vegetable_cap.unwrap_or(caps.vegetable),
        cli.non_vegetable_cap.unwrap_or(caps.non_vegetable),
    );
    if let Some(capacity) = cli.storage_capacity {
        params = params.with_storage_capacity(capacity);
    }
    if let Some(tons) = cli.final_stock {
        params = params.with_final_stock(tons);
    }

    let planner = BlendingPlanner::from_config(SolverConfig {
        backend: cli.solver,
        time_limit: cli.time_limit,
        verbose: cli.verbose,
    })?;

    match planner.plan(&params)? {
        PlanOutcome::Optimal(plan) => {
            println!("Solution:");
            println!("Objective value = {:.2}", plan.objective_value);
            for ((commodity, period), activity) in &plan.activities {
                let name = params
                    .commodity(*commodity)
                    .map(|c| c.name.as_str())
                    .unwrap_or("?");
                println!(
                    "{:<6} {:<9} buy {:>8.2}  refine {:>8.2}  stock {:>8.2}",
                    name,
                    params.periods[period.0],
                    activity.bought,
                    activity.refined,
                    activity.stock
                );
            }
        }
        PlanOutcome::Infeasible => println!("The problem is infeasible."),
        PlanOutcome::Unbounded => println!("The problem is unbounded."),
        PlanOutcome::Inconclusive { status, message } => {
            println!("The problem does not have an optimal solution ({}): {}", status, message)
        }
    }

    Ok(())
}
