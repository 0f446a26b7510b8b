// Domain value objects shared by the LP model and the solver adapters

use std::fmt;
use std::str::FromStr;

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanOrEqual => write!(f, "<="),
            ConstraintType::Equal => write!(f, "="),
            ConstraintType::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Stopped at a feasible point without proving optimality
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached
    TimeLimit,
    /// Iteration limit reached
    IterationLimit,
    /// Solver reported an error status
    Error,
    /// Solve interrupted by user
    Interrupted,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            SolutionStatus::Error => write!(f, "Error"),
            SolutionStatus::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Pick the strongest backend compiled into this build
    Auto,
    /// Pure-Rust simplex through good_lp
    Microlp,
    /// COIN-OR CBC through good_lp
    CoinCbc,
    /// HiGHS
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Microlp => write!(f, "microlp"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "microlp" => Ok(SolverBackend::Microlp),
            "cbc" | "coin-cbc" | "coin_cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!(
                "unknown solver backend '{}' (expected auto, microlp, cbc or highs)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_common_spellings() {
        assert_eq!("AUTO".parse::<SolverBackend>(), Ok(SolverBackend::Auto));
        assert_eq!("microlp".parse::<SolverBackend>(), Ok(SolverBackend::Microlp));
        assert_eq!("coin-cbc".parse::<SolverBackend>(), Ok(SolverBackend::CoinCbc));
        assert_eq!("cbc".parse::<SolverBackend>(), Ok(SolverBackend::CoinCbc));
        assert_eq!("HiGHS".parse::<SolverBackend>(), Ok(SolverBackend::Highs));
        assert!("glpk".parse::<SolverBackend>().is_err());
    }

    #[test]
    fn status_display() {
        assert_eq!(SolutionStatus::TimeLimit.to_string(), "Time Limit Reached");
        assert_eq!(SolutionStatus::Infeasible.to_string(), "Infeasible");
        assert_eq!(ConstraintType::GreaterThanOrEqual.to_string(), ">=");
    }
}
