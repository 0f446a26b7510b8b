use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::MicrolpSolver;
use std::sync::Arc;

#[cfg(feature = "coin_cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    ///
    /// Fails with `SolverNotAvailable` when the backend was not compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::Microlp => Ok(Arc::new(MicrolpSolver::new())),
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} (enable the corresponding cargo feature)",
                other
            ))),
        }
    }

    /// Get the default solver: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Arc<dyn SolverService> {
        preferred_solver()
    }
}

#[cfg(feature = "highs")]
fn preferred_solver() -> Arc<dyn SolverService> {
    Arc::new(HighsSolver::new())
}

#[cfg(all(feature = "coin_cbc", not(feature = "highs")))]
fn preferred_solver() -> Arc<dyn SolverService> {
    Arc::new(CoinCbcSolver::new())
}

#[cfg(not(any(feature = "coin_cbc", feature = "highs")))]
fn preferred_solver() -> Arc<dyn SolverService> {
    Arc::new(MicrolpSolver::new())
}
