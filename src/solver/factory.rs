use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::infrastructure::config::SchedulerConfig;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use crate::solver::MicroLpSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the scheduler configuration
    pub fn create_solver(config: &SchedulerConfig) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(config.backend)
    }

    /// Create a solver for a specific backend
    ///
    /// `Auto` prefers HiGHS when the `highs` feature is compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// Get the default solver
    pub fn default_solver() -> Arc<dyn SolverService> {
        match Self::highs() {
            Ok(solver) => solver,
            Err(_) => Arc::new(MicroLpSolver::new()),
        }
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(HighsSolver::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "HiGHS support requires the `highs` feature".to_string(),
        ))
    }
}
