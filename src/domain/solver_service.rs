// Domain service interface for solving constraint models
// Defines the contract that any solver implementation must follow (Dependency Inversion Principle)

use std::time::Duration;

use super::constraint_model::{BoolVar, ConstraintModel, IntVar};
use super::value_objects::SolveStatus;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Outcome of one solver call
///
/// Variable values are only present when the status carries a solution.
#[derive(Debug, Clone)]
pub struct SolveResponse {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub solve_time_ms: f64,
    values: Vec<f64>,
}

impl SolveResponse {
    pub fn new(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            solve_time_ms: 0.0,
            values: Vec::new(),
        }
    }

    pub fn optimal(objective_value: f64, values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            solve_time_ms: 0.0,
            values,
        }
    }

    /// A solution that was not proven optimal, e.g. the incumbent at a time limit
    pub fn feasible(objective_value: f64, values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Feasible,
            objective_value: Some(objective_value),
            solve_time_ms: 0.0,
            values,
        }
    }

    pub fn with_solve_time(mut self, solve_time_ms: f64) -> Self {
        self.solve_time_ms = solve_time_ms;
        self
    }

    /// Value of a boolean variable, `None` unless a solution was found
    pub fn value_of(&self, var: BoolVar) -> Option<bool> {
        if !self.status.has_solution() {
            return None;
        }
        self.values.get(var.index()).map(|&v| v > 0.5)
    }

    /// Value of an integer variable, `None` unless a solution was found
    pub fn int_value_of(&self, var: IntVar) -> Option<i64> {
        if !self.status.has_solution() {
            return None;
        }
        self.values.get(var.index()).map(|&v| v.round() as i64)
    }
}

/// Domain service interface for constraint solvers
///
/// This trait defines the contract that all solver implementations must follow.
/// It allows us to swap solver backends without changing scheduling logic (Open/Closed Principle).
pub trait SolverService: Send + Sync {
    /// Solve a constraint model, maximizing its objective
    ///
    /// Exceeding `time_limit` must be reported as `SolveStatus::Timeout`,
    /// never as `Infeasible`.
    fn solve(&self, model: &ConstraintModel, time_limit: Option<Duration>) -> Result<SolveResponse>;

    /// Validate a model without solving it
    fn validate(&self, model: &ConstraintModel) -> Result<()> {
        let mut errors = Vec::new();

        for (i, var) in model.variables().iter().enumerate() {
            if var.lower > var.upper {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i, var.name, var.lower, var.upper
                ));
            }
        }

        for (i, constraint) in model.constraints().iter().enumerate() {
            if let Some(index) = constraint
                .referenced_variables()
                .into_iter()
                .find(|&index| index >= model.num_variables())
            {
                errors.push(format!(
                    "Constraint {} references unknown variable {}",
                    i, index
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidModel(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
