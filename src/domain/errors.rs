// Errors raised while building and solving a scheduling model

use std::time::Duration;

use super::solver_service::SolverError;
use crate::infrastructure::config::ConfigError;
use super::value_objects::{AssignmentKey, ShiftId};

/// Error types for scheduling runs
///
/// Everything except `Timeout` indicates a construction bug or a failing
/// backend, not a scheduling outcome. Infeasibility is never an error: the
/// enumerator reports it as the natural end of its sequence.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("No decision variable for {0}")]
    MissingVariable(AssignmentKey),

    #[error("Decision variable for {0} registered twice")]
    DuplicateVariable(AssignmentKey),

    #[error("Covering sets of shift {shift} share the key '{key}'")]
    CoverKeyCollision { shift: ShiftId, key: String },

    #[error("Shift {shift} overlaps {count} shifts, more than the limit of {limit}")]
    CoverFanOutExceeded {
        shift: ShiftId,
        count: usize,
        limit: usize,
    },

    #[error("Shift {0} must start before it ends")]
    InvalidShiftInterval(ShiftId),

    #[error("Solver assigned nobody to shift {0}")]
    UnassignedShift(ShiftId),

    #[error("Solver assigned more than one employee to shift {0}")]
    DoubleAssignedShift(ShiftId),

    #[error("Solver exceeded its time budget of {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
