// Domain layer: Scheduling models, constraint vocabulary and the solver contract
pub mod domain;

// Application layer: Rule encoding, schedule enumeration and swap validation
pub mod application;

// Infrastructure layer: External concerns (configuration, logging)
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Employee, EmployeeId, EmployeeStatus, Position, PreferenceRule, Priority, ScheduleSolution,
    SchedulingError, Shift, ShiftCategory, ShiftId, ShiftPreferences, SolveResponse, SolveStatus,
    SolverBackend, SolverError, SolverService,
};

pub use application::{
    EnumeratorState, ScheduleEnumerator, SchedulingModel, Step, SwapFailure, SwapRequest,
};

pub use infrastructure::{
    init_tracing, ConfigError, HardConstraintSet, ObjectiveWeights, PositionTargets,
    SchedulerConfig,
};

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::{MicroLpSolver, SolverFactory};
