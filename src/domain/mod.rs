// Domain module: Scheduling models, the constraint vocabulary and the solver contract

pub mod constraint_model;
pub mod errors;
pub mod models;
pub mod preferences;
pub mod solver_service;
pub mod value_objects;

pub use constraint_model::*;
pub use errors::SchedulingError;
pub use models::*;
pub use preferences::*;
pub use solver_service::{SolveResponse, SolverError, SolverService};
pub use value_objects::*;
