// Infrastructure layer: External concerns (configuration files, logging)

pub mod config;
pub mod logging;

pub use config::{ConfigError, HardConstraintSet, ObjectiveWeights, PositionTargets, SchedulerConfig};
pub use logging::init_tracing;
