//! Configuration for scheduling runs.
//!
//! Load the rule set, objective weights and solver budget from TOML so a
//! venue can tune its schedules without code changes.
//!
//! # Examples
//!
//! ```
//! use shift_scheduler::SchedulerConfig;
//! use std::time::Duration;
//!
//! let config = SchedulerConfig::from_toml_str(r#"
//!     max_working_days = 5
//!     time_limit_seconds = 30
//!
//!     [positions]
//!     part_timer = 2
//!
//!     [rules]
//!     at_most_one_shift_per_day = false
//! "#).unwrap();
//!
//! assert_eq!(config.max_working_days, 5);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.positions.full_timer, 5);
//! assert!(!config.rules.at_most_one_shift_per_day);
//! assert!(config.rules.no_overlap);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Position, SolverBackend};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main scheduler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Statutory cap on shifts per employee per week.
    pub max_working_days: usize,

    /// Minimum gap between the end of a closing shift and the next shift.
    pub min_rest_after_closing_hours: u32,

    /// Largest number of parallel shifts explored when looking for covers.
    pub max_cover_fan_out: usize,

    /// Number of distinct schedules a caller asks for by default.
    pub solutions_to_generate: usize,

    /// Budget of a single solver call.
    pub time_limit_seconds: Option<u64>,

    pub backend: SolverBackend,

    pub positions: PositionTargets,

    pub weights: ObjectiveWeights,

    pub rules: HardConstraintSet,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_working_days: 6,
            min_rest_after_closing_hours: 10,
            max_cover_fan_out: 10,
            solutions_to_generate: 5,
            time_limit_seconds: None,
            backend: SolverBackend::default(),
            positions: PositionTargets::default(),
            weights: ObjectiveWeights::default(),
            rules: HardConstraintSet::default(),
        }
    }
}

impl SchedulerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cover_fan_out > MAX_COVER_FAN_OUT {
            return Err(ConfigError::Invalid(format!(
                "max_cover_fan_out {} exceeds {}",
                self.max_cover_fan_out, MAX_COVER_FAN_OUT
            )));
        }
        if self.positions.full_timer < 0 || self.positions.part_timer < 0 {
            return Err(ConfigError::Invalid(
                "position targets must not be negative".to_string(),
            ));
        }
        self.weights.validate()
    }

    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn with_max_working_days(mut self, days: usize) -> Self {
        self.max_working_days = days;
        self
    }

    pub fn with_min_rest_after_closing_hours(mut self, hours: u32) -> Self {
        self.min_rest_after_closing_hours = hours;
        self
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_positions(mut self, positions: PositionTargets) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_rules(mut self, rules: HardConstraintSet) -> Self {
        self.rules = rules;
        self
    }

    /// Returns the per-solve time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds.map(Duration::from_secs)
    }

    pub fn min_rest_after_closing(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.min_rest_after_closing_hours))
    }
}

/// Bitmask enumeration of covers is capped here.
const MAX_COVER_FAN_OUT: usize = 20;

/// Weekly shift target per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PositionTargets {
    pub full_timer: i64,
    pub part_timer: i64,
}

impl Default for PositionTargets {
    fn default() -> Self {
        Self {
            full_timer: 5,
            part_timer: 3,
        }
    }
}

impl PositionTargets {
    pub fn target(&self, position: Position) -> i64 {
        match position {
            Position::FullTimer => self.full_timer,
            Position::PartTimer => self.part_timer,
        }
    }
}

/// Relative weights of the objective terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ObjectiveWeights {
    /// Per priority rank, per wanted or unwanted shift.
    pub preference: i64,
    /// Per shift of deviation from the position target.
    pub fairness: i64,
    /// Per shift on the busiest employee of a balanced category.
    pub balance: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            preference: 100,
            fairness: 1,
            balance: 1,
        }
    }
}

impl ObjectiveWeights {
    /// Preferences must dominate fairness and balancing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preference < 0 || self.fairness < 0 || self.balance < 0 {
            return Err(ConfigError::Invalid(
                "objective weights must not be negative".to_string(),
            ));
        }
        if self.preference <= self.fairness || self.preference <= self.balance {
            return Err(ConfigError::Invalid(format!(
                "preference weight ({}) must exceed fairness ({}) and balance ({}) weights",
                self.preference, self.fairness, self.balance
            )));
        }
        Ok(())
    }
}

/// Which hard rules `SchedulingModel::build` applies.
///
/// Exactly-one-assignee is not listed: it is always applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HardConstraintSet {
    pub at_most_one_shift_per_day: bool,
    pub max_working_days: bool,
    pub min_rest_after_closing: bool,
    pub no_overlap: bool,
    pub trained_categories_only: bool,
    pub cannot_work: bool,
    pub new_employee_pairing_safety: bool,
}

impl Default for HardConstraintSet {
    fn default() -> Self {
        Self::all()
    }
}

impl HardConstraintSet {
    pub fn all() -> Self {
        Self {
            at_most_one_shift_per_day: true,
            max_working_days: true,
            min_rest_after_closing: true,
            no_overlap: true,
            trained_categories_only: true,
            cannot_work: true,
            new_employee_pairing_safety: true,
        }
    }

    /// Only exactly-one-assignee remains
    pub fn none() -> Self {
        Self {
            at_most_one_shift_per_day: false,
            max_working_days: false,
            min_rest_after_closing: false,
            no_overlap: false,
            trained_categories_only: false,
            cannot_work: false,
            new_employee_pairing_safety: false,
        }
    }
}
