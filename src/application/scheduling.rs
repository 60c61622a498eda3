//! Entry point of a scheduling run.
//!
//! [`SchedulingModel::build`] encodes a week's employees and shifts once;
//! the resulting base model is then used both to enumerate schedules and to
//! validate swaps on any of them.
//!
//! ```no_run
//! use shift_scheduler::{Employee, SchedulerConfig, SchedulingModel, SolverFactory};
//! # fn shifts() -> Vec<shift_scheduler::Shift> { Vec::new() }
//!
//! let config = SchedulerConfig::default();
//! let employees = vec![Employee::new("e1", "Dana").trained_for_all()];
//! let model = SchedulingModel::build(employees, shifts(), &config)?;
//!
//! let solver = SolverFactory::create_solver(&config)?;
//! for schedule in model.enumerate(solver).take(config.solutions_to_generate) {
//!     println!("{:?}", schedule?.assignments());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use super::enumerator::ScheduleEnumerator;
use super::hard_constraints::{
    add_at_most_one_shift_per_day, add_cannot_work, add_exactly_one_assignee,
    add_max_working_days, add_min_rest_after_closing, add_new_employee_pairing_safety,
    add_no_overlap, add_trained_categories_only,
};
use super::objective::add_objective;
use super::swap::{validate_swap, SwapFailure, SwapRequest};
use super::variables::VariableMap;
use crate::domain::errors::Result;
use crate::domain::{ConstraintModel, Employee, ScheduleSolution, Shift, SolverService};
use crate::infrastructure::config::SchedulerConfig;

/// Fully encoded scheduling problem for one week
#[derive(Debug, Clone)]
pub struct SchedulingModel {
    model: ConstraintModel,
    vars: VariableMap,
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    time_limit: Option<Duration>,
}

impl SchedulingModel {
    /// Builds the decision variables, the configured hard rules and the
    /// objective.
    ///
    /// Fails with `SchedulingError::Config` before encoding anything when
    /// `config` does not validate.
    pub fn build(employees: Vec<Employee>, shifts: Vec<Shift>, config: &SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let start_time = Instant::now();
        let rules = &config.rules;

        let mut model = ConstraintModel::new();
        let vars = VariableMap::build(&mut model, &employees, &shifts)?;

        add_exactly_one_assignee(&mut model, &vars, &employees, &shifts)?;
        if rules.at_most_one_shift_per_day {
            add_at_most_one_shift_per_day(&mut model, &vars, &employees, &shifts)?;
        }
        if rules.max_working_days {
            add_max_working_days(&mut model, &vars, &employees, &shifts, config.max_working_days)?;
        }
        if rules.min_rest_after_closing {
            add_min_rest_after_closing(
                &mut model,
                &vars,
                &employees,
                &shifts,
                config.min_rest_after_closing(),
            )?;
        }
        if rules.no_overlap {
            add_no_overlap(&mut model, &vars, &employees, &shifts)?;
        }
        if rules.trained_categories_only {
            add_trained_categories_only(&mut model, &vars, &employees, &shifts)?;
        }
        if rules.cannot_work {
            add_cannot_work(&mut model, &vars, &employees, &shifts)?;
        }
        if rules.new_employee_pairing_safety {
            add_new_employee_pairing_safety(
                &mut model,
                &vars,
                &employees,
                &shifts,
                config.max_cover_fan_out,
            )?;
        }

        add_objective(
            &mut model,
            &vars,
            &employees,
            &shifts,
            &config.weights,
            &config.positions,
        )?;

        info!(
            event = "model_built",
            employees = employees.len(),
            shifts = shifts.len(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            build_time_ms = start_time.elapsed().as_secs_f64() * 1000.0,
        );

        Ok(Self {
            model,
            vars,
            employees,
            shifts,
            time_limit: config.time_limit(),
        })
    }

    /// Starts a fresh enumeration over a private copy of the base model
    pub fn enumerate(&self, solver: Arc<dyn SolverService>) -> ScheduleEnumerator {
        ScheduleEnumerator::new(
            self.model.clone(),
            self.vars.clone(),
            self.employees.clone(),
            self.shifts.clone(),
            solver,
        )
        .with_time_limit(self.time_limit)
    }

    /// Validates `request` against `solution`; see [`validate_swap`]
    pub fn swap(
        &self,
        solution: &ScheduleSolution,
        request: &SwapRequest,
        solver: Arc<dyn SolverService>,
    ) -> std::result::Result<ScheduleSolution, SwapFailure> {
        validate_swap(self, solution, request, solver)
    }

    pub fn constraint_model(&self) -> &ConstraintModel {
        &self.model
    }

    pub fn variables(&self) -> &VariableMap {
        &self.vars
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}
