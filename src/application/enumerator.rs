//! Enumeration of pairwise-distinct schedules.
//!
//! Each solve that finds a schedule appends a no-good clause to the
//! enumerator's private copy of the model: at least one decision variable
//! must take a value different from the one it just had. Successive
//! schedules are therefore distinct, and infeasibility marks the end of the
//! sequence.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::variables::VariableMap;
use crate::domain::errors::Result;
use crate::domain::{
    ConstraintModel, Employee, EmployeeId, Literal, ScheduleSolution, SchedulingError, Shift,
    ShiftId, SolveResponse, SolveStatus, SolverService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorState {
    /// No solve attempted yet
    Ready,
    /// At least one schedule found; more may exist
    Solved,
    /// The remaining model is infeasible
    Exhausted,
    /// A solve failed with an error; the sequence ends there
    Failed,
}

/// Outcome of one `advance` call
#[derive(Debug, Clone)]
pub enum Step {
    Schedule(ScheduleSolution),
    /// The budget ran out; state is unchanged and the call may be retried
    TimedOut,
    Exhausted,
}

pub struct ScheduleEnumerator {
    model: ConstraintModel,
    vars: VariableMap,
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    solver: Arc<dyn SolverService>,
    time_limit: Option<Duration>,
    state: EnumeratorState,
    exclusions: usize,
    found: usize,
}

impl ScheduleEnumerator {
    pub fn new(
        model: ConstraintModel,
        vars: VariableMap,
        employees: Vec<Employee>,
        shifts: Vec<Shift>,
        solver: Arc<dyn SolverService>,
    ) -> Self {
        Self {
            model,
            vars,
            employees,
            shifts,
            solver,
            time_limit: None,
            state: EnumeratorState::Ready,
            exclusions: 0,
            found: 0,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn state(&self) -> EnumeratorState {
        self.state
    }

    /// Number of no-good clauses appended so far
    pub fn exclusions(&self) -> usize {
        self.exclusions
    }

    /// Solves once more, excluding every schedule returned before.
    ///
    /// An error moves the enumerator to `Failed`. Once exhausted or failed,
    /// no further solver calls are made.
    pub fn advance(&mut self) -> Result<Step> {
        if matches!(self.state, EnumeratorState::Exhausted | EnumeratorState::Failed) {
            return Ok(Step::Exhausted);
        }

        let step = self.solve_once();
        if let Err(e) = &step {
            warn!(event = "enumeration_failed", schedules = self.found, error = %e);
            self.state = EnumeratorState::Failed;
        }
        step
    }

    fn solve_once(&mut self) -> Result<Step> {
        debug!(
            event = "enumeration_solve",
            solver = self.solver.name(),
            exclusions = self.exclusions,
        );
        let response = self.solver.solve(&self.model, self.time_limit)?;

        match response.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {
                let solution = self.read_solution(&response)?;
                self.exclude(&response)?;
                self.found += 1;
                self.state = EnumeratorState::Solved;
                info!(
                    event = "schedule_found",
                    ordinal = self.found,
                    status = %response.status,
                    objective = response.objective_value.unwrap_or_default(),
                    solve_time_ms = response.solve_time_ms,
                );
                Ok(Step::Schedule(solution.with_ordinal(self.found)))
            }
            SolveStatus::Infeasible => {
                self.state = EnumeratorState::Exhausted;
                info!(event = "enumeration_exhausted", schedules = self.found);
                Ok(Step::Exhausted)
            }
            SolveStatus::Timeout => {
                warn!(event = "enumeration_timeout", schedules = self.found);
                Ok(Step::TimedOut)
            }
        }
    }

    fn read_solution(&self, response: &SolveResponse) -> Result<ScheduleSolution> {
        read_schedule(&self.vars, response, &self.employees, &self.shifts)
            .map(|solution| solution.with_objective_value(response.objective_value))
    }

    fn exclude(&mut self, response: &SolveResponse) -> Result<()> {
        let mut differs: Vec<Literal> = Vec::with_capacity(self.vars.len());
        for (key, var) in self.vars.iter() {
            match response.value_of(var) {
                Some(true) => differs.push(var.not()),
                Some(false) => differs.push(var.into()),
                None => return Err(SchedulingError::MissingVariable(key)),
            }
        }
        self.model.add_bool_or(differs);
        self.exclusions += 1;
        Ok(())
    }
}

impl Iterator for ScheduleEnumerator {
    type Item = Result<ScheduleSolution>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Step::Schedule(solution)) => Some(Ok(solution)),
            Ok(Step::TimedOut) => Some(Err(SchedulingError::Timeout(
                self.time_limit.unwrap_or_default(),
            ))),
            Ok(Step::Exhausted) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Reads the assignment decisions of a solved model into a schedule.
///
/// Fails unless every shift has exactly one assignee.
pub(crate) fn read_schedule(
    vars: &VariableMap,
    response: &SolveResponse,
    employees: &[Employee],
    shifts: &[Shift],
) -> Result<ScheduleSolution> {
    let mut assignments: BTreeMap<ShiftId, EmployeeId> = BTreeMap::new();
    for (key, var) in vars.iter() {
        match response.value_of(var) {
            Some(true) => {
                if assignments.insert(key.shift.clone(), key.employee).is_some() {
                    return Err(SchedulingError::DoubleAssignedShift(key.shift));
                }
            }
            Some(false) => {}
            None => return Err(SchedulingError::MissingVariable(key)),
        }
    }

    if let Some(shift) = shifts.iter().find(|s| !assignments.contains_key(s.id())) {
        return Err(SchedulingError::UnassignedShift(shift.id().clone()));
    }

    Ok(ScheduleSolution::from_assignments(assignments, employees, shifts))
}
