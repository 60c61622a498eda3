// Post-hoc shift swaps between two employees, re-checked against the hard rules

use std::sync::Arc;

use tracing::{debug, info};

use super::enumerator::read_schedule;
use super::scheduling::SchedulingModel;
use crate::domain::{
    EmployeeId, LinearExpr, ScheduleSolution, SchedulingError, ShiftId, SolveStatus, SolverService,
};

/// Exchange of two assigned shifts between two employees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub first_employee: EmployeeId,
    pub first_shift: ShiftId,
    pub second_employee: EmployeeId,
    pub second_shift: ShiftId,
}

impl SwapRequest {
    pub fn new(
        first_employee: impl Into<EmployeeId>,
        first_shift: impl Into<ShiftId>,
        second_employee: impl Into<EmployeeId>,
        second_shift: impl Into<ShiftId>,
    ) -> Self {
        Self {
            first_employee: first_employee.into(),
            first_shift: first_shift.into(),
            second_employee: second_employee.into(),
            second_shift: second_shift.into(),
        }
    }

    fn check_against(&self, solution: &ScheduleSolution) -> Result<(), SwapFailure> {
        if self.first_employee == self.second_employee {
            return Err(SwapFailure::InvalidRequest(format!(
                "cannot swap shifts of {} with themselves",
                self.first_employee
            )));
        }
        if self.first_shift == self.second_shift {
            return Err(SwapFailure::InvalidRequest(format!(
                "cannot swap shift {} with itself",
                self.first_shift
            )));
        }
        for (employee, shift) in [
            (&self.first_employee, &self.first_shift),
            (&self.second_employee, &self.second_shift),
        ] {
            if !solution.is_assigned(employee, shift) {
                return Err(SwapFailure::InvalidRequest(format!(
                    "{} does not work shift {}",
                    employee, shift
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SwapFailure {
    #[error("Invalid swap request: {0}")]
    InvalidRequest(String),

    #[error("Swap violates the scheduling rules")]
    Infeasible,

    #[error("Swap validation exceeded its time budget")]
    Timeout,

    #[error(transparent)]
    Model(#[from] SchedulingError),
}

/// Re-solves the base model with every assignment of `solution` fixed
/// except the four touched by the swap, which are forced to their swapped
/// values.
///
/// The base model carries no enumeration no-goods, so a swap onto a
/// schedule seen before is still accepted.
pub fn validate_swap(
    scheduling: &SchedulingModel,
    solution: &ScheduleSolution,
    request: &SwapRequest,
    solver: Arc<dyn SolverService>,
) -> Result<ScheduleSolution, SwapFailure> {
    request.check_against(solution)?;
    let vars = scheduling.variables();

    let swapped = [
        (&request.first_employee, &request.second_shift, 1),
        (&request.second_employee, &request.first_shift, 1),
        (&request.first_employee, &request.first_shift, 0),
        (&request.second_employee, &request.second_shift, 0),
    ];

    let mut model = scheduling.constraint_model().clone();
    for (key, var) in vars.iter() {
        let forced = swapped
            .iter()
            .find(|(employee, shift, _)| **employee == key.employee && **shift == key.shift)
            .map(|&(_, _, value)| value);
        let value = forced.unwrap_or_else(|| i64::from(solution.is_assigned(&key.employee, &key.shift)));

        let mut fixed = LinearExpr::new();
        fixed.add_bool(var, 1);
        model.add_equality(fixed, value);
    }

    debug!(
        event = "swap_solve",
        solver = solver.name(),
        first = %request.first_employee,
        second = %request.second_employee,
    );
    let response = solver
        .solve(&model, scheduling.time_limit())
        .map_err(SchedulingError::from)?;

    match response.status {
        SolveStatus::Optimal | SolveStatus::Feasible => {
            let swapped = read_schedule(vars, &response, scheduling.employees(), scheduling.shifts())?
                .with_objective_value(response.objective_value);
            info!(
                event = "swap_accepted",
                first_shift = %request.first_shift,
                second_shift = %request.second_shift,
            );
            Ok(swapped)
        }
        SolveStatus::Infeasible => {
            info!(
                event = "swap_rejected",
                first_shift = %request.first_shift,
                second_shift = %request.second_shift,
            );
            Err(SwapFailure::Infeasible)
        }
        SolveStatus::Timeout => Err(SwapFailure::Timeout),
    }
}
