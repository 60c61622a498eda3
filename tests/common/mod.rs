//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shift_scheduler::{
    Employee, EmployeeId, EmployeeStatus, HardConstraintSet, MicroLpSolver, ScheduleSolution,
    SchedulerConfig, SchedulingModel, Shift, ShiftCategory, ShiftId, SolverService,
};

/// An instant in the week of 2024-04-21 (Sunday) .. 2024-04-27
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight + Duration::hours(hour as i64) + Duration::minutes(minute as i64))
        .expect("valid fixture date")
}

/// A shift on `day` from `start` to `end` hours; `end` past 24 runs into the next day
pub fn shift(id: &str, category: ShiftCategory, day: u32, start: u32, end: u32) -> Shift {
    Shift::new(id, category, at(day, start, 0), at(day, end, 0)).expect("valid fixture shift")
}

pub fn shift_hm(
    id: &str,
    category: ShiftCategory,
    day: u32,
    (start_h, start_m): (u32, u32),
    (end_h, end_m): (u32, u32),
) -> Shift {
    Shift::new(id, category, at(day, start_h, start_m), at(day, end_h, end_m))
        .expect("valid fixture shift")
}

pub fn senior(id: &str) -> Employee {
    Employee::new(id, id).trained_for_all()
}

pub fn newcomer(id: &str) -> Employee {
    Employee::new(id, id)
        .with_status(EmployeeStatus::New)
        .trained_for_all()
}

pub fn only(rules: HardConstraintSet) -> SchedulerConfig {
    SchedulerConfig::default()
        .with_rules(rules)
        .with_time_limit_seconds(120)
}

pub fn solver() -> Arc<dyn SolverService> {
    Arc::new(MicroLpSolver::new())
}

/// First schedule of a fresh enumeration, `None` when infeasible
pub fn first_schedule(
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    config: &SchedulerConfig,
) -> Option<ScheduleSolution> {
    let model = SchedulingModel::build(employees, shifts, config).expect("model builds");
    model
        .enumerate(solver())
        .next()
        .map(|result| result.expect("solve succeeds"))
}

pub fn assignee<'a>(schedule: &'a ScheduleSolution, shift: &str) -> &'a str {
    schedule
        .assignee(&ShiftId::from(shift))
        .map(EmployeeId::as_str)
        .expect("every shift is assigned")
}
