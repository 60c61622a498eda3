//! New employees only work shifts whose time window is fully covered by
//! experienced colleagues on parallel shifts.

mod common;

use common::{assignee, first_schedule, newcomer, only, senior, shift};
use shift_scheduler::{HardConstraintSet, SchedulerConfig, ShiftCategory};

fn pairing_rules() -> SchedulerConfig {
    only(HardConstraintSet {
        no_overlap: true,
        new_employee_pairing_safety: true,
        ..HardConstraintSet::none()
    })
}

#[test]
fn senior_takes_the_shifts_nobody_can_cover() {
    //  |main   |
    //  |support1        |
    //  |support2                  |
    //          |support3                   |
    let shifts = vec![
        shift("main", ShiftCategory::Morning, 22, 9, 13),
        shift("support1", ShiftCategory::Evening, 22, 9, 17),
        shift("support2", ShiftCategory::Evening, 22, 9, 21),
        shift("support3", ShiftCategory::Closing, 22, 13, 25),
    ];
    let employees = vec![senior("senior"), newcomer("new1"), newcomer("new2")];

    let schedule = first_schedule(employees, shifts, &pairing_rules()).expect("feasible");

    assert_eq!(assignee(&schedule, "main"), "senior");
    assert_eq!(assignee(&schedule, "support3"), "senior");
    assert_ne!(assignee(&schedule, "support1"), "senior");
    assert_ne!(assignee(&schedule, "support2"), "senior");
}

#[test]
fn newcomers_alone_cannot_staff_parallel_shifts() {
    //  |main   |
    //  |support        |
    let shifts = vec![
        shift("main", ShiftCategory::Evening, 22, 9, 13),
        shift("support", ShiftCategory::Closing, 22, 9, 17),
    ];
    let employees = vec![newcomer("new1"), newcomer("new2")];

    assert!(first_schedule(employees, shifts, &pairing_rules()).is_none());
}

#[test]
fn newcomer_between_two_senior_shifts() {
    //        |main     |
    //  |shift1    |shift2     |
    let shifts = vec![
        shift("shift1", ShiftCategory::Closing, 22, 10, 14),
        shift("shift2", ShiftCategory::Closing, 22, 14, 18),
        shift("main", ShiftCategory::Evening, 22, 12, 16),
    ];
    let employees = vec![newcomer("new1"), senior("senior")];

    let schedule = first_schedule(employees, shifts, &pairing_rules()).expect("feasible");

    assert_eq!(assignee(&schedule, "main"), "new1");
    assert_eq!(assignee(&schedule, "shift1"), "senior");
    assert_eq!(assignee(&schedule, "shift2"), "senior");
}

#[test]
fn newcomer_takes_the_covered_shift() {
    let shifts = vec![
        shift("main", ShiftCategory::Evening, 22, 9, 13),
        shift("support", ShiftCategory::Closing, 22, 9, 17),
    ];
    let employees = vec![senior("senior"), newcomer("new1")];

    let schedule = first_schedule(employees, shifts, &pairing_rules()).expect("feasible");

    assert_eq!(assignee(&schedule, "main"), "new1");
    assert_eq!(assignee(&schedule, "support"), "senior");
}

#[test]
fn lone_shift_is_never_given_to_a_newcomer() {
    let shifts = vec![shift("solo", ShiftCategory::Morning, 22, 9, 13)];

    assert!(first_schedule(vec![newcomer("new1")], shifts.clone(), &pairing_rules()).is_none());

    let schedule = first_schedule(
        vec![newcomer("new1"), senior("senior")],
        shifts,
        &pairing_rules(),
    )
    .expect("feasible");
    assert_eq!(assignee(&schedule, "solo"), "senior");
}
