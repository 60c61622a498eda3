//! Soft goals: preferences scaled by priority, position targets and balance.

mod common;

use common::{assignee, first_schedule, only, senior, shift};
use shift_scheduler::{
    EmployeeId, HardConstraintSet, ObjectiveWeights, Position, PositionTargets, PreferenceRule,
    Priority, ShiftCategory, ShiftPreferences,
};

fn exactly_one_only() -> shift_scheduler::SchedulerConfig {
    only(HardConstraintSet::none())
}

#[test]
fn position_targets_are_met_when_shifts_match() {
    let config = exactly_one_only().with_positions(PositionTargets {
        full_timer: 3,
        part_timer: 1,
    });
    let employees = vec![
        senior("full"),
        senior("part").with_position(Position::PartTimer),
    ];
    let shifts = vec![
        shift("mon", ShiftCategory::Morning, 22, 9, 16),
        shift("tue", ShiftCategory::Morning, 23, 9, 16),
        shift("wed", ShiftCategory::Morning, 24, 9, 16),
        shift("thu", ShiftCategory::Morning, 25, 9, 16),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    assert_eq!(schedule.shift_count(&EmployeeId::from("full")), 3);
    assert_eq!(schedule.shift_count(&EmployeeId::from("part")), 1);
}

#[test]
fn highest_priority_gets_contested_shift() {
    let config = exactly_one_only().with_positions(PositionTargets {
        full_timer: 1,
        part_timer: 1,
    });
    let wants_monday = ShiftPreferences::new().with_wants_to_work(PreferenceRule::shift_ids(["mon"]));
    let employees = vec![
        senior("low")
            .with_priority(Priority::Low)
            .with_preferences(wants_monday.clone()),
        senior("top")
            .with_priority(Priority::Highest)
            .with_preferences(wants_monday),
    ];
    let shifts = vec![
        shift("mon", ShiftCategory::Morning, 22, 9, 16),
        shift("tue", ShiftCategory::Morning, 23, 9, 16),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    assert_eq!(assignee(&schedule, "mon"), "top");
    assert_eq!(assignee(&schedule, "tue"), "low");
}

#[test]
fn preference_outweighs_fairness() {
    let config = exactly_one_only().with_positions(PositionTargets {
        full_timer: 1,
        part_timer: 1,
    });
    let employees = vec![
        senior("eager").with_preferences(
            ShiftPreferences::new().with_wants_to_work(PreferenceRule::shift_ids(["mon", "tue"])),
        ),
        senior("idle"),
    ];
    let shifts = vec![
        shift("mon", ShiftCategory::Morning, 22, 9, 16),
        shift("tue", ShiftCategory::Morning, 23, 9, 16),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    assert_eq!(schedule.shift_count(&EmployeeId::from("eager")), 2);
}

#[test]
fn unwanted_shift_goes_to_someone_else() {
    let config = exactly_one_only().with_positions(PositionTargets {
        full_timer: 1,
        part_timer: 1,
    });
    let employees = vec![
        senior("picky").with_preferences(
            ShiftPreferences::new().with_prefer_not_to_work(PreferenceRule::shift_ids(["mon"])),
        ),
        senior("easy"),
    ];
    let shifts = vec![
        shift("mon", ShiftCategory::Morning, 22, 9, 16),
        shift("tue", ShiftCategory::Morning, 23, 9, 16),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    assert_eq!(assignee(&schedule, "mon"), "easy");
    assert_eq!(assignee(&schedule, "tue"), "picky");
}

#[test]
fn closing_shifts_are_balanced() {
    let config = exactly_one_only().with_weights(ObjectiveWeights {
        preference: 100,
        fairness: 0,
        balance: 1,
    });
    let employees = vec![senior("a"), senior("b")];
    let shifts = vec![
        shift("sun_closing", ShiftCategory::Closing, 21, 20, 26),
        shift("mon_closing", ShiftCategory::Closing, 22, 20, 26),
        shift("tue_closing", ShiftCategory::Closing, 23, 20, 26),
        shift("wed_closing", ShiftCategory::Closing, 24, 20, 26),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    assert_eq!(schedule.closing_count(&EmployeeId::from("a")), 2);
    assert_eq!(schedule.closing_count(&EmployeeId::from("b")), 2);
}

#[test]
fn stand_by_shifts_are_balanced() {
    let config = exactly_one_only().with_weights(ObjectiveWeights {
        preference: 100,
        fairness: 0,
        balance: 1,
    });
    let employees = vec![senior("a"), senior("b"), senior("c")];
    let shifts = vec![
        shift("sb1", ShiftCategory::StandBy, 21, 9, 17),
        shift("sb2", ShiftCategory::StandBy, 22, 9, 17),
        shift("sb3", ShiftCategory::StandBy, 23, 9, 17),
    ];

    let schedule = first_schedule(employees, shifts, &config).expect("feasible");

    for id in ["a", "b", "c"] {
        assert_eq!(schedule.stand_by_count(&EmployeeId::from(id)), 1);
    }
}
