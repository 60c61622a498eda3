/// Property tests for the interval analysis behind the overlap and
/// new-employee rules.
///
/// Shifts are generated on a quarter-hour grid over two days, lasting between
/// fifteen minutes and twelve hours.
use proptest::prelude::*;
use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shift_scheduler::application::overlap::{
    is_fully_covering, minimal_covering_sets, overlap_groups, overlaps, parallel_shifts_of,
};
use shift_scheduler::{Shift, ShiftCategory};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 22)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base date")
}

/// (start quarter, length in quarters)
fn arb_window() -> impl Strategy<Value = (i64, i64)> {
    (0i64..192, 1i64..=48)
}

fn to_shifts(windows: &[(i64, i64)]) -> Vec<Shift> {
    windows
        .iter()
        .enumerate()
        .map(|(i, &(start, len))| {
            let start_at = base() + Duration::minutes(start * 15);
            let end_at = start_at + Duration::minutes(len * 15);
            Shift::new(format!("s{:02}", i), ShiftCategory::Evening, start_at, end_at)
                .expect("generated shifts are non-empty")
        })
        .collect()
}

fn sorted_chain<'a>(shifts: &'a [Shift], ids: &BTreeSet<&str>) -> Vec<&'a Shift> {
    let mut chain: Vec<&Shift> = shifts
        .iter()
        .filter(|s| ids.contains(s.id().as_str()))
        .collect();
    chain.sort_by_key(|s| (s.start(), s.end()));
    chain
}

proptest! {
    #[test]
    fn overlap_is_symmetric(windows in prop::collection::vec(arb_window(), 2..=2)) {
        let shifts = to_shifts(&windows);
        prop_assert_eq!(overlaps(&shifts[0], &shifts[1]), overlaps(&shifts[1], &shifts[0]));
    }

    #[test]
    fn shift_never_parallels_itself(windows in prop::collection::vec(arb_window(), 1..8)) {
        let shifts = to_shifts(&windows);
        for shift in &shifts {
            prop_assert!(parallel_shifts_of(shift, &shifts).iter().all(|p| p.id() != shift.id()));
        }
    }

    #[test]
    fn covers_are_valid_and_minimal(windows in prop::collection::vec(arb_window(), 1..8)) {
        let shifts = to_shifts(&windows);
        let target = &shifts[0];
        let covers = minimal_covering_sets(target, &shifts, 10).expect("fan-out within bound");

        for cover in &covers {
            let ids: BTreeSet<&str> = cover.members().iter().map(|id| id.as_str()).collect();
            prop_assert!(!ids.contains(target.id().as_str()));
            prop_assert!(is_fully_covering(target, &sorted_chain(&shifts, &ids)));

            for dropped in &ids {
                let mut smaller = ids.clone();
                smaller.remove(dropped);
                prop_assert!(
                    !is_fully_covering(target, &sorted_chain(&shifts, &smaller)),
                    "{} is not minimal",
                    cover.key()
                );
            }
        }

        for (i, a) in covers.iter().enumerate() {
            for b in &covers[i + 1..] {
                prop_assert!(!a.members().is_subset(b.members()));
                prop_assert!(!b.members().is_subset(a.members()));
            }
        }
    }

    #[test]
    fn groups_are_cliques_covering_every_overlap(
        windows in prop::collection::vec(arb_window(), 1..10)
    ) {
        let shifts = to_shifts(&windows);
        let groups = overlap_groups(&shifts);

        for group in &groups {
            prop_assert!(group.len() >= 2);
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    prop_assert!(overlaps(a, b));
                }
            }
        }

        for (i, a) in shifts.iter().enumerate() {
            for b in &shifts[i + 1..] {
                if overlaps(a, b) {
                    let together = groups.iter().any(|g| {
                        g.iter().any(|s| s.id() == a.id()) && g.iter().any(|s| s.id() == b.id())
                    });
                    prop_assert!(together, "{} and {} share no group", a.id(), b.id());
                }
            }
        }
    }
}
