//! Interval analysis over shifts.
//!
//! Shifts are half-open intervals: two shifts that merely touch (one ends at
//! the instant the other starts) do not overlap. A set of shifts *covers* a
//! target when, laid out by start time, the members form a gap-free chain
//! from no later than the target's start to no earlier than its end.

use std::collections::{BTreeSet, HashMap};

use crate::domain::errors::Result;
use crate::domain::{SchedulingError, Shift, ShiftId};

pub fn overlaps(a: &Shift, b: &Shift) -> bool {
    a.start() < b.end() && a.end() > b.start()
}

/// Every shift other than `target` that overlaps it, in input order
pub fn parallel_shifts_of<'a>(target: &Shift, shifts: &'a [Shift]) -> Vec<&'a Shift> {
    shifts
        .iter()
        .filter(|s| s.id() != target.id() && overlaps(target, s))
        .collect()
}

/// Every ordering of every non-empty subset of `shifts`.
///
/// The result grows factorially; callers are expected to bound the input.
pub fn ordered_subsets<'a>(shifts: &[&'a Shift]) -> Vec<Vec<&'a Shift>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(shifts.len());
    let mut used = vec![false; shifts.len()];
    extend_ordered(shifts, &mut used, &mut current, &mut result);
    result
}

fn extend_ordered<'a>(
    shifts: &[&'a Shift],
    used: &mut [bool],
    current: &mut Vec<&'a Shift>,
    result: &mut Vec<Vec<&'a Shift>>,
) {
    for i in 0..shifts.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(shifts[i]);
        result.push(current.clone());
        extend_ordered(shifts, used, current, result);
        current.pop();
        used[i] = false;
    }
}

/// Whether `ordered`, taken in the given order, chains across `target`
pub fn is_fully_covering(target: &Shift, ordered: &[&Shift]) -> bool {
    let Some(first) = ordered.first() else {
        return false;
    };
    if first.start() > target.start() {
        return false;
    }

    let mut chain_end = first.end();
    for next in &ordered[1..] {
        if next.start() > chain_end {
            return false;
        }
        chain_end = chain_end.max(next.end());
    }

    chain_end >= target.end()
}

/// A minimal set of shifts jointly covering a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveringSet {
    members: BTreeSet<ShiftId>,
}

impl CoveringSet {
    pub fn members(&self) -> &BTreeSet<ShiftId> {
        &self.members
    }

    pub fn contains(&self, shift: &ShiftId) -> bool {
        self.members.contains(shift)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sorted member ids joined by `+`
    pub fn key(&self) -> String {
        self.members
            .iter()
            .map(ShiftId::as_str)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Widest parallel-shift set the `u32` subset masks can enumerate
const MAX_MASK_WIDTH: usize = u32::BITS as usize - 1;

/// All minimal sets of parallel shifts that cover `target`.
///
/// Candidate sets are tried in increasing size and any superset of a set
/// already kept is skipped, so no returned set contains another. Fails with
/// `CoverFanOutExceeded` when `target` overlaps more than `max_fan_out`
/// shifts, or more than 31 whatever the configured limit.
pub fn minimal_covering_sets(
    target: &Shift,
    shifts: &[Shift],
    max_fan_out: usize,
) -> Result<Vec<CoveringSet>> {
    let mut parallel = parallel_shifts_of(target, shifts);
    let limit = max_fan_out.min(MAX_MASK_WIDTH);
    if parallel.len() > limit {
        return Err(SchedulingError::CoverFanOutExceeded {
            shift: target.id().clone(),
            count: parallel.len(),
            limit,
        });
    }
    parallel.sort_by_key(|s| (s.start(), s.end()));

    let n = parallel.len();
    let mut masks: Vec<u32> = (1..(1u32 << n)).collect();
    masks.sort_by_key(|m| (m.count_ones(), *m));

    let mut kept: Vec<u32> = Vec::new();
    for mask in masks {
        if kept.iter().any(|&k| k & mask == k) {
            continue;
        }
        let chain: Vec<&Shift> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| parallel[i])
            .collect();
        if is_fully_covering(target, &chain) {
            kept.push(mask);
        }
    }

    let mut seen: HashMap<String, BTreeSet<ShiftId>> = HashMap::new();
    let mut covers = Vec::with_capacity(kept.len());
    for mask in kept {
        let members: BTreeSet<ShiftId> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| parallel[i].id().clone())
            .collect();
        let cover = CoveringSet { members };
        let key = cover.key();
        if seen.insert(key.clone(), cover.members.clone()).is_some() {
            return Err(SchedulingError::CoverKeyCollision {
                shift: target.id().clone(),
                key,
            });
        }
        covers.push(cover);
    }

    Ok(covers)
}

/// Maximal groups of mutually overlapping shifts, with at least two members.
///
/// For intervals, every maximal clique contains the latest-starting shift
/// among its members at that shift's start instant, so sweeping over the
/// distinct start instants finds all of them.
pub fn overlap_groups(shifts: &[Shift]) -> Vec<Vec<&Shift>> {
    let starts: BTreeSet<_> = shifts.iter().map(Shift::start).collect();

    let mut groups: Vec<BTreeSet<usize>> = Vec::new();
    for instant in starts {
        let active: BTreeSet<usize> = shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| s.start() <= instant && instant < s.end())
            .map(|(i, _)| i)
            .collect();
        if active.len() < 2 || groups.iter().any(|g| g.is_superset(&active)) {
            continue;
        }
        groups.retain(|g| !active.is_superset(g));
        groups.push(active);
    }

    groups
        .into_iter()
        .map(|group| group.into_iter().map(|i| &shifts[i]).collect())
        .collect()
}
