//! Hard scheduling rules.
//!
//! Every rule is an independent function that appends constraints to the
//! model. None of them depends on another having run, so callers may apply
//! any subset; `SchedulingModel::build` picks them from a
//! [`HardConstraintSet`](crate::infrastructure::config::HardConstraintSet).

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::overlap::{minimal_covering_sets, overlap_groups};
use super::variables::VariableMap;
use crate::domain::errors::Result;
use crate::domain::{BoolVar, ConstraintModel, Employee, LinearExpr, Literal, Shift, ShiftId};

/// Every shift is worked by exactly one employee.
///
/// With no employees at all this makes the model infeasible.
pub fn add_exactly_one_assignee(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    _employees: &[Employee],
    shifts: &[Shift],
) -> Result<()> {
    for shift in shifts {
        model.add_exactly_one(vars.for_shift(shift.id())?);
    }
    debug!(event = "rule_encoded", rule = "exactly_one_assignee", shifts = shifts.len());
    Ok(())
}

/// No employee works two shifts starting on the same calendar day
pub fn add_at_most_one_shift_per_day(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
) -> Result<()> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ShiftId>> = BTreeMap::new();
    for shift in shifts {
        by_day.entry(shift.start_date()).or_default().push(shift.id());
    }

    for employee in employees {
        for day_shifts in by_day.values().filter(|group| group.len() > 1) {
            let day_vars = day_shifts
                .iter()
                .map(|shift| vars.get(&employee.id, shift))
                .collect::<Result<Vec<_>>>()?;
            model.add_at_most_one(day_vars);
        }
    }
    debug!(event = "rule_encoded", rule = "at_most_one_shift_per_day", days = by_day.len());
    Ok(())
}

/// No employee works more than `max_days` shifts in the week
pub fn add_max_working_days(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    _shifts: &[Shift],
    max_days: usize,
) -> Result<()> {
    for employee in employees {
        let count = LinearExpr::sum(vars.for_employee(&employee.id)?);
        model.add_linear_le(count, max_days as i64);
    }
    debug!(event = "rule_encoded", rule = "max_working_days", max_days);
    Ok(())
}

/// After a closing shift, an employee rests for at least `min_rest`.
///
/// For each employee and closing shift `C` an indicator is tied to the
/// assignment variable and, when set, forbids every other shift starting in
/// `(C.start, C.end + min_rest)`.
pub fn add_min_rest_after_closing(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    min_rest: Duration,
) -> Result<()> {
    let mut encoded = 0usize;
    for closing in shifts.iter().filter(|s| s.category().is_closing()) {
        let rest_until = closing.end() + min_rest;
        let blocked: Vec<&Shift> = shifts
            .iter()
            .filter(|s| s.id() != closing.id())
            .filter(|s| closing.start() < s.start() && s.start() < rest_until)
            .collect();
        if blocked.is_empty() {
            continue;
        }

        for employee in employees {
            let worked = vars.get(&employee.id, closing.id())?;
            let indicator = model.new_bool_var(format!(
                "closed[{:?},{:?}]",
                employee.id.as_str(),
                closing.id().as_str()
            ));
            let mut tie = LinearExpr::new();
            tie.add_bool(indicator, 1).add_bool(worked, -1);
            model.add_equality(tie, 0);

            let forbidden = blocked
                .iter()
                .map(|s| vars.get(&employee.id, s.id()).map(BoolVar::not))
                .collect::<Result<Vec<_>>>()?;
            model.add_bool_and(forbidden).only_enforce_if([indicator]);
            encoded += 1;
        }
    }
    debug!(
        event = "rule_encoded",
        rule = "min_rest_after_closing",
        hours = min_rest.num_hours(),
        indicators = encoded,
    );
    Ok(())
}

/// No employee works two overlapping shifts
pub fn add_no_overlap(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
) -> Result<()> {
    let groups = overlap_groups(shifts);
    for employee in employees {
        for group in &groups {
            let group_vars = group
                .iter()
                .map(|s| vars.get(&employee.id, s.id()))
                .collect::<Result<Vec<_>>>()?;
            model.add_at_most_one(group_vars);
        }
    }
    debug!(event = "rule_encoded", rule = "no_overlap", groups = groups.len());
    Ok(())
}

/// Employees only work shift categories they are trained for
pub fn add_trained_categories_only(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
) -> Result<()> {
    let mut forbidden = 0usize;
    for employee in employees {
        for shift in shifts.iter().filter(|s| !employee.is_trained_for(s.category())) {
            let var = vars.get(&employee.id, shift.id())?;
            model.add_bool_and([var.not()]);
            forbidden += 1;
        }
    }
    debug!(event = "rule_encoded", rule = "trained_categories_only", forbidden);
    Ok(())
}

/// Employees never work shifts they declared they cannot work
pub fn add_cannot_work(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
) -> Result<()> {
    let mut forbidden = 0usize;
    for employee in employees {
        let cannot_work = employee.preferences.cannot_work.resolve(shifts);
        for shift in &cannot_work {
            let var = vars.get(&employee.id, shift)?;
            model.add_bool_and([var.not()]);
            forbidden += 1;
        }
    }
    debug!(event = "rule_encoded", rule = "cannot_work", forbidden);
    Ok(())
}

/// A new employee only works a shift whose whole time window is covered by
/// experienced colleagues on parallel shifts.
///
/// Per shift `T`, `new[T]` holds iff a new employee works `T` and
/// `experienced[T]` iff anyone else does. For each minimal covering set `K`
/// of `T`, `cover[K]` holds iff every member of `K` is staffed by an
/// experienced employee, and `any_cover[T]` iff some `cover[K]` holds. The
/// rule itself is `new[T] ⇒ any_cover[T]`, so a shift without covering sets
/// is never given to a new employee.
pub fn add_new_employee_pairing_safety(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    max_fan_out: usize,
) -> Result<()> {
    if !employees.iter().any(Employee::is_new) {
        debug!(event = "rule_skipped", rule = "new_employee_pairing_safety", reason = "no new employees");
        return Ok(());
    }

    let mut new_on = BTreeMap::new();
    let mut experienced_on = BTreeMap::new();
    for shift in shifts {
        let mut newcomers = Vec::new();
        let mut seniors = Vec::new();
        for employee in employees {
            let var = vars.get(&employee.id, shift.id())?;
            if employee.is_new() {
                newcomers.push(var);
            } else {
                seniors.push(var);
            }
        }

        let label = shift.id().as_str();
        let new_var = model.new_bool_var(format!("new[{:?}]", label));
        reify_or(model, new_var, &newcomers);
        let experienced_var = model.new_bool_var(format!("experienced[{:?}]", label));
        reify_or(model, experienced_var, &seniors);

        new_on.insert(shift.id().clone(), new_var);
        experienced_on.insert(shift.id().clone(), experienced_var);
    }

    let mut total_covers = 0usize;
    for shift in shifts {
        let covers = minimal_covering_sets(shift, shifts, max_fan_out)?;
        total_covers += covers.len();

        let mut cover_vars = Vec::with_capacity(covers.len());
        for cover in &covers {
            let members: Vec<BoolVar> = cover
                .members()
                .iter()
                .filter_map(|member| experienced_on.get(member).copied())
                .collect();
            let cover_var = model.new_bool_var(format!(
                "cover[{:?},{:?}]",
                shift.id().as_str(),
                cover.key()
            ));
            reify_and(model, cover_var, &members);
            cover_vars.push(cover_var);
        }

        let label = shift.id().as_str();
        let any_cover = model.new_bool_var(format!("any_cover[{:?}]", label));
        reify_or(model, any_cover, &cover_vars);

        if let Some(&new_var) = new_on.get(shift.id()) {
            model.add_bool_or([new_var.not(), Literal::from(any_cover)]);
        }
    }

    debug!(
        event = "rule_encoded",
        rule = "new_employee_pairing_safety",
        newcomers = employees.iter().filter(|e| e.is_new()).count(),
        covers = total_covers,
    );
    Ok(())
}

/// `target ⇔ OR(operands)`; an empty disjunction forces `target` false
fn reify_or(model: &mut ConstraintModel, target: BoolVar, operands: &[BoolVar]) {
    for &operand in operands {
        model.add_bool_and([target]).only_enforce_if([operand]);
    }
    model
        .add_bool_or(operands.iter().copied())
        .only_enforce_if([target]);
}

/// `target ⇔ AND(operands)`
fn reify_and(model: &mut ConstraintModel, target: BoolVar, operands: &[BoolVar]) {
    model
        .add_bool_and(operands.iter().copied())
        .only_enforce_if([target]);
    let clause: Vec<Literal> = std::iter::once(Literal::from(target))
        .chain(operands.iter().map(|&op| op.not()))
        .collect();
    model.add_bool_or(clause);
}
