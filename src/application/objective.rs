// Soft scheduling goals, combined into one maximised linear objective

use tracing::debug;

use super::variables::VariableMap;
use crate::domain::errors::Result;
use crate::domain::{ConstraintModel, Employee, LinearExpr, Shift, ShiftCategory};
use crate::infrastructure::config::{ObjectiveWeights, PositionTargets};

/// Categories whose load is spread evenly across employees
const BALANCED_CATEGORIES: [(&str, fn(ShiftCategory) -> bool); 2] = [
    ("closing", ShiftCategory::is_closing),
    ("stand_by", ShiftCategory::is_stand_by),
];

/// Builds the full objective and installs it on the model
pub fn add_objective(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    weights: &ObjectiveWeights,
    targets: &PositionTargets,
) -> Result<()> {
    let mut objective = preference_terms(vars, employees, shifts, weights.preference)?;
    objective.add_expr(&fairness_terms(model, vars, employees, shifts, weights.fairness, targets)?);
    objective.add_expr(&balance_terms(model, vars, employees, shifts, weights.balance)?);

    debug!(
        event = "objective_encoded",
        terms = objective.merged_terms().len(),
        preference_weight = weights.preference,
        fairness_weight = weights.fairness,
        balance_weight = weights.balance,
    );
    model.maximize(objective);
    Ok(())
}

/// Rewards wanted shifts and penalises unwanted ones, scaled by priority
pub fn preference_terms(
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    weight: i64,
) -> Result<LinearExpr> {
    let mut expr = LinearExpr::new();
    for employee in employees {
        let resolved = employee.preferences.resolve(shifts);
        let coeff = weight * employee.priority.rank();
        for shift in &resolved.wants_to_work {
            expr.add_bool(vars.get(&employee.id, shift)?, coeff);
        }
        for shift in &resolved.prefer_not_to_work {
            expr.add_bool(vars.get(&employee.id, shift)?, -coeff);
        }
    }
    Ok(expr)
}

/// Penalises each employee's distance from their position's weekly target.
///
/// `deviation[e]` is bounded below by `count − target` and `target − count`;
/// maximising `−deviation` pins it to the absolute difference.
pub fn fairness_terms(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    weight: i64,
    targets: &PositionTargets,
) -> Result<LinearExpr> {
    let mut expr = LinearExpr::new();
    if weight == 0 {
        return Ok(expr);
    }

    for employee in employees {
        let target = targets.target(employee.position);
        let deviation = model.new_int_var(
            0,
            shifts.len() as i64 + target,
            format!("deviation[{:?}]", employee.id.as_str()),
        );
        let worked = vars.for_employee(&employee.id)?;

        let mut above = LinearExpr::new();
        above.add_int(deviation, 1);
        for &var in &worked {
            above.add_bool(var, -1);
        }
        model.add_linear_ge(above, -target);

        let mut below = LinearExpr::sum(worked);
        below.add_int(deviation, 1);
        model.add_linear_ge(below, target);

        expr.add_int(deviation, -weight);
    }
    Ok(expr)
}

/// Penalises the busiest employee of each balanced category
pub fn balance_terms(
    model: &mut ConstraintModel,
    vars: &VariableMap,
    employees: &[Employee],
    shifts: &[Shift],
    weight: i64,
) -> Result<LinearExpr> {
    let mut expr = LinearExpr::new();
    if weight == 0 {
        return Ok(expr);
    }

    for (name, in_category) in BALANCED_CATEGORIES {
        let category_shifts: Vec<&Shift> =
            shifts.iter().filter(|s| in_category(s.category())).collect();
        if category_shifts.is_empty() {
            continue;
        }

        let peak = model.new_int_var(0, category_shifts.len() as i64, format!("peak[{:?}]", name));
        for employee in employees {
            let mut headroom = LinearExpr::new();
            headroom.add_int(peak, 1);
            for shift in &category_shifts {
                headroom.add_bool(vars.get(&employee.id, shift.id())?, -1);
            }
            model.add_linear_ge(headroom, 0);
        }
        expr.add_int(peak, -weight);
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeId, PreferenceRule, Priority, ShiftId, ShiftPreferences};
    use chrono::NaiveDate;

    fn shift(id: &str, category: ShiftCategory, day: u32) -> Shift {
        let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
        Shift::new(
            id,
            category,
            date.and_hms_opt(9, 0, 0).unwrap(),
            date.and_hms_opt(13, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn coefficient(expr: &LinearExpr, index: usize) -> i64 {
        expr.merged_terms()
            .into_iter()
            .find(|&(var, _)| var == index)
            .map_or(0, |(_, coeff)| coeff)
    }

    #[test]
    fn test_preference_scaled_by_priority() {
        let employees = vec![Employee::new("a", "A")
            .with_priority(Priority::Highest)
            .with_preferences(
                ShiftPreferences::new()
                    .with_wants_to_work(PreferenceRule::shift_ids(["mon"]))
                    .with_prefer_not_to_work(PreferenceRule::shift_ids(["tue"])),
            )];
        let shifts = vec![
            shift("mon", ShiftCategory::Morning, 22),
            shift("tue", ShiftCategory::Morning, 23),
            shift("wed", ShiftCategory::Morning, 24),
        ];
        let mut model = ConstraintModel::new();
        let vars = VariableMap::build(&mut model, &employees, &shifts).unwrap();

        let expr = preference_terms(&vars, &employees, &shifts, 100).unwrap();
        let a = EmployeeId::from("a");
        let var = |id: &str| vars.get(&a, &ShiftId::from(id)).unwrap().index();

        assert_eq!(coefficient(&expr, var("mon")), 500);
        assert_eq!(coefficient(&expr, var("tue")), -500);
        assert_eq!(coefficient(&expr, var("wed")), 0);
    }

    #[test]
    fn test_deviation_is_absolute_difference() {
        let employees = vec![Employee::new("a", "A")];
        let shifts = vec![
            shift("mon", ShiftCategory::Morning, 22),
            shift("tue", ShiftCategory::Morning, 23),
        ];
        let mut model = ConstraintModel::new();
        let vars = VariableMap::build(&mut model, &employees, &shifts).unwrap();
        let targets = PositionTargets {
            full_timer: 1,
            part_timer: 1,
        };

        let expr = fairness_terms(&mut model, &vars, &employees, &shifts, 1, &targets).unwrap();
        let program = model.linearize();

        // both shifts worked, deviation 1 is the smallest feasible value
        let deviation = model.num_variables() - 1;
        let feasible = |d: f64| {
            let values = [1.0, 1.0, d];
            program.rows.iter().all(|row| {
                let lhs: f64 = row.terms.iter().map(|&(c, k)| k * values[c]).sum();
                row.lower.map_or(true, |l| lhs >= l - 1e-9)
                    && row.upper.map_or(true, |u| lhs <= u + 1e-9)
            })
        };
        assert!(!feasible(0.0));
        assert!(feasible(1.0));
        assert_eq!(coefficient(&expr, deviation), -1);
    }

    #[test]
    fn test_balance_skips_absent_categories() {
        let employees = vec![Employee::new("a", "A"), Employee::new("b", "B")];
        let shifts = vec![
            shift("c1", ShiftCategory::Closing, 22),
            shift("c2", ShiftCategory::Closing, 23),
        ];
        let mut model = ConstraintModel::new();
        let vars = VariableMap::build(&mut model, &employees, &shifts).unwrap();

        let expr = balance_terms(&mut model, &vars, &employees, &shifts, 1).unwrap();

        assert_eq!(expr.merged_terms().len(), 1);
        assert_eq!(model.num_constraints(), 2);
    }
}
