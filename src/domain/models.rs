use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::errors::{Result, SchedulingError};
use super::preferences::ShiftPreferences;
use super::value_objects::{EmployeeId, EmployeeStatus, Position, Priority, ShiftCategory, ShiftId};

/// An employee that can be assigned to shifts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub position: Position,
    /// Shift categories this employee is qualified for
    #[serde(default)]
    pub trained: BTreeSet<ShiftCategory>,
    #[serde(default)]
    pub preferences: ShiftPreferences,
}

impl Employee {
    pub fn new(id: impl Into<EmployeeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: Priority::default(),
            status: EmployeeStatus::default(),
            position: Position::default(),
            trained: BTreeSet::new(),
            preferences: ShiftPreferences::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_trained(mut self, categories: impl IntoIterator<Item = ShiftCategory>) -> Self {
        self.trained = categories.into_iter().collect();
        self
    }

    /// Qualifies the employee for every shift category
    pub fn trained_for_all(self) -> Self {
        self.with_trained(ShiftCategory::ALL)
    }

    pub fn with_preferences(mut self, preferences: ShiftPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn is_trained_for(&self, category: ShiftCategory) -> bool {
        self.trained.contains(&category)
    }

    pub fn is_new(&self) -> bool {
        self.status.is_new()
    }
}

/// A time-boxed shift; immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShiftRecord")]
pub struct Shift {
    id: ShiftId,
    category: ShiftCategory,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

/// Unvalidated wire form of a [`Shift`]
#[derive(Deserialize)]
struct ShiftRecord {
    id: ShiftId,
    category: ShiftCategory,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<ShiftRecord> for Shift {
    type Error = SchedulingError;

    fn try_from(record: ShiftRecord) -> Result<Self> {
        Shift::new(record.id, record.category, record.start, record.end)
    }
}

impl Shift {
    pub fn new(
        id: impl Into<ShiftId>,
        category: ShiftCategory,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self> {
        let id = id.into();
        if start >= end {
            return Err(SchedulingError::InvalidShiftInterval(id));
        }
        Ok(Self {
            id,
            category,
            start,
            end,
        })
    }

    pub fn id(&self) -> &ShiftId {
        &self.id
    }

    pub fn category(&self) -> ShiftCategory {
        self.category
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Calendar day the shift belongs to
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One complete schedule produced by a solver call
///
/// Every shift maps to exactly one employee. Per-employee tallies are derived
/// from the mapping when the solution is built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSolution {
    ordinal: usize,
    objective_value: Option<f64>,
    assignments: BTreeMap<ShiftId, EmployeeId>,
    shift_counts: BTreeMap<EmployeeId, usize>,
    closing_counts: BTreeMap<EmployeeId, usize>,
    morning_counts: BTreeMap<EmployeeId, usize>,
    stand_by_counts: BTreeMap<EmployeeId, usize>,
}

impl ScheduleSolution {
    pub fn from_assignments(
        assignments: BTreeMap<ShiftId, EmployeeId>,
        employees: &[Employee],
        shifts: &[Shift],
    ) -> Self {
        let zeroed: BTreeMap<EmployeeId, usize> =
            employees.iter().map(|e| (e.id.clone(), 0)).collect();
        let mut shift_counts = zeroed.clone();
        let mut closing_counts = zeroed.clone();
        let mut morning_counts = zeroed.clone();
        let mut stand_by_counts = zeroed;

        for shift in shifts {
            let Some(employee) = assignments.get(shift.id()) else {
                continue;
            };
            *shift_counts.entry(employee.clone()).or_insert(0) += 1;
            if shift.category().is_closing() {
                *closing_counts.entry(employee.clone()).or_insert(0) += 1;
            }
            if shift.category().is_morning() {
                *morning_counts.entry(employee.clone()).or_insert(0) += 1;
            }
            if shift.category().is_stand_by() {
                *stand_by_counts.entry(employee.clone()).or_insert(0) += 1;
            }
        }

        Self {
            ordinal: 0,
            objective_value: None,
            assignments,
            shift_counts,
            closing_counts,
            morning_counts,
            stand_by_counts,
        }
    }

    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn with_objective_value(mut self, value: Option<f64>) -> Self {
        self.objective_value = value;
        self
    }

    /// Position of this schedule in its enumeration sequence, starting at 1
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn assignments(&self) -> &BTreeMap<ShiftId, EmployeeId> {
        &self.assignments
    }

    pub fn assignee(&self, shift: &ShiftId) -> Option<&EmployeeId> {
        self.assignments.get(shift)
    }

    pub fn is_assigned(&self, employee: &EmployeeId, shift: &ShiftId) -> bool {
        self.assignee(shift) == Some(employee)
    }

    pub fn shifts_of<'a>(&'a self, employee: &'a EmployeeId) -> impl Iterator<Item = &'a ShiftId> + 'a {
        self.assignments
            .iter()
            .filter(move |(_, e)| *e == employee)
            .map(|(s, _)| s)
    }

    pub fn shift_count(&self, employee: &EmployeeId) -> usize {
        self.shift_counts.get(employee).copied().unwrap_or(0)
    }

    pub fn closing_count(&self, employee: &EmployeeId) -> usize {
        self.closing_counts.get(employee).copied().unwrap_or(0)
    }

    pub fn morning_count(&self, employee: &EmployeeId) -> usize {
        self.morning_counts.get(employee).copied().unwrap_or(0)
    }

    pub fn stand_by_count(&self, employee: &EmployeeId) -> usize {
        self.stand_by_counts.get(employee).copied().unwrap_or(0)
    }

    /// True if at least one shift has a different assignee
    pub fn differs_from(&self, other: &ScheduleSolution) -> bool {
        self.assignments != other.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 21)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_shift_rejects_empty_interval() {
        let result = Shift::new("s", ShiftCategory::Morning, at(9), at(9));
        assert!(matches!(result, Err(SchedulingError::InvalidShiftInterval(_))));
    }

    #[test]
    fn test_employee_defaults() {
        let employee = Employee::new("e1", "Dana");
        assert_eq!(employee.priority, Priority::Medium);
        assert_eq!(employee.status, EmployeeStatus::Senior);
        assert_eq!(employee.position, Position::FullTimer);
        assert!(!employee.is_trained_for(ShiftCategory::Morning));
        assert!(employee.trained_for_all().is_trained_for(ShiftCategory::StandBy));
    }

    #[test]
    fn test_solution_tallies() {
        let shifts = vec![
            Shift::new("m", ShiftCategory::Morning, at(9), at(13)).unwrap(),
            Shift::new("c", ShiftCategory::Closing, at(19), at(23)).unwrap(),
            Shift::new("sb", ShiftCategory::StandBy, at(13), at(17)).unwrap(),
        ];
        let employees = vec![Employee::new("a", "A"), Employee::new("b", "B")];
        let assignments = BTreeMap::from([
            (ShiftId::from("m"), EmployeeId::from("a")),
            (ShiftId::from("c"), EmployeeId::from("a")),
            (ShiftId::from("sb"), EmployeeId::from("b")),
        ]);

        let solution = ScheduleSolution::from_assignments(assignments, &employees, &shifts);
        let a = EmployeeId::from("a");
        let b = EmployeeId::from("b");

        assert_eq!(solution.shift_count(&a), 2);
        assert_eq!(solution.closing_count(&a), 1);
        assert_eq!(solution.morning_count(&a), 1);
        assert_eq!(solution.shift_count(&b), 1);
        assert_eq!(solution.stand_by_count(&b), 1);
        assert_eq!(solution.closing_count(&b), 0);
        assert_eq!(solution.shifts_of(&a).count(), 2);
        assert!(solution.is_assigned(&b, &ShiftId::from("sb")));
    }
}
