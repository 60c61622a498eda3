// Decision variable space: one boolean "employee works shift" per pair

use std::collections::HashMap;

use crate::domain::errors::Result;
use crate::domain::{
    AssignmentKey, BoolVar, ConstraintModel, Employee, EmployeeId, SchedulingError, Shift, ShiftId,
};

/// Lookup from (employee, shift) to its decision variable
///
/// Holds exactly one variable for every pair of the employees and shifts it
/// was built from. Input order is kept for deterministic encoding.
#[derive(Debug, Clone)]
pub struct VariableMap {
    vars: HashMap<AssignmentKey, BoolVar>,
    employees: Vec<EmployeeId>,
    shifts: Vec<ShiftId>,
}

impl VariableMap {
    pub fn build(model: &mut ConstraintModel, employees: &[Employee], shifts: &[Shift]) -> Result<Self> {
        let mut vars = HashMap::with_capacity(employees.len() * shifts.len());

        for employee in employees {
            for shift in shifts {
                let key = AssignmentKey::new(employee.id.clone(), shift.id().clone());
                if vars.contains_key(&key) {
                    return Err(SchedulingError::DuplicateVariable(key));
                }
                let var = model.new_bool_var(format!(
                    "assign[{:?},{:?}]",
                    employee.id.as_str(),
                    shift.id().as_str()
                ));
                vars.insert(key, var);
            }
        }

        Ok(Self {
            vars,
            employees: employees.iter().map(|e| e.id.clone()).collect(),
            shifts: shifts.iter().map(|s| s.id().clone()).collect(),
        })
    }

    pub fn get(&self, employee: &EmployeeId, shift: &ShiftId) -> Result<BoolVar> {
        let key = AssignmentKey::new(employee.clone(), shift.clone());
        self.vars
            .get(&key)
            .copied()
            .ok_or(SchedulingError::MissingVariable(key))
    }

    pub fn employees(&self) -> &[EmployeeId] {
        &self.employees
    }

    pub fn shifts(&self) -> &[ShiftId] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All variables in employee-major input order
    pub fn iter(&self) -> impl Iterator<Item = (AssignmentKey, BoolVar)> + '_ {
        self.employees.iter().flat_map(move |employee| {
            self.shifts.iter().filter_map(move |shift| {
                let key = AssignmentKey::new(employee.clone(), shift.clone());
                self.vars.get(&key).map(|&var| (key, var))
            })
        })
    }

    /// Variables of one shift, one per employee
    pub fn for_shift(&self, shift: &ShiftId) -> Result<Vec<BoolVar>> {
        self.employees.iter().map(|e| self.get(e, shift)).collect()
    }

    /// Variables of one employee, one per shift
    pub fn for_employee(&self, employee: &EmployeeId) -> Result<Vec<BoolVar>> {
        self.shifts.iter().map(|s| self.get(employee, s)).collect()
    }
}
