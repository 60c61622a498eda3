//! Backend-independent constraint model.
//!
//! Scheduling rules are written against a small CP-style vocabulary:
//! boolean and bounded integer variables, `exactly_one`, `at_most_one`,
//! `bool_or`, `bool_and` and linear constraints, each optionally reified with
//! `only_enforce_if`. Solver adapters never see that vocabulary; they consume
//! the [`LinearProgram`] produced by [`ConstraintModel::linearize`], where
//! every reified constraint has become a big-M row over integer columns.

use std::collections::BTreeMap;

/// Handle of a boolean decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(usize);

impl BoolVar {
    pub fn index(self) -> usize {
        self.0
    }

    /// Literal that holds when this variable is false
    pub fn not(self) -> Literal {
        Literal {
            var: self.0,
            negated: true,
        }
    }
}

/// Handle of a bounded integer variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(usize);

impl IntVar {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A boolean variable or its negation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    var: usize,
    negated: bool,
}

impl Literal {
    pub fn index(self) -> usize {
        self.var
    }

    pub fn is_negated(self) -> bool {
        self.negated
    }

    pub fn negate(self) -> Literal {
        Literal {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl From<BoolVar> for Literal {
    fn from(var: BoolVar) -> Self {
        Literal {
            var: var.0,
            negated: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Boolean,
    Integer,
}

/// Declaration of one model variable
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub name: String,
    pub kind: VariableKind,
    pub lower: i64,
    pub upper: i64,
}

/// Integer linear expression `Σ coeff·var + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(usize, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given boolean variables
    pub fn sum(vars: impl IntoIterator<Item = BoolVar>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_bool(var, 1);
        }
        expr
    }

    pub fn add_bool(&mut self, var: BoolVar, coeff: i64) -> &mut Self {
        self.terms.push((var.0, coeff));
        self
    }

    pub fn add_int(&mut self, var: IntVar, coeff: i64) -> &mut Self {
        self.terms.push((var.0, coeff));
        self
    }

    /// Adds `coeff·lit`, where a negated literal contributes `coeff·(1 - var)`
    pub fn add_literal(&mut self, lit: Literal, coeff: i64) -> &mut Self {
        if lit.negated {
            self.constant += coeff;
            self.terms.push((lit.var, -coeff));
        } else {
            self.terms.push((lit.var, coeff));
        }
        self
    }

    pub fn add_constant(&mut self, value: i64) -> &mut Self {
        self.constant += value;
        self
    }

    pub fn add_expr(&mut self, other: &LinearExpr) -> &mut Self {
        self.terms.extend_from_slice(&other.terms);
        self.constant += other.constant;
        self
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms with duplicate variables merged and zero coefficients dropped
    pub fn merged_terms(&self) -> Vec<(usize, i64)> {
        let mut merged: BTreeMap<usize, i64> = BTreeMap::new();
        for &(var, coeff) in &self.terms {
            *merged.entry(var).or_insert(0) += coeff;
        }
        merged.into_iter().filter(|&(_, c)| c != 0).collect()
    }

    /// Evaluates the expression against solver column values
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff as f64 * values.get(var).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant as f64
    }

    fn bounds(&self, variables: &[VariableDef]) -> (i64, i64) {
        let mut min = self.constant;
        let mut max = self.constant;
        for (var, coeff) in self.merged_terms() {
            let def = &variables[var];
            let a = coeff * def.lower;
            let b = coeff * def.upper;
            min += a.min(b);
            max += a.max(b);
        }
        (min, max)
    }
}

/// Kind of constraint as written by the encoders
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    ExactlyOne(Vec<Literal>),
    AtMostOne(Vec<Literal>),
    BoolOr(Vec<Literal>),
    BoolAnd(Vec<Literal>),
    Linear {
        expr: LinearExpr,
        lower: Option<i64>,
        upper: Option<i64>,
    },
}

/// One constraint plus its enforcement literals
#[derive(Debug, Clone)]
pub struct ModelConstraint {
    kind: ConstraintKind,
    enforcement: Vec<Literal>,
}

impl ModelConstraint {
    /// Only enforce the constraint when all given literals hold
    pub fn only_enforce_if<L: Into<Literal>>(
        &mut self,
        literals: impl IntoIterator<Item = L>,
    ) -> &mut Self {
        self.enforcement.extend(literals.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn enforcement(&self) -> &[Literal] {
        &self.enforcement
    }

    /// Indices of every variable this constraint mentions
    pub fn referenced_variables(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = match &self.kind {
            ConstraintKind::ExactlyOne(lits)
            | ConstraintKind::AtMostOne(lits)
            | ConstraintKind::BoolOr(lits)
            | ConstraintKind::BoolAnd(lits) => lits.iter().map(|l| l.var).collect(),
            ConstraintKind::Linear { expr, .. } => expr.terms.iter().map(|&(v, _)| v).collect(),
        };
        indices.extend(self.enforcement.iter().map(|l| l.var));
        indices
    }

    /// The constraint as `lower ≤ expr ≤ upper`, ignoring enforcement
    fn as_linear(&self) -> (LinearExpr, Option<i64>, Option<i64>) {
        let literal_sum = |lits: &[Literal]| {
            let mut expr = LinearExpr::new();
            for &lit in lits {
                expr.add_literal(lit, 1);
            }
            expr
        };
        match &self.kind {
            ConstraintKind::ExactlyOne(lits) => (literal_sum(lits), Some(1), Some(1)),
            ConstraintKind::AtMostOne(lits) => (literal_sum(lits), None, Some(1)),
            ConstraintKind::BoolOr(lits) => (literal_sum(lits), Some(1), None),
            ConstraintKind::BoolAnd(lits) => (literal_sum(lits), Some(lits.len() as i64), None),
            ConstraintKind::Linear { expr, lower, upper } => (expr.clone(), *lower, *upper),
        }
    }
}

/// Integer column of a linearised program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub lower: f64,
    pub upper: f64,
}

/// One-sided linear row `Σ coeff·column (≤|≥) bound`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRow {
    pub terms: Vec<(usize, f64)>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Mixed-integer program handed to a solver backend (maximisation)
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    pub columns: Vec<Column>,
    pub rows: Vec<LinearRow>,
    pub objective: Vec<(usize, f64)>,
    pub objective_offset: f64,
    /// A row without variables was already violated during linearisation
    pub trivially_infeasible: bool,
}

impl LinearProgram {
    /// Whether `values` respects every column bound and row, within `1e-6`
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        const TOLERANCE: f64 = 1e-6;
        if self.trivially_infeasible || values.len() != self.columns.len() {
            return false;
        }
        let in_bounds = self
            .columns
            .iter()
            .zip(values)
            .all(|(column, &v)| v >= column.lower - TOLERANCE && v <= column.upper + TOLERANCE);
        in_bounds
            && self.rows.iter().all(|row| {
                let lhs: f64 = row.terms.iter().map(|&(col, coeff)| coeff * values[col]).sum();
                row.lower.map_or(true, |l| lhs >= l - TOLERANCE)
                    && row.upper.map_or(true, |u| lhs <= u + TOLERANCE)
            })
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(col, coeff)| coeff * values.get(col).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.objective_offset
    }
}

/// Constraint model shared by the encoders of one scheduling run
#[derive(Debug, Clone, Default)]
pub struct ConstraintModel {
    variables: Vec<VariableDef>,
    constraints: Vec<ModelConstraint>,
    objective: LinearExpr,
}

impl ConstraintModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.variables.push(VariableDef {
            name: name.into(),
            kind: VariableKind::Boolean,
            lower: 0,
            upper: 1,
        });
        BoolVar(self.variables.len() - 1)
    }

    pub fn new_int_var(&mut self, lower: i64, upper: i64, name: impl Into<String>) -> IntVar {
        self.variables.push(VariableDef {
            name: name.into(),
            kind: VariableKind::Integer,
            lower,
            upper,
        });
        IntVar(self.variables.len() - 1)
    }

    pub fn add_exactly_one<L: Into<Literal>>(
        &mut self,
        literals: impl IntoIterator<Item = L>,
    ) -> &mut ModelConstraint {
        self.push(ConstraintKind::ExactlyOne(collect_literals(literals)))
    }

    pub fn add_at_most_one<L: Into<Literal>>(
        &mut self,
        literals: impl IntoIterator<Item = L>,
    ) -> &mut ModelConstraint {
        self.push(ConstraintKind::AtMostOne(collect_literals(literals)))
    }

    pub fn add_bool_or<L: Into<Literal>>(
        &mut self,
        literals: impl IntoIterator<Item = L>,
    ) -> &mut ModelConstraint {
        self.push(ConstraintKind::BoolOr(collect_literals(literals)))
    }

    pub fn add_bool_and<L: Into<Literal>>(
        &mut self,
        literals: impl IntoIterator<Item = L>,
    ) -> &mut ModelConstraint {
        self.push(ConstraintKind::BoolAnd(collect_literals(literals)))
    }

    pub fn add_linear_le(&mut self, expr: LinearExpr, bound: i64) -> &mut ModelConstraint {
        self.push(ConstraintKind::Linear {
            expr,
            lower: None,
            upper: Some(bound),
        })
    }

    pub fn add_linear_ge(&mut self, expr: LinearExpr, bound: i64) -> &mut ModelConstraint {
        self.push(ConstraintKind::Linear {
            expr,
            lower: Some(bound),
            upper: None,
        })
    }

    pub fn add_equality(&mut self, expr: LinearExpr, value: i64) -> &mut ModelConstraint {
        self.push(ConstraintKind::Linear {
            expr,
            lower: Some(value),
            upper: Some(value),
        })
    }

    /// Replaces the objective; the model is always maximised
    pub fn maximize(&mut self, expr: LinearExpr) {
        self.objective = expr;
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[ModelConstraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn push(&mut self, kind: ConstraintKind) -> &mut ModelConstraint {
        self.constraints.push(ModelConstraint {
            kind,
            enforcement: Vec::new(),
        });
        let last = self.constraints.len() - 1;
        &mut self.constraints[last]
    }

    /// Lowers the model to a mixed-integer program.
    ///
    /// A constraint `lower ≤ expr ≤ upper` enforced by literals `e₁..eₖ`
    /// becomes `expr ≤ upper + M·S` and `expr ≥ lower − M·S` with
    /// `S = Σ (1 − eᵢ)`. `M` is derived from the variable bounds so it is
    /// exactly large enough to relax the row whenever `S ≥ 1`. Rows that the
    /// bounds already satisfy are dropped.
    pub fn linearize(&self) -> LinearProgram {
        let mut program = LinearProgram {
            columns: self
                .variables
                .iter()
                .map(|v| Column {
                    lower: v.lower as f64,
                    upper: v.upper as f64,
                })
                .collect(),
            ..LinearProgram::default()
        };

        for constraint in &self.constraints {
            let (expr, lower, upper) = constraint.as_linear();
            let (min, max) = expr.bounds(&self.variables);

            let mut slack = LinearExpr::new();
            for &lit in &constraint.enforcement {
                slack.add_literal(lit.negate(), 1);
            }
            let enforced = !constraint.enforcement.is_empty();

            if let Some(upper) = upper {
                if max > upper {
                    let mut row = expr.clone();
                    if enforced {
                        let mut relax = slack.clone();
                        scale(&mut relax, -(max - upper));
                        row.add_expr(&relax);
                    }
                    program.push_row(&row, None, Some(upper));
                }
            }
            if let Some(lower) = lower {
                if min < lower {
                    let mut row = expr.clone();
                    if enforced {
                        let mut relax = slack.clone();
                        scale(&mut relax, lower - min);
                        row.add_expr(&relax);
                    }
                    program.push_row(&row, Some(lower), None);
                }
            }
        }

        program.objective = self
            .objective
            .merged_terms()
            .into_iter()
            .map(|(var, coeff)| (var, coeff as f64))
            .collect();
        program.objective_offset = self.objective.constant as f64;
        program
    }
}

impl LinearProgram {
    fn push_row(&mut self, expr: &LinearExpr, lower: Option<i64>, upper: Option<i64>) {
        let terms = expr.merged_terms();
        let lower = lower.map(|l| l - expr.constant);
        let upper = upper.map(|u| u - expr.constant);

        if terms.is_empty() {
            let violated = lower.is_some_and(|l| l > 0) || upper.is_some_and(|u| u < 0);
            self.trivially_infeasible |= violated;
            return;
        }

        self.rows.push(LinearRow {
            terms: terms.into_iter().map(|(v, c)| (v, c as f64)).collect(),
            lower: lower.map(|l| l as f64),
            upper: upper.map(|u| u as f64),
        });
    }
}

fn scale(expr: &mut LinearExpr, factor: i64) {
    for term in &mut expr.terms {
        term.1 *= factor;
    }
    expr.constant *= factor;
}

fn collect_literals<L: Into<Literal>>(literals: impl IntoIterator<Item = L>) -> Vec<Literal> {
    literals.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(program: &LinearProgram, values: &[f64]) -> bool {
        program.is_satisfied_by(values)
    }

    #[test]
    fn test_negated_literal_expands_to_complement() {
        let mut model = ConstraintModel::new();
        let x = model.new_bool_var("x");
        let mut expr = LinearExpr::new();
        expr.add_literal(x.not(), 3);

        assert_eq!(expr.constant(), 3);
        assert_eq!(expr.merged_terms(), vec![(x.index(), -3)]);
    }

    #[test]
    fn test_exactly_one_rows() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_exactly_one([a, b]);

        let program = model.linearize();
        assert!(satisfies(&program, &[1.0, 0.0]));
        assert!(satisfies(&program, &[0.0, 1.0]));
        assert!(!satisfies(&program, &[1.0, 1.0]));
        assert!(!satisfies(&program, &[0.0, 0.0]));
    }

    #[test]
    fn test_enforced_bool_and_is_relaxed_when_indicator_false() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        let indicator = model.new_bool_var("indicator");
        model.add_bool_and([a.not(), b.not()]).only_enforce_if([indicator]);

        let program = model.linearize();
        // indicator true forces a = b = 0
        assert!(satisfies(&program, &[0.0, 0.0, 1.0]));
        assert!(!satisfies(&program, &[1.0, 0.0, 1.0]));
        // indicator false leaves them free
        assert!(satisfies(&program, &[1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_enforcement_by_negated_literal() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let indicator = model.new_bool_var("indicator");
        model.add_bool_or([a]).only_enforce_if([indicator.not()]);

        let program = model.linearize();
        assert!(!satisfies(&program, &[0.0, 0.0]));
        assert!(satisfies(&program, &[1.0, 0.0]));
        assert!(satisfies(&program, &[0.0, 1.0]));
    }

    #[test]
    fn test_empty_exactly_one_is_trivially_infeasible() {
        let mut model = ConstraintModel::new();
        model.add_exactly_one(Vec::<BoolVar>::new());

        assert!(model.linearize().trivially_infeasible);
    }

    #[test]
    fn test_empty_bool_or_with_indicator_forces_indicator_false() {
        let mut model = ConstraintModel::new();
        let indicator = model.new_bool_var("indicator");
        model
            .add_bool_or(Vec::<BoolVar>::new())
            .only_enforce_if([indicator]);

        let program = model.linearize();
        assert!(!program.trivially_infeasible);
        assert!(satisfies(&program, &[0.0]));
        assert!(!satisfies(&program, &[1.0]));
    }

    #[test]
    fn test_redundant_rows_are_dropped() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_linear_le(LinearExpr::sum([a, b]), 5);

        assert!(model.linearize().rows.is_empty());
    }

    #[test]
    fn test_integer_bounds_drive_big_m() {
        let mut model = ConstraintModel::new();
        let n = model.new_int_var(0, 10, "n");
        let indicator = model.new_bool_var("indicator");
        let mut expr = LinearExpr::new();
        expr.add_int(n, 1);
        model.add_linear_le(expr, 2).only_enforce_if([indicator]);

        let program = model.linearize();
        assert!(satisfies(&program, &[10.0, 0.0]));
        assert!(!satisfies(&program, &[3.0, 1.0]));
        assert!(satisfies(&program, &[2.0, 1.0]));
    }

    #[test]
    fn test_values_outside_column_bounds_are_rejected() {
        let mut model = ConstraintModel::new();
        model.new_int_var(0, 3, "n");

        let program = model.linearize();
        assert!(program.is_satisfied_by(&[3.0]));
        assert!(!program.is_satisfied_by(&[4.0]));
        assert!(!program.is_satisfied_by(&[]));
    }

    #[test]
    fn test_objective_value_includes_offset() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let mut objective = LinearExpr::new();
        objective.add_literal(a.not(), 4).add_constant(1);
        model.maximize(objective);

        let program = model.linearize();
        assert_eq!(program.objective_value(&[0.0]), 5.0);
        assert_eq!(program.objective_value(&[1.0]), 1.0);
    }
}
