// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates the linearised constraint model to the HiGHS API

use crate::domain::{
    constraint_model::ConstraintModel,
    solver_service::{Result, SolveResponse, SolverError, SolverService},
    value_objects::SolveStatus,
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &ConstraintModel, time_limit: Option<Duration>) -> Result<SolveResponse> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let program = model.linearize();

        if program.trivially_infeasible {
            return Ok(SolveResponse::new(SolveStatus::Infeasible));
        }
        if program.columns.is_empty() {
            return Ok(SolveResponse::optimal(program.objective_offset, Vec::new()));
        }

        let mut objective = vec![0.0; program.columns.len()];
        for &(col, coeff) in &program.objective {
            objective[col] += coeff;
        }

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();
        let cols: Vec<_> = program
            .columns
            .iter()
            .zip(&objective)
            .map(|(column, &coeff)| pb.add_integer_column(coeff, column.lower..=column.upper))
            .collect();

        for row in &program.rows {
            let terms: Vec<_> = row.terms.iter().map(|&(col, coeff)| (cols[col], coeff)).collect();
            match (row.lower, row.upper) {
                (Some(lower), Some(upper)) => {
                    pb.add_row(lower..=upper, &terms);
                }
                (Some(lower), None) => {
                    pb.add_row(lower.., &terms);
                }
                (None, Some(upper)) => {
                    pb.add_row(..=upper, &terms);
                }
                (None, None) => {}
            }
        }

        let mut highs_model = pb.optimise(Sense::Maximise);
        highs_model.set_option("output_flag", false);
        if let Some(limit) = time_limit {
            highs_model.set_option("time_limit", limit.as_secs_f64());
        }

        debug!(
            event = "highs_start",
            columns = program.columns.len(),
            rows = program.rows.len(),
        );

        let solved = highs_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        // Process result
        match solved.status() {
            HighsModelStatus::Optimal => {
                let values: Vec<f64> = solved
                    .get_solution()
                    .columns()
                    .iter()
                    .map(|v| v.round())
                    .collect();
                let objective_value = program.objective_value(&values);
                Ok(SolveResponse::optimal(objective_value, values).with_solve_time(solve_time))
            }
            HighsModelStatus::Infeasible => {
                Ok(SolveResponse::new(SolveStatus::Infeasible).with_solve_time(solve_time))
            }
            HighsModelStatus::ReachedTimeLimit => {
                // Keep the incumbent when HiGHS found one before the limit
                let values: Vec<f64> = solved
                    .get_solution()
                    .columns()
                    .iter()
                    .map(|v| v.round())
                    .collect();
                if program.is_satisfied_by(&values) {
                    let objective_value = program.objective_value(&values);
                    debug!(event = "highs_incumbent", objective = objective_value);
                    return Ok(SolveResponse::feasible(objective_value, values)
                        .with_solve_time(solve_time));
                }
                warn!(event = "highs_timeout", solve_time_ms = solve_time);
                Ok(SolveResponse::new(SolveStatus::Timeout).with_solve_time(solve_time))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
