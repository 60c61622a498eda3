// microlp Solver Adapter
// Implements the SolverService interface for the pure Rust microlp solver through good_lp
// microlp has no time limit of its own: the solve runs on a worker thread and is abandoned once the budget is spent

use crate::domain::{
    constraint_model::{ConstraintModel, LinearProgram},
    solver_service::{Result, SolveResponse, SolverError, SolverService},
    value_objects::SolveStatus,
};
use good_lp::{
    solvers::microlp::microlp, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// good_lp/microlp backend
///
/// microlp cannot be interrupted. A solve that outlives its time limit keeps
/// running on its worker thread, holding one core, until it finishes on its
/// own; its result is discarded. Those workers are tracked so callers can
/// see how many are still busy before retrying.
pub struct MicroLpSolver {
    abandoned: Mutex<Vec<JoinHandle<()>>>,
}

impl MicroLpSolver {
    pub fn new() -> Self {
        Self {
            abandoned: Mutex::new(Vec::new()),
        }
    }

    /// Number of timed-out solves whose worker thread is still running
    pub fn running_abandoned_workers(&self) -> usize {
        let mut abandoned = self.abandoned.lock().unwrap_or_else(|e| e.into_inner());
        prune_finished(&mut abandoned);
        abandoned.len()
    }

    fn abandon(&self, worker: JoinHandle<()>) {
        let mut abandoned = self.abandoned.lock().unwrap_or_else(|e| e.into_inner());
        prune_finished(&mut abandoned);
        abandoned.push(worker);
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

enum Outcome {
    Solved(Vec<f64>),
    Infeasible,
    Failed(String),
}

impl SolverService for MicroLpSolver {
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

        debug!(
            event = "microlp_start",
            columns = program.columns.len(),
            rows = program.rows.len(),
        );

        let busy = self.running_abandoned_workers();
        if busy > 0 {
            warn!(event = "microlp_workers_busy", running = busy);
        }

        let (sender, receiver) = mpsc::channel();
        let worker_program = program.clone();
        let worker = thread::Builder::new()
            .name("microlp".to_string())
            .spawn(move || {
                let _ = sender.send(solve_program(&worker_program));
            })
            .map_err(|e| SolverError::ExecutionFailed(format!("cannot start solver thread: {}", e)))?;

        let outcome = match time_limit {
            Some(limit) => match receiver.recv_timeout(limit) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(event = "microlp_timeout", limit_ms = limit.as_millis() as u64);
                    self.abandon(worker);
                    return Ok(SolveResponse::new(SolveStatus::Timeout)
                        .with_solve_time(elapsed_ms(start_time)));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SolverError::ExecutionFailed(
                        "solver thread terminated without a result".to_string(),
                    ))
                }
            },
            None => receiver.recv().map_err(|_| {
                SolverError::ExecutionFailed("solver thread terminated without a result".to_string())
            })?,
        };
        let solve_time = elapsed_ms(start_time);

        // Process result
        match outcome {
            Outcome::Solved(values) => {
                let objective = program.objective_value(&values);
                Ok(SolveResponse::optimal(objective, values).with_solve_time(solve_time))
            }
            Outcome::Infeasible => {
                Ok(SolveResponse::new(SolveStatus::Infeasible).with_solve_time(solve_time))
            }
            Outcome::Failed(message) => Err(SolverError::ExecutionFailed(message)),
        }
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

fn solve_program(program: &LinearProgram) -> Outcome {
    let mut vars = variables!();
    let lp_variables: Vec<GoodLpVariable> = program
        .columns
        .iter()
        .map(|column| vars.add(variable().integer().min(column.lower).max(column.upper)))
        .collect();

    let mut obj_expr: Expression = 0.into();
    for &(col, coeff) in &program.objective {
        obj_expr += coeff * lp_variables[col];
    }

    let mut lp_model = vars.maximise(obj_expr).using(microlp);

    for row in &program.rows {
        let mut lhs: Expression = 0.into();
        for &(col, coeff) in &row.terms {
            lhs += coeff * lp_variables[col];
        }

        match (row.lower, row.upper) {
            (Some(lower), Some(upper)) if lower == upper => {
                lp_model = lp_model.with(lhs.eq(lower));
            }
            (lower, upper) => {
                if let Some(lower) = lower {
                    lp_model = lp_model.with(lhs.clone().geq(lower));
                }
                if let Some(upper) = upper {
                    lp_model = lp_model.with(lhs.leq(upper));
                }
            }
        }
    }

    match lp_model.solve() {
        Ok(sol) => Outcome::Solved(
            lp_variables
                .iter()
                .map(|&var| sol.value(var).round())
                .collect(),
        ),
        Err(ResolutionError::Infeasible) => Outcome::Infeasible,
        Err(e) => Outcome::Failed(format!("{:?}", e)),
    }
}

fn prune_finished(workers: &mut Vec<JoinHandle<()>>) {
    workers.retain(|worker| !worker.is_finished());
}

fn elapsed_ms(start_time: Instant) -> f64 {
    start_time.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constraint_model::LinearExpr;

    #[test]
    fn test_prune_keeps_only_running_workers() {
        let (release, wait) = mpsc::channel::<()>();
        let running = thread::spawn(move || {
            let _ = wait.recv();
        });
        let done = thread::spawn(|| {});
        while !done.is_finished() {
            thread::yield_now();
        }

        let mut workers = vec![running, done];
        prune_finished(&mut workers);
        assert_eq!(workers.len(), 1);

        release.send(()).unwrap();
        while !workers[0].is_finished() {
            thread::yield_now();
        }
        prune_finished(&mut workers);
        assert!(workers.is_empty());
    }

    #[test]
    fn test_fresh_solver_has_no_busy_workers() {
        let solver = MicroLpSolver::new();
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        model.add_bool_or([a]);

        solver.solve(&model, Some(Duration::from_secs(10))).unwrap();
        assert_eq!(solver.running_abandoned_workers(), 0);
    }

    #[test]
    fn test_maximises_under_at_most_one() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_at_most_one([a, b]);
        let mut objective = LinearExpr::new();
        objective.add_bool(a, 1).add_bool(b, 3);
        model.maximize(objective);

        let response = MicroLpSolver::new().solve(&model, None).unwrap();

        assert_eq!(response.status, SolveStatus::Optimal);
        assert_eq!(response.value_of(a), Some(false));
        assert_eq!(response.value_of(b), Some(true));
        assert_eq!(response.objective_value, Some(3.0));
    }

    #[test]
    fn test_reports_infeasible() {
        let mut model = ConstraintModel::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_exactly_one([a, b]);
        model.add_bool_and([a.not(), b.not()]);

        let response = MicroLpSolver::new()
            .solve(&model, Some(Duration::from_secs(10)))
            .unwrap();

        assert_eq!(response.status, SolveStatus::Infeasible);
        assert_eq!(response.value_of(a), None);
    }

    #[test]
    fn test_enforced_constraint_is_relaxed_when_literal_false() {
        let mut model = ConstraintModel::new();
        let gate = model.new_bool_var("gate");
        let x = model.new_bool_var("x");
        model.add_bool_and([x.not()]).only_enforce_if([gate]);
        let mut objective = LinearExpr::new();
        objective.add_bool(x, 2).add_bool(gate, 1);
        model.maximize(objective);

        let response = MicroLpSolver::new().solve(&model, None).unwrap();

        assert_eq!(response.value_of(x), Some(true));
        assert_eq!(response.value_of(gate), Some(false));
    }
}
