//! Recursive day-by-day backtracking controller.

use super::day_solver::{self, SolveError, SolveOutcome};
use super::model::{Problem, ShiftId};
use super::state::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub reason: FailureReason,
    pub last_day_reached: u32,
    pub partial_schedule: Vec<Vec<ShiftId>>,
}

#[derive(Debug, Clone)]
pub struct Success {
    pub schedule: Vec<Vec<ShiftId>>,
    pub final_quality: Vec<Vec<u32>>,
}

#[derive(Debug, Clone)]
pub enum RosterOutcome {
    Success(Success),
    Failure(Failure),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Drives the recursive day-by-day search starting from `initial_state`'s
/// day. Only `ConfigError`/`ShapeError` escape to the caller; `NoSolution`
/// is handled entirely inside this function as a backtrack.
pub fn generate_roster(problem: &Problem, initial_state: State) -> Result<RosterOutcome, DriverError> {
    let mut deepest = initial_state.day;
    let mut best_partial: Vec<Vec<ShiftId>> = initial_state.schedule.clone();

    match solve_from(problem, initial_state, &mut deepest, &mut best_partial)? {
        Some(success) => Ok(RosterOutcome::Success(success)),
        None => Ok(RosterOutcome::Failure(Failure {
            reason: FailureReason::Exhausted,
            last_day_reached: deepest,
            partial_schedule: best_partial,
        })),
    }
}

/// Returns `Ok(Some(success))` on a completed horizon, `Ok(None)` when this
/// day (and every alternative tried at it) is exhausted, or `Err` when the
/// day-solve itself failed to build (shape/config error, never caught here).
fn solve_from(
    problem: &Problem,
    state: State,
    deepest: &mut u32,
    best_partial: &mut Vec<Vec<ShiftId>>,
) -> Result<Option<Success>, DriverError> {
    if state.day > *deepest {
        *deepest = state.day;
        *best_partial = state.schedule.clone();
    }

    if state.day >= problem.horizon_days {
        return Ok(Some(Success {
            schedule: state.schedule,
            final_quality: state.quality,
        }));
    }

    let mut rejected: Vec<Vec<ShiftId>> = Vec::new();

    loop {
        let outcome = day_solver::solve(problem, &state, state.day, &rejected)?;
        let (assignment, new_quality) = match outcome {
            SolveOutcome::Solved {
                assignment,
                new_quality,
            } => (assignment, new_quality),
            SolveOutcome::NoSolution => return Ok(None),
        };

        rejected.push(assignment.clone());
        if rejected.len() > problem.threshold {
            return Ok(None);
        }

        let next_state = state.advance(&assignment, new_quality);
        if let Some(success) = solve_from(problem, next_state, deepest, best_partial)? {
            return Ok(Some(success));
        }
        // Downstream exhausted; the tentative day-`state.day` assignment is
        // implicitly discarded since `next_state` was never returned — loop
        // back and try another candidate excluded by the enlarged `rejected`.
    }
}
