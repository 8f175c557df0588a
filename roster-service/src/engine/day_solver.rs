//! Builds and solves one day's assignment as a binary integer program.

use good_lp::solvers::scip::scip;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel};
use thiserror::Error;

use super::model::{ConfigError, Problem, ShiftId};
use super::state::{normalize_quality, State};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("{field} has length {actual}, expected {expected}")]
    ShapeError {
        field: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved {
        assignment: Vec<ShiftId>,
        new_quality: Vec<Vec<u32>>,
    },
    NoSolution,
}

/// Solves day `day` given `state` (already positioned for that day) and the
/// list of assignment vectors already rejected by a downstream backtrack.
///
/// `problem.csp_time_limit` bounds the wall clock of the backend call: if it
/// returns past that budget, the result is discarded and treated the same as
/// a backend-reported timeout (`NoSolution`), per §5. `good_lp`'s
/// `SolverModel` trait has no backend-portable pre-emption hook, so the
/// budget is enforced after the call returns rather than by interrupting it
/// mid-search; the spec allows either (§5: "interrupting a solver call
/// mid-search is permitted").
pub fn solve(
    problem: &Problem,
    state: &State,
    day: u32,
    rejected: &[Vec<ShiftId>],
) -> Result<SolveOutcome, SolveError> {
    validate_shape(problem, state)?;

    let n = problem.num_employees;
    let k = problem.num_shifts;

    let mut vars = variables!();
    // y[i][s] for s in 0..=k; y[i][0] means "off".
    let y: Vec<Vec<_>> = (0..n)
        .map(|_| (0..=k).map(|_| vars.add(variable().binary())).collect())
        .collect();

    let mut model = vars.minimise(objective(problem, state, &y)).using(scip);

    for i in 0..n {
        let exactly_one: Expression = (0..=k).map(|s| y[i][s as usize]).sum();
        model = model.with(constraint!(exactly_one == 1));
    }

    for i in 0..n {
        let employee = &problem.employees[i];
        let pattern = problem.pattern(employee.pattern_id)?;
        let forced_off = super::pattern::is_off(pattern, state.pattern_pos[i], 0)
            || employee.leave_days.contains(&day);
        if forced_off {
            model = model.with(constraint!(y[i][0] == 1));
        } else {
            model = model.with(constraint!(y[i][0] == 0));
        }
    }

    for s in 1..=k {
        let count: Expression = (0..n).map(|i| y[i][s as usize]).sum();
        let min = problem.constraints.min_for(s);
        let max = problem.constraints.max_for(s, n);
        model = model.with(constraint!(count >= min as f64));
        model = model.with(constraint!(count <= max as f64));
    }

    for i in 0..n {
        let prev = state.yesterday[i];
        for &(p, q) in &problem.forbidden_pairs {
            if p == prev {
                model = model.with(constraint!(y[i][q as usize] == 0));
            }
        }
    }

    for i in 0..n {
        let employee = &problem.employees[i];
        for &s in &employee.excluded_shifts {
            model = model.with(constraint!(y[i][s as usize] == 0));
        }
        if !employee.preferred_shifts.is_empty() {
            for s in 1..=k {
                if !employee.preferred_shifts.contains(&s) {
                    model = model.with(constraint!(y[i][s as usize] == 0));
                }
            }
        }
    }

    for r in rejected {
        let matching: Expression = (0..n).map(|i| y[i][r[i] as usize]).sum();
        model = model.with(constraint!(matching <= (n as f64) - 1.0));
    }

    let started_at = std::time::Instant::now();
    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(_) => return Ok(SolveOutcome::NoSolution),
    };
    if started_at.elapsed() > problem.csp_time_limit {
        // Ran to a result, but past the per-day wall-clock budget: §5 treats
        // this the same as an outright solver timeout, so the day is not
        // committed and the driver backtracks as if no solution was found.
        return Ok(SolveOutcome::NoSolution);
    }

    let assignment: Vec<ShiftId> = (0..n)
        .map(|i| {
            (0..=k)
                .find(|&s| solution.value(y[i][s as usize]).round() > 0.5)
                .unwrap_or(0)
        })
        .collect();

    let new_quality = post_process_quality(problem, &state.quality, &assignment);

    Ok(SolveOutcome::Solved {
        assignment,
        new_quality,
    })
}

fn objective(problem: &Problem, state: &State, y: &[Vec<good_lp::Variable>]) -> Expression {
    (0..problem.num_employees)
        .flat_map(|i| (1..=problem.num_shifts).map(move |s| (i, s)))
        .map(|(i, s)| {
            let cost = state.quality[i][(s - 1) as usize] as f64 + 1.0;
            y[i][s as usize] * cost
        })
        .sum()
}

fn post_process_quality(
    problem: &Problem,
    quality: &[Vec<u32>],
    assignment: &[ShiftId],
) -> Vec<Vec<u32>> {
    let mut new_quality: Vec<Vec<u32>> = quality.to_vec();
    for (i, &shift) in assignment.iter().enumerate() {
        if shift > 0 {
            new_quality[i][(shift - 1) as usize] += 1;
        }
    }
    normalize_quality(problem, new_quality)
}

fn validate_shape(problem: &Problem, state: &State) -> Result<(), SolveError> {
    let n = problem.num_employees;
    let k = problem.num_shifts as usize;

    if state.yesterday.len() != n {
        return Err(SolveError::ShapeError {
            field: "yesterday",
            actual: state.yesterday.len(),
            expected: n,
        });
    }
    if state.pattern_pos.len() != n {
        return Err(SolveError::ShapeError {
            field: "pattern_pos",
            actual: state.pattern_pos.len(),
            expected: n,
        });
    }
    if state.quality.len() != n {
        return Err(SolveError::ShapeError {
            field: "quality",
            actual: state.quality.len(),
            expected: n,
        });
    }
    for (i, row) in state.quality.iter().enumerate() {
        if row.len() != k {
            return Err(SolveError::ShapeError {
                field: "quality[i]",
                actual: row.len(),
                expected: k,
            });
        }
        let _ = i;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{Constraints, EmployeeProfile, Pattern};
    use std::collections::{BTreeMap, HashSet};
    use std::time::Duration;

    fn trivial_problem() -> Problem {
        let mut patterns = BTreeMap::new();
        patterns.insert(
            0,
            Pattern {
                total_days: 7,
                off_days: HashSet::from([5, 6]),
            },
        );
        let mut constraints = Constraints::default();
        constraints.min_count.insert(1, 1);
        constraints.max_count.insert(1, 5);
        constraints.min_count.insert(2, 1);
        constraints.max_count.insert(2, 5);
        let employees = (0..5)
            .map(|_| EmployeeProfile {
                pattern_id: 0,
                initial_pattern_pos: 0,
                prev_shift: 0,
                initial_quality: vec![0, 0],
                leave_days: HashSet::new(),
                preferred_shifts: HashSet::new(),
                excluded_shifts: HashSet::new(),
            })
            .collect();
        Problem {
            num_employees: 5,
            num_shifts: 2,
            patterns,
            forbidden_pairs: HashSet::new(),
            constraints,
            threshold: Problem::DEFAULT_THRESHOLD,
            quality_cap: 100,
            horizon_days: 3,
            csp_time_limit: Duration::from_secs(1),
            employees,
        }
    }

    #[test]
    fn shape_mismatch_is_rejected_before_building_the_model() {
        let problem = trivial_problem();
        let mut state = State::initial(&problem);
        state.quality[0] = vec![0];
        let result = solve(&problem, &state, 0, &[]);
        assert!(matches!(result, Err(SolveError::ShapeError { .. })));
    }

    #[test]
    fn unknown_pattern_surfaces_as_config_error() {
        let mut problem = trivial_problem();
        problem.employees[0].pattern_id = 99;
        let state = State::initial(&problem);
        let result = solve(&problem, &state, 0, &[]);
        assert!(matches!(result, Err(SolveError::Config(_))));
    }

    #[test]
    fn solve_past_its_time_budget_is_treated_as_no_solution() {
        let mut problem = trivial_problem();
        problem.csp_time_limit = Duration::from_nanos(1);
        let state = State::initial(&problem);
        let result = solve(&problem, &state, 0, &[]).unwrap();
        assert!(matches!(result, SolveOutcome::NoSolution));
    }
}
