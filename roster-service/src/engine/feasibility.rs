//! Static pre-check over the whole horizon: proves some inputs can never
//! yield a roster without paying for a single day-solve.

use super::model::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    fn error(text: impl Into<String>) -> Self {
        Message {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Message {
            severity: Severity::Warning,
            text: text.into(),
        }
    }
}

/// Runs all five checks and reports whether the problem is feasible, along
/// with every message collected. An `Error`-severity message means the
/// problem can never be solved; `Warning` messages describe tight margins
/// that may still lead to a `NoSolution` deep in the search.
pub fn check_feasibility(problem: &Problem) -> (bool, Vec<Message>) {
    let mut messages = Vec::new();

    check_aggregate_counts(problem, &mut messages);
    check_per_shift_bounds(problem, &mut messages);
    check_daily_availability(problem, &mut messages);
    check_per_shift_availability(problem, &mut messages);
    check_forbidden_pair_saturation(problem, &mut messages);

    let feasible = !messages.iter().any(|m| m.severity == Severity::Error);
    (feasible, messages)
}

fn check_aggregate_counts(problem: &Problem, messages: &mut Vec<Message>) {
    let sum_min = problem.constraints.sum_min();
    let sum_max = problem.constraints.sum_max();
    if sum_min as usize > problem.num_employees {
        messages.push(Message::error(format!(
            "sum of min_count ({sum_min}) exceeds num_employees ({})",
            problem.num_employees
        )));
    }
    if sum_max < sum_min {
        messages.push(Message::error(format!(
            "sum of max_count ({sum_max}) is below sum of min_count ({sum_min})"
        )));
    }
}

fn check_per_shift_bounds(problem: &Problem, messages: &mut Vec<Message>) {
    for shift in 1..=problem.num_shifts {
        let min = problem.constraints.min_for(shift);
        let max = problem.constraints.max_for(shift, problem.num_employees);
        if min > max {
            messages.push(Message::error(format!(
                "shift {shift}: min_count ({min}) exceeds max_count ({max})"
            )));
        }
        if max as usize > problem.num_employees {
            messages.push(Message::error(format!(
                "shift {shift}: max_count ({max}) exceeds num_employees ({})",
                problem.num_employees
            )));
        }
    }
}

/// Employees available on day `d`: not on leave and not pattern-off.
fn available_on_day(problem: &Problem, day: u32) -> Vec<usize> {
    (0..problem.num_employees)
        .filter(|&i| {
            let employee = &problem.employees[i];
            if employee.leave_days.contains(&day) {
                return false;
            }
            match problem.pattern(employee.pattern_id) {
                Ok(pattern) => {
                    !super::pattern::is_off(pattern, employee.initial_pattern_pos, day)
                }
                Err(_) => false,
            }
        })
        .collect()
}

fn check_daily_availability(problem: &Problem, messages: &mut Vec<Message>) {
    let sum_min = problem.constraints.sum_min();
    for day in 0..problem.horizon_days {
        let available = available_on_day(problem, day).len() as u32;
        if available < sum_min {
            messages.push(Message::error(format!(
                "day {day}: only {available} employees available, but {sum_min} are required"
            )));
        } else if available == sum_min || available < sum_min + 2 {
            messages.push(Message::warning(format!(
                "day {day}: {available} employees available against a requirement of {sum_min}, little to no slack"
            )));
        }
    }
}

fn check_per_shift_availability(problem: &Problem, messages: &mut Vec<Message>) {
    for day in 0..problem.horizon_days {
        let available = available_on_day(problem, day);
        for shift in 1..=problem.num_shifts {
            let min = problem.constraints.min_for(shift);
            if min == 0 {
                continue;
            }
            let allowed = available
                .iter()
                .filter(|&&i| {
                    let employee = &problem.employees[i];
                    if employee.excluded_shifts.contains(&shift) {
                        return false;
                    }
                    employee.preferred_shifts.is_empty()
                        || employee.preferred_shifts.contains(&shift)
                })
                .count() as u32;
            if allowed < min {
                messages.push(Message::error(format!(
                    "day {day}, shift {shift}: only {allowed} employees may take it, but min_count is {min}"
                )));
            }
        }
    }
}

fn check_forbidden_pair_saturation(problem: &Problem, messages: &mut Vec<Message>) {
    for shift in 1..=problem.num_shifts {
        let min = problem.constraints.min_for(shift);
        let blocked = problem
            .employees
            .iter()
            .filter(|e| {
                problem
                    .forbidden_pairs
                    .contains(&(e.prev_shift, shift))
            })
            .count() as u32;
        let capacity = problem.num_employees as u32 - min;
        if blocked > capacity {
            messages.push(Message::warning(format!(
                "shift {shift} on day 0: {blocked} employees are blocked by a forbidden pair, leaving fewer than {capacity} free slots"
            )));
        }
    }
}
