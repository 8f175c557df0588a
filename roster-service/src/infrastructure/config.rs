//! Turns a [`GenerateRosterRequest`] into the engine's `Problem` + initial
//! `State`. Kept thin per the engine's own non-goals: no schema validation
//! beyond what is needed to build a well-formed `Problem` (date ordering and
//! horizon-emptiness are rejected earlier, by the job service).

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use chrono::{Datelike, Timelike};

use crate::domain::request::GenerateRosterRequest;
use crate::engine::model::{Constraints, EmployeeProfile, Pattern, Problem};
use crate::engine::state::State;
use crate::engine::ConfigError;

/// Builds `(Problem, State)` from a validated request. The only failure mode
/// is a structurally invalid `Problem` ([`ConfigError`]); the request's own
/// shape (required fields, date ordering) is assumed already checked by the
/// caller.
pub fn build_problem(request: &GenerateRosterRequest) -> Result<(Problem, State), ConfigError> {
    let horizon_days = (request.end_date - request.start_date).num_days() as u32 + 1;

    let patterns = build_patterns(request);
    let forbidden_pairs = build_forbidden_pairs(request);
    let constraints = build_constraints(request);
    let employees = request
        .employees
        .iter()
        .map(|employee| build_employee(request, employee))
        .collect();

    let problem = Problem {
        num_employees: request.employees.len(),
        num_shifts: request.no_of_shifts,
        patterns,
        forbidden_pairs,
        constraints,
        threshold: request.threshold.unwrap_or(Problem::DEFAULT_THRESHOLD),
        quality_cap: request.quality_cap.unwrap_or(Problem::DEFAULT_QUALITY_CAP),
        horizon_days,
        csp_time_limit: request
            .csp_time_limit_secs
            .map(Duration::from_secs)
            .unwrap_or(Problem::DEFAULT_CSP_TIME_LIMIT),
        employees,
    };

    problem.validate()?;

    let state = State::initial(&problem);
    Ok((problem, state))
}

fn build_patterns(request: &GenerateRosterRequest) -> BTreeMap<u32, Pattern> {
    request
        .work_pattern
        .iter()
        .map(|pattern| {
            let total_days = pattern.no_working_days + pattern.no_off_days;
            let off_days = (total_days - pattern.no_off_days..total_days).collect();
            (
                pattern.pattern_id - 1,
                Pattern {
                    total_days,
                    off_days,
                },
            )
        })
        .collect()
}

fn build_constraints(request: &GenerateRosterRequest) -> Constraints {
    let mut constraints = Constraints::default();
    for shift in &request.shifts {
        constraints
            .min_count
            .insert(shift.shift_id, shift.min_no_of_employees);
        constraints
            .max_count
            .insert(shift.shift_id, shift.max_no_of_employees);
    }
    constraints
}

/// For every ordered pair of distinct shifts `(a, b)`: if the rest between the
/// end of `a` and the start of `b` on the following day is shorter than
/// `min_time_between_shifts` hours, `b` may not follow `a`. Shifts whose
/// `end_time <= start_time` are treated as spanning midnight.
fn build_forbidden_pairs(request: &GenerateRosterRequest) -> HashSet<(u32, u32)> {
    let minutes_of_day = |time: chrono::NaiveTime| -> i64 {
        i64::from(time.num_seconds_from_midnight()) / 60
    };

    let mut pairs = HashSet::new();
    for a in &request.shifts {
        let a_start = minutes_of_day(a.start_time);
        let a_end_raw = minutes_of_day(a.end_time);
        let a_end = if a_end_raw <= a_start {
            a_end_raw + 24 * 60
        } else {
            a_end_raw
        };
        for b in &request.shifts {
            if a.shift_id == b.shift_id {
                continue;
            }
            let b_start = minutes_of_day(b.start_time) + 24 * 60;
            let rest_hours = (b_start - a_end) / 60;
            if rest_hours < i64::from(request.min_time_between_shifts) {
                pairs.insert((a.shift_id, b.shift_id));
            }
        }
    }
    pairs
}

fn build_employee(
    request: &GenerateRosterRequest,
    employee: &crate::domain::request::EmployeeInput,
) -> EmployeeProfile {
    let pattern_id = employee.preferred_work_pattern - 1;

    let strict_weekend_off = request
        .work_pattern
        .iter()
        .find(|p| p.pattern_id - 1 == pattern_id)
        .map(|p| p.strict_weekend_off)
        .unwrap_or(false);

    let initial_pattern_pos = if strict_weekend_off {
        request.start_date.weekday().num_days_from_monday()
    } else {
        employee.no_work_days_from_previous_pattern + employee.no_off_days_from_previous_pattern
    };

    let leave_days = employee
        .leaves
        .iter()
        .flat_map(|leave| {
            let from = leave.start_date.max(request.start_date);
            let to = leave.end_date.min(request.end_date);
            let from_offset = (from - request.start_date).num_days();
            let to_offset = (to - request.start_date).num_days();
            (from_offset..=to_offset).map(|d| d as u32)
        })
        .collect();

    EmployeeProfile {
        pattern_id,
        initial_pattern_pos,
        prev_shift: employee.last_shift,
        initial_quality: employee.quality.clone(),
        leave_days,
        preferred_shifts: employee.shift_preference.iter().copied().collect(),
        excluded_shifts: employee.shift_exclusion.iter().copied().collect(),
    }
}
