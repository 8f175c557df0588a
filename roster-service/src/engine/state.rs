//! Mutable-by-replacement carry state threaded day to day through the search.

use super::model::{Problem, ShiftId};

/// Everything the solver needs to know about "where we are" after some prefix
/// of days has been assigned. Cheap to clone; [`State::advance`] always returns
/// a new owned value rather than mutating `self`, so a caller holding a `State`
/// for day `d` can keep it around while trying several candidate assignments
/// for day `d` without it changing under them.
#[derive(Debug, Clone)]
pub struct State {
    pub day: u32,
    pub pattern_pos: Vec<u32>,
    pub yesterday: Vec<ShiftId>,
    pub quality: Vec<Vec<u32>>,
    pub schedule: Vec<Vec<ShiftId>>,
}

impl State {
    /// Builds the state just before day 0: pattern positions and previous-day
    /// shifts seeded from each employee's profile, quality counters seeded from
    /// `initial_quality`, and an empty schedule.
    pub fn initial(problem: &Problem) -> Self {
        let pattern_pos = problem
            .employees
            .iter()
            .map(|e| e.initial_pattern_pos)
            .collect();
        let yesterday = problem.employees.iter().map(|e| e.prev_shift).collect();
        let quality = problem
            .employees
            .iter()
            .map(|e| e.initial_quality.clone())
            .collect();

        State {
            day: 0,
            pattern_pos,
            yesterday,
            quality,
            schedule: Vec::new(),
        }
    }

    /// Produces the state for `self.day + 1` given this day's assignment and
    /// `quality`, already normalized by the day-solver's own post-processing
    /// (§4.3). The driver just carries it forward; normalizing again here
    /// would be redundant (normalization is idempotent, but the data flow
    /// should only do it once).
    pub fn advance(&self, day_assignment: &[ShiftId], quality: Vec<Vec<u32>>) -> State {
        let mut pattern_pos = self.pattern_pos.clone();
        for pos in pattern_pos.iter_mut() {
            *pos += 1;
        }

        let mut schedule = self.schedule.clone();
        schedule.push(day_assignment.to_vec());

        State {
            day: self.day + 1,
            pattern_pos,
            yesterday: day_assignment.to_vec(),
            quality,
            schedule,
        }
    }
}

/// Subtracts, per employee (row), the minimum value across that employee's
/// shifts, then clamps every entry to `quality_cap`.
pub(crate) fn normalize_quality(problem: &Problem, mut quality: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
    for row in quality.iter_mut() {
        let min = row.iter().copied().min().unwrap_or(0);
        if min > 0 {
            for value in row.iter_mut() {
                *value -= min;
            }
        }
        for value in row.iter_mut() {
            *value = (*value).min(problem.quality_cap);
        }
    }
    quality
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{Constraints, EmployeeProfile, Pattern};
    use std::collections::{BTreeMap, HashSet};
    use std::time::Duration;

    fn problem(num_employees: usize) -> Problem {
        let mut patterns = BTreeMap::new();
        patterns.insert(
            0,
            Pattern {
                total_days: 7,
                off_days: HashSet::from([5, 6]),
            },
        );
        let employees = (0..num_employees)
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
            num_employees,
            num_shifts: 2,
            patterns,
            forbidden_pairs: HashSet::new(),
            constraints: Constraints::default(),
            threshold: Problem::DEFAULT_THRESHOLD,
            quality_cap: 100,
            horizon_days: 14,
            csp_time_limit: Duration::from_secs(1),
            employees,
        }
    }

    #[test]
    fn initial_state_seeds_from_profiles() {
        let problem = problem(2);
        let state = State::initial(&problem);
        assert_eq!(state.day, 0);
        assert_eq!(state.pattern_pos, vec![0, 0]);
        assert_eq!(state.yesterday, vec![0, 0]);
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn advance_bumps_day_and_pattern_position() {
        let problem = problem(2);
        let state = State::initial(&problem);
        let next = state.advance(&[1, 2], vec![vec![3, 0], vec![0, 1]]);
        assert_eq!(next.day, 1);
        assert_eq!(next.pattern_pos, vec![1, 1]);
        assert_eq!(next.yesterday, vec![1, 2]);
        assert_eq!(next.schedule, vec![vec![1, 2]]);
    }

    #[test]
    fn advance_does_not_mutate_the_original() {
        let problem = problem(2);
        let state = State::initial(&problem);
        let _ = state.advance(&[1, 2], vec![vec![3, 0], vec![0, 1]]);
        assert_eq!(state.day, 0);
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn advance_carries_already_normalized_quality_through_unchanged() {
        let problem = problem(2);
        let state = State::initial(&problem);
        let next = state.advance(&[1, 0], vec![vec![0, 4], vec![0, 100]]);
        assert_eq!(next.quality, vec![vec![0, 4], vec![0, 100]]);
    }

    #[test]
    fn normalize_quality_floors_each_row_at_zero_and_caps() {
        let problem = problem(2);
        let normalized = normalize_quality(&problem, vec![vec![5, 9], vec![2, 200]]);
        // row 0: min 5, subtract -> [0, 4]
        // row 1: min 2, subtract -> [0, 198] -> capped at 100 -> [0, 100]
        assert_eq!(normalized, vec![vec![0, 4], vec![0, 100]]);
    }
}
