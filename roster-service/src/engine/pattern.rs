//! Pure off-day lookup over an employee's repeating work pattern.

use super::model::{ConfigError, Pattern, Problem};

/// `is_off(pattern, pos, day_offset)` — whether the day `day_offset` days after
/// pattern position `pos` falls on an off position.
pub fn is_off(pattern: &Pattern, pos: u32, day_offset: u32) -> bool {
    let cycle_pos = (pos + day_offset) % pattern.total_days;
    pattern.off_days.contains(&cycle_pos)
}

/// Looks up `employee_pattern_id` in `problem` and evaluates [`is_off`].
pub fn is_off_for_employee(
    problem: &Problem,
    pattern_id: u32,
    pos: u32,
    day_offset: u32,
) -> Result<bool, ConfigError> {
    let pattern = problem.pattern(pattern_id)?;
    Ok(is_off(pattern, pos, day_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn weekday_pattern() -> Pattern {
        Pattern {
            total_days: 7,
            off_days: HashSet::from([5, 6]),
        }
    }

    #[test]
    fn off_day_within_first_cycle() {
        let pattern = weekday_pattern();
        assert!(!is_off(&pattern, 0, 0));
        assert!(!is_off(&pattern, 0, 4));
        assert!(is_off(&pattern, 0, 5));
        assert!(is_off(&pattern, 0, 6));
    }

    #[test]
    fn wraps_around_the_cycle() {
        let pattern = weekday_pattern();
        assert!(is_off(&pattern, 0, 12));
        assert!(!is_off(&pattern, 0, 13));
    }

    #[test]
    fn initial_position_offsets_the_cycle() {
        let pattern = weekday_pattern();
        assert!(is_off(&pattern, 5, 0));
        assert!(!is_off(&pattern, 5, 2));
    }

    #[test]
    fn unknown_pattern_is_a_config_error() {
        let problem = Problem {
            num_employees: 1,
            num_shifts: 1,
            patterns: Default::default(),
            forbidden_pairs: Default::default(),
            constraints: Default::default(),
            threshold: Problem::DEFAULT_THRESHOLD,
            quality_cap: Problem::DEFAULT_QUALITY_CAP,
            horizon_days: 1,
            csp_time_limit: Problem::DEFAULT_CSP_TIME_LIMIT,
            employees: Vec::new(),
        };
        assert_eq!(
            is_off_for_employee(&problem, 7, 0, 0),
            Err(ConfigError::UnknownPattern(7))
        );
    }
}
