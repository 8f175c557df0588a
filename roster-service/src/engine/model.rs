//! Explicit records for the roster problem: no field lookup by string at run time.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Shift identifier. `0` always means "off"; `1..=num_shifts` are real shifts.
pub type ShiftId = u32;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("unknown pattern id {0}")]
    UnknownPattern(u32),
    #[error("pattern {pattern_id}: off_days position {position} is out of range [0, {total_days})")]
    OffDayOutOfRange {
        pattern_id: u32,
        position: u32,
        total_days: u32,
    },
    #[error("shift {shift} min_count ({min}) exceeds max_count ({max})")]
    MinExceedsMax { shift: ShiftId, min: u32, max: u32 },
    #[error("max_count for shift {shift} ({max}) exceeds num_employees ({num_employees})")]
    MaxExceedsEmployees {
        shift: ShiftId,
        max: u32,
        num_employees: usize,
    },
    #[error(
        "sum of min_count across shifts ({sum_min}) exceeds num_employees ({num_employees})"
    )]
    MinCountSumExceedsEmployees { sum_min: u32, num_employees: usize },
    #[error("employee {employee}: preferred_shifts and excluded_shifts overlap on shift {shift}")]
    PreferenceExclusionOverlap { employee: usize, shift: ShiftId },
    #[error("employee {employee} references unknown pattern id {pattern_id}")]
    EmployeeUnknownPattern { employee: usize, pattern_id: u32 },
}

/// A repeating work/off cycle. Position `p` (0-indexed, `p < total_days`) is an
/// off position iff `p` is in `off_days`.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub total_days: u32,
    pub off_days: HashSet<u32>,
}

impl Pattern {
    pub fn validate(&self, pattern_id: u32) -> Result<(), ConfigError> {
        for &position in &self.off_days {
            if position >= self.total_days {
                return Err(ConfigError::OffDayOutOfRange {
                    pattern_id,
                    position,
                    total_days: self.total_days,
                });
            }
        }
        Ok(())
    }
}

/// Per-shift staffing bounds, keyed by shift id (`1..=num_shifts`).
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub min_count: BTreeMap<ShiftId, u32>,
    pub max_count: BTreeMap<ShiftId, u32>,
}

impl Constraints {
    pub fn min_for(&self, shift: ShiftId) -> u32 {
        self.min_count.get(&shift).copied().unwrap_or(0)
    }

    pub fn max_for(&self, shift: ShiftId, num_employees: usize) -> u32 {
        self.max_count
            .get(&shift)
            .copied()
            .unwrap_or(num_employees as u32)
    }

    pub fn sum_min(&self) -> u32 {
        self.min_count.values().sum()
    }

    pub fn sum_max(&self) -> u32 {
        self.max_count.values().sum()
    }
}

/// Static, per-employee profile: pattern assignment, prior-day shift, leave days
/// and preference/exclusion sets. Does not change over the horizon.
#[derive(Debug, Clone)]
pub struct EmployeeProfile {
    pub pattern_id: u32,
    pub initial_pattern_pos: u32,
    pub prev_shift: ShiftId,
    pub initial_quality: Vec<u32>,
    pub leave_days: HashSet<u32>,
    pub preferred_shifts: HashSet<ShiftId>,
    pub excluded_shifts: HashSet<ShiftId>,
}

/// Immutable for the lifetime of a run. Built once by the config adapter.
#[derive(Debug, Clone)]
pub struct Problem {
    pub num_employees: usize,
    pub num_shifts: u32,
    pub patterns: BTreeMap<u32, Pattern>,
    pub forbidden_pairs: HashSet<(ShiftId, ShiftId)>,
    pub constraints: Constraints,
    pub threshold: usize,
    pub quality_cap: u32,
    pub horizon_days: u32,
    pub csp_time_limit: Duration,
    pub employees: Vec<EmployeeProfile>,
}

impl Problem {
    pub const DEFAULT_THRESHOLD: usize = 10;
    pub const DEFAULT_QUALITY_CAP: u32 = 100;
    pub const DEFAULT_CSP_TIME_LIMIT: Duration = Duration::from_secs(30);

    /// Checks the static shape invariants a well-formed `Problem` must satisfy.
    /// Called once by the config adapter right after construction; the engine's
    /// other components assume these hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&pattern_id, pattern) in &self.patterns {
            pattern.validate(pattern_id)?;
        }

        for (&shift, &min) in &self.constraints.min_count {
            let max = self.constraints.max_for(shift, self.num_employees);
            if min > max {
                return Err(ConfigError::MinExceedsMax { shift, min, max });
            }
            if max as usize > self.num_employees {
                return Err(ConfigError::MaxExceedsEmployees {
                    shift,
                    max,
                    num_employees: self.num_employees,
                });
            }
        }

        let sum_min = self.constraints.sum_min();
        if sum_min as usize > self.num_employees {
            return Err(ConfigError::MinCountSumExceedsEmployees {
                sum_min,
                num_employees: self.num_employees,
            });
        }

        for (i, employee) in self.employees.iter().enumerate() {
            if !self.patterns.contains_key(&employee.pattern_id) {
                return Err(ConfigError::EmployeeUnknownPattern {
                    employee: i,
                    pattern_id: employee.pattern_id,
                });
            }
            if let Some(&shift) = employee
                .preferred_shifts
                .intersection(&employee.excluded_shifts)
                .next()
            {
                return Err(ConfigError::PreferenceExclusionOverlap {
                    employee: i,
                    shift,
                });
            }
        }

        Ok(())
    }

    pub fn pattern(&self, pattern_id: u32) -> Result<&Pattern, ConfigError> {
        self.patterns
            .get(&pattern_id)
            .ok_or(ConfigError::UnknownPattern(pattern_id))
    }
}
