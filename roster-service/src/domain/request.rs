//! The roster-generation request document accepted at `POST /api/v1/rosters`.
//!
//! Field names and shapes mirror the structured document the original
//! adapter consumed (including its `pettern_id` spelling, kept verbatim so a
//! caller migrating an existing integration does not have to rename a key).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftDefinition {
    pub shift_id: u32,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "16:00:00")]
    pub end_time: NaiveTime,
    pub min_no_of_employees: u32,
    pub max_no_of_employees: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkPatternInput {
    #[serde(rename = "pettern_id")]
    pub pattern_id: u32,
    pub no_working_days: u32,
    pub no_off_days: u32,
    #[serde(default)]
    pub strict_weekend_off: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeInput {
    pub preferred_work_pattern: u32,
    pub no_work_days_from_previous_pattern: u32,
    pub no_off_days_from_previous_pattern: u32,
    pub last_shift: u32,
    pub quality: Vec<u32>,
    #[serde(default)]
    pub leaves: Vec<LeaveRange>,
    #[serde(default)]
    pub shift_preference: Vec<u32>,
    #[serde(default)]
    pub shift_exclusion: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRosterRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub no_of_employees: u32,
    pub no_of_shifts: u32,
    pub shifts: Vec<ShiftDefinition>,
    pub min_time_between_shifts: u32,
    pub work_pattern: Vec<WorkPatternInput>,
    pub employees: Vec<EmployeeInput>,
    pub threshold: Option<usize>,
    pub quality_cap: Option<u32>,
    pub csp_time_limit_secs: Option<u64>,
}
