use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

// region: Roster Service Types

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RosterJob {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One employee/day shift assignment, persisted once a roster job completes.
///
/// `shift_id` is the raw 0..=K identifier from the engine: 0 means off, otherwise
/// it is the 1-based shift id from the request's `shifts[]` list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShiftAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub employee_index: i32,
    pub date: NaiveDate,
    pub shift_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResult {
    pub job_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assignments: Vec<ShiftAssignment>,
}

// endregion: Roster Service Types
