use async_trait::async_trait;
use chrono::NaiveDate;
use shared::types::{JobStatus, RosterJob, ShiftAssignment};
use uuid::Uuid;

use crate::error::RosterServiceError;

/// A shift assignment to be persisted, before it has a database-generated ID.
#[derive(Debug, Clone)]
pub struct NewShiftAssignment {
    pub employee_index: i32,
    pub date: NaiveDate,
    pub shift_id: i32,
}

/// Persistence operations for roster jobs and their shift assignments.
///
/// `request_payload` is the original `GenerateRosterRequest`, stored verbatim
/// as JSON alongside the job row: the engine's `Problem`/`State` are rebuilt
/// from it on crash recovery, since they are never themselves persisted.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        request_payload: serde_json::Value,
    ) -> Result<RosterJob, RosterServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RosterJob>, RosterServiceError>;
    async fn find_request_payload(
        &self,
        id: Uuid,
    ) -> Result<Option<serde_json::Value>, RosterServiceError>;
    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<(), RosterServiceError>;
    async fn save_assignments(
        &self,
        job_id: Uuid,
        assignments: Vec<NewShiftAssignment>,
    ) -> Result<(), RosterServiceError>;
    async fn get_assignments(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ShiftAssignment>, RosterServiceError>;
    async fn find_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<RosterJob>, RosterServiceError>;
    async fn delete_assignments(&self, job_id: Uuid) -> Result<(), RosterServiceError>;
}
