use async_trait::async_trait;
use chrono::NaiveDate;
use shared::types::{JobStatus, RosterJob, ShiftAssignment};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::job::{JobRepository, NewShiftAssignment},
    error::RosterServiceError,
};

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[tracing::instrument(skip(self, request_payload))]
    async fn create_job(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        request_payload: serde_json::Value,
    ) -> Result<RosterJob, RosterServiceError> {
        let output = sqlx::query_as!(RosterJob,
            r#"
            INSERT INTO roster_jobs (start_date, end_date, request_payload)
            VALUES ($1, $2, $3)
            RETURNING id, start_date, end_date, status AS "status: _", created_at, updated_at
            "#,
            start_date,
            end_date,
            request_payload
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RosterJob>, RosterServiceError> {
        let output = sqlx::query_as!(
            RosterJob,
            r#"
            SELECT id, start_date, end_date, status AS "status: _", created_at, updated_at
            FROM roster_jobs
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_request_payload(
        &self,
        id: Uuid,
    ) -> Result<Option<serde_json::Value>, RosterServiceError> {
        let output = sqlx::query!(
            r#"
            SELECT request_payload
            FROM roster_jobs
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(output.map(|row| row.request_payload))
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<(), RosterServiceError> {
        let output = sqlx::query!(
            r#"
            UPDATE roster_jobs
            SET status = $2, updated_at = now()
            WHERE id = $1
            "#,
            id,
            status as _,
        )
        .execute(&self.pool)
        .await?;

        if output.rows_affected() == 0 {
            return Err(RosterServiceError::NotFound(format!(
                "Roster job {id} not found"
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, assignments))]
    async fn save_assignments(
        &self,
        job_id: Uuid,
        assignments: Vec<NewShiftAssignment>,
    ) -> Result<(), RosterServiceError> {
        let job_ids: Vec<Uuid> = vec![job_id; assignments.len()];
        let employee_indices: Vec<i32> = assignments.iter().map(|a| a.employee_index).collect();
        let dates: Vec<NaiveDate> = assignments.iter().map(|a| a.date).collect();
        let shift_ids: Vec<i32> = assignments.iter().map(|a| a.shift_id).collect();

        sqlx::query(
            r#"
            INSERT INTO shift_assignments (job_id, employee_index, date, shift_id)
            SELECT * FROM UNNEST($1::uuid[], $2::int[], $3::date[], $4::int[])
            "#,
        )
        .bind(&job_ids)
        .bind(&employee_indices)
        .bind(&dates)
        .bind(&shift_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_assignments(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ShiftAssignment>, RosterServiceError> {
        let output = sqlx::query_as!(
            ShiftAssignment,
            r#"
            SELECT id, job_id, employee_index, date, shift_id
            FROM shift_assignments
            WHERE job_id = $1
            ORDER BY employee_index, date
            "#,
            job_id
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<RosterJob>, RosterServiceError> {
        let output = sqlx::query_as!(
            RosterJob,
            r#"
            SELECT id, start_date, end_date, status AS "status: _", created_at, updated_at
            FROM roster_jobs
            WHERE status = $1
            ORDER BY created_at ASC
            "#,
            status as _,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_assignments(&self, job_id: Uuid) -> Result<(), RosterServiceError> {
        sqlx::query!(
            r#"
            DELETE FROM shift_assignments
            WHERE job_id = $1
            "#,
            job_id
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
