use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tokio_util::task::TaskTracker;
use tracing::Instrument;
use uuid::Uuid;

use shared::types::{JobStatus, RosterJob, RosterResult};

use crate::domain::job::{JobRepository, NewShiftAssignment};
use crate::domain::job_state::PendingJob;
use crate::domain::request::GenerateRosterRequest;
use crate::engine::{self, RosterOutcome, Severity, ShiftId};
use crate::error::RosterServiceError;
use crate::infrastructure::config;

/// Orchestrates roster-job lifecycle: submission, background processing
/// through the engine, status/result queries, and recovery of jobs left
/// mid-flight by a crash.
pub struct RosterJobService {
    job_repo: Arc<dyn JobRepository>,
    task_tracker: TaskTracker,
}

impl RosterJobService {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self {
            job_repo,
            task_tracker: TaskTracker::new(),
        }
    }

    pub fn task_tracker(&self) -> &TaskTracker {
        &self.task_tracker
    }

    /// Validates the request shape, persists a new `Pending` job alongside its
    /// request payload, and spawns asynchronous processing. Returns
    /// immediately (fire-and-forget); the engine run itself never blocks the
    /// caller.
    #[tracing::instrument(skip(self, request))]
    pub async fn submit(
        &self,
        request: GenerateRosterRequest,
    ) -> Result<RosterJob, RosterServiceError> {
        if request.end_date < request.start_date {
            return Err(RosterServiceError::BadRequest(
                "end_date must not be before start_date".into(),
            ));
        }
        if request.employees.is_empty() {
            return Err(RosterServiceError::BadRequest(
                "employees must not be empty".into(),
            ));
        }

        let request_payload = serde_json::to_value(&request).map_err(|e| {
            RosterServiceError::Internal(format!("failed to serialize request: {e}"))
        })?;

        let job = self
            .job_repo
            .create_job(request.start_date, request.end_date, request_payload)
            .await?;

        let pending_job = PendingJob::from_roster_job(job.clone()).ok_or_else(|| {
            let job_id = job.id;
            let job_status = job.status;
            RosterServiceError::Internal(format!(
                "Newly created job {job_id} has unexpected status {job_status:?}"
            ))
        })?;

        self.spawn_process_job(pending_job, request);

        Ok(job)
    }

    /// Spawns a background task running `process_job`, tracked via
    /// `task_tracker` so graceful shutdown can wait for in-flight runs.
    pub fn spawn_process_job(&self, pending_job: PendingJob, request: GenerateRosterRequest) {
        let job_id = pending_job.id();
        let repo = Arc::clone(&self.job_repo);

        let span = tracing::info_span!("process_roster_job", %job_id);
        self.task_tracker.spawn(
            async move {
                if let Err(e) = process_job(pending_job, request, repo).await {
                    tracing::error!("Job {job_id} failed: {e}");
                }
            }
            .instrument(span),
        );
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_status(&self, job_id: Uuid) -> Result<RosterJob, RosterServiceError> {
        self.job_repo
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| RosterServiceError::NotFound(format!("Roster job {job_id} not found")))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_result(&self, job_id: Uuid) -> Result<RosterResult, RosterServiceError> {
        let job = self.get_status(job_id).await?;

        if job.status != JobStatus::Completed {
            let status = job.status;
            return Err(RosterServiceError::BadRequest(format!(
                "Job is not completed, current status: {status:?}"
            )));
        }

        let assignments = self.job_repo.get_assignments(job_id).await?;

        Ok(RosterResult {
            job_id: job.id,
            start_date: job.start_date,
            end_date: job.end_date,
            assignments,
        })
    }

    /// Resets jobs left `Processing` by a previous crash back to `Pending` and
    /// re-spawns them from their persisted request payload. `Problem`/`State`
    /// are never themselves persisted, only the request that produced them —
    /// see [`crate::domain::job::JobRepository::find_request_payload`].
    #[tracing::instrument(skip(self))]
    pub async fn recover_stale_jobs(&self) -> Result<(), RosterServiceError> {
        let stale_jobs = self.job_repo.find_by_status(JobStatus::Processing).await?;

        if stale_jobs.is_empty() {
            tracing::info!("No stale jobs to recover");
            return Ok(());
        }

        tracing::info!(count = stale_jobs.len(), "Recovering stale jobs");
        for job in stale_jobs {
            let job_id = job.id;
            tracing::info!(%job_id, "Recovering stale job");

            self.job_repo.delete_assignments(job_id).await?;
            self.job_repo
                .update_status(job_id, JobStatus::Pending)
                .await?;
            self.respawn_as_pending(job_id).await?;
        }

        Ok(())
    }

    async fn respawn_as_pending(&self, job_id: Uuid) -> Result<(), RosterServiceError> {
        let Some(payload) = self.job_repo.find_request_payload(job_id).await? else {
            tracing::warn!(%job_id, "No stored request payload, cannot respawn");
            return Ok(());
        };
        let request: GenerateRosterRequest = match serde_json::from_value(payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(%job_id, "Stored request payload is malformed: {e}");
                return Ok(());
            }
        };
        let Some(job) = self.job_repo.find_by_id(job_id).await? else {
            return Ok(());
        };
        if let Some(pending) = PendingJob::from_roster_job(job) {
            self.spawn_process_job(pending, request);
        } else {
            tracing::warn!(%job_id, "Job no longer in Pending status after reset");
        }
        Ok(())
    }
}

/// Processes a single roster job: builds the engine `Problem`/`State` from
/// the stored request, runs the feasibility pre-check, then the backtracking
/// driver, and persists whatever came of it.
#[tracing::instrument(skip(pending_job, request, repo), fields(job_id = %pending_job.id()))]
async fn process_job(
    pending_job: PendingJob,
    request: GenerateRosterRequest,
    repo: Arc<dyn JobRepository>,
) -> Result<(), RosterServiceError> {
    tracing::info!("Processing roster job");

    let (processing_job, job_id, status) = pending_job.start_processing();
    repo.update_status(job_id, status).await?;

    let start_date = processing_job.start_date();

    let (problem, state) = match config::build_problem(&request) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("Failed to build problem: {e}");
            repo.update_status(job_id, JobStatus::Failed).await?;
            return Err(RosterServiceError::Config(e));
        }
    };

    let (feasible, messages) = engine::check_feasibility(&problem);
    for message in &messages {
        match message.severity {
            Severity::Error => tracing::error!(%job_id, "{}", message.text),
            Severity::Warning => tracing::warn!(%job_id, "{}", message.text),
        }
    }
    if !feasible {
        repo.update_status(job_id, JobStatus::Failed).await?;
        let reason = messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .map(|m| m.text.clone())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(RosterServiceError::Infeasible(reason));
    }

    match engine::generate_roster(&problem, state) {
        Ok(RosterOutcome::Success(success)) => {
            let assignments = schedule_to_assignments(start_date, &success.schedule);
            repo.save_assignments(job_id, assignments).await?;
            repo.update_status(job_id, JobStatus::Completed).await?;
            tracing::info!("Roster job completed");
            Ok(())
        }
        Ok(RosterOutcome::Failure(failure)) => {
            tracing::warn!(
                last_day_reached = failure.last_day_reached,
                "Roster search exhausted"
            );
            repo.update_status(job_id, JobStatus::Failed).await?;
            Err(RosterServiceError::Internal(format!(
                "roster search exhausted at day {}",
                failure.last_day_reached
            )))
        }
        Err(e) => {
            tracing::error!("Roster engine failed: {e}");
            repo.update_status(job_id, JobStatus::Failed).await?;
            Err(RosterServiceError::Engine(e))
        }
    }
}

fn schedule_to_assignments(
    start_date: NaiveDate,
    schedule: &[Vec<ShiftId>],
) -> Vec<NewShiftAssignment> {
    schedule
        .iter()
        .enumerate()
        .flat_map(|(day, assignment)| {
            let date = start_date + Days::new(day as u64);
            assignment
                .iter()
                .enumerate()
                .map(move |(employee_index, &shift_id)| NewShiftAssignment {
                    employee_index: employee_index as i32,
                    date,
                    shift_id: shift_id as i32,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::MockJobRepository;
    use crate::domain::request::{EmployeeInput, GenerateRosterRequest, ShiftDefinition, WorkPatternInput};
    use chrono::NaiveTime;
    use std::sync::Mutex;

    fn make_service(job_repo: MockJobRepository) -> RosterJobService {
        RosterJobService::new(Arc::new(job_repo))
    }

    fn make_job(id: Uuid, status: JobStatus) -> RosterJob {
        RosterJob {
            id,
            start_date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            status,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn trivial_request() -> GenerateRosterRequest {
        GenerateRosterRequest {
            start_date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            no_of_employees: 5,
            no_of_shifts: 2,
            shifts: vec![
                ShiftDefinition {
                    shift_id: 1,
                    start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                    min_no_of_employees: 1,
                    max_no_of_employees: 5,
                },
                ShiftDefinition {
                    shift_id: 2,
                    start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
                    min_no_of_employees: 1,
                    max_no_of_employees: 5,
                },
            ],
            min_time_between_shifts: 0,
            work_pattern: vec![WorkPatternInput {
                pattern_id: 1,
                no_working_days: 5,
                no_off_days: 2,
                strict_weekend_off: false,
            }],
            employees: (0..5)
                .map(|_| EmployeeInput {
                    preferred_work_pattern: 1,
                    no_work_days_from_previous_pattern: 0,
                    no_off_days_from_previous_pattern: 0,
                    last_shift: 0,
                    quality: vec![0, 0],
                    leaves: Vec::new(),
                    shift_preference: Vec::new(),
                    shift_exclusion: Vec::new(),
                })
                .collect(),
            threshold: None,
            quality_cap: None,
            csp_time_limit_secs: None,
        }
    }

    #[tokio::test]
    async fn submit_rejects_end_before_start() {
        let repo = MockJobRepository::new();
        let svc = make_service(repo);
        let mut request = trivial_request();
        request.end_date = request.start_date - chrono::Duration::days(1);

        let result = svc.submit(request).await;
        assert!(matches!(result, Err(RosterServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn get_status_not_found() {
        let mut repo = MockJobRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let svc = make_service(repo);

        let result = svc.get_status(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RosterServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_result_not_completed() {
        let mut repo = MockJobRepository::new();
        let job = make_job(Uuid::new_v4(), JobStatus::Processing);
        let job_id = job.id;
        repo.expect_find_by_id().returning(move |_| Ok(Some(job.clone())));
        let svc = make_service(repo);

        let result = svc.get_result(job_id).await;
        assert!(matches!(result, Err(RosterServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn get_result_returns_result_with_metadata() {
        let mut repo = MockJobRepository::new();
        let job = make_job(Uuid::new_v4(), JobStatus::Completed);
        let job_id = job.id;
        let start_date = job.start_date;
        repo.expect_find_by_id().returning(move |_| Ok(Some(job.clone())));

        let assignment = NewShiftAssignment {
            employee_index: 0,
            date: start_date,
            shift_id: 1,
        };
        repo.expect_get_assignments().returning(move |job_id| {
            Ok(vec![shared::types::ShiftAssignment {
                id: Uuid::new_v4(),
                job_id,
                employee_index: assignment.employee_index,
                date: assignment.date,
                shift_id: assignment.shift_id,
            }])
        });

        let svc = make_service(repo);
        let result = svc.get_result(job_id).await.unwrap();

        assert_eq!(result.job_id, job_id);
        assert_eq!(result.start_date, start_date);
        assert_eq!(result.assignments.len(), 1);
    }

    #[tokio::test]
    async fn process_job_happy_path_persists_schedule_and_completes() {
        let job = make_job(Uuid::new_v4(), JobStatus::Pending);
        let pending = PendingJob::from_roster_job(job).unwrap();

        let mut repo = MockJobRepository::new();
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let statuses_clone = statuses.clone();
        repo.expect_update_status().returning(move |_, status| {
            statuses_clone.lock().unwrap().push(status);
            Ok(())
        });

        let saved = Arc::new(Mutex::new(Vec::<NewShiftAssignment>::new()));
        let saved_clone = saved.clone();
        repo.expect_save_assignments().returning(move |_, assignments| {
            *saved_clone.lock().unwrap() = assignments;
            Ok(())
        });

        let output = process_job(pending, trivial_request(), Arc::new(repo)).await;
        assert!(output.is_ok(), "{output:?}");

        let recorded = statuses.lock().unwrap();
        assert_eq!(*recorded, vec![JobStatus::Processing, JobStatus::Completed]);

        let assignments = saved.lock().unwrap();
        // 3 days * 5 employees
        assert_eq!(assignments.len(), 15);
    }

    #[tokio::test]
    async fn process_job_infeasible_marks_failed() {
        let job = make_job(Uuid::new_v4(), JobStatus::Pending);
        let pending = PendingJob::from_roster_job(job).unwrap();

        let mut repo = MockJobRepository::new();
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let statuses_clone = statuses.clone();
        repo.expect_update_status().returning(move |_, status| {
            statuses_clone.lock().unwrap().push(status);
            Ok(())
        });

        let mut request = trivial_request();
        request.shifts[0].min_no_of_employees = 10;

        let output = process_job(pending, request, Arc::new(repo)).await;
        assert!(matches!(output, Err(RosterServiceError::Infeasible(_))));

        let recorded = statuses.lock().unwrap();
        assert_eq!(*recorded, vec![JobStatus::Processing, JobStatus::Failed]);
    }
}
