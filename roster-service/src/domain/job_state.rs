use shared::types::{JobStatus, RosterJob};
use uuid::Uuid;

/// wrapper for a job in `Pending` status.
/// consuming `start_processing` into to `ProcessingJob`.
pub struct PendingJob {
    inner: RosterJob,
}

/// wrapper for a job in `Processing` status.
/// consuming `complete` or `fail` into to terminal states.
pub struct ProcessingJob {
    inner: RosterJob,
}

/// Terminal state: job completed successfully.
pub struct CompletedJob {
    inner: RosterJob,
}

/// Terminal state: job failed.
pub struct FailedJob {
    inner: RosterJob,
}

impl PendingJob {
    pub fn from_roster_job(job: RosterJob) -> Option<Self> {
        if job.status == JobStatus::Pending {
            Some(Self { inner: job })
        } else {
            None
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn inner(&self) -> &RosterJob {
        &self.inner
    }

    pub fn start_processing(mut self) -> (ProcessingJob, Uuid, JobStatus) {
        let id = self.inner.id;
        self.inner.status = JobStatus::Processing;
        (
            ProcessingJob { inner: self.inner },
            id,
            JobStatus::Processing,
        )
    }
}

impl ProcessingJob {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn start_date(&self) -> chrono::NaiveDate {
        self.inner.start_date
    }

    pub fn end_date(&self) -> chrono::NaiveDate {
        self.inner.end_date
    }

    pub fn complete(mut self) -> (CompletedJob, Uuid, JobStatus) {
        let id = self.inner.id;
        self.inner.status = JobStatus::Completed;
        (CompletedJob { inner: self.inner }, id, JobStatus::Completed)
    }

    pub fn fail(mut self) -> (FailedJob, Uuid, JobStatus) {
        let id = self.inner.id;
        self.inner.status = JobStatus::Failed;
        (FailedJob { inner: self.inner }, id, JobStatus::Failed)
    }
}

impl CompletedJob {
    pub fn into_inner(self) -> RosterJob {
        self.inner
    }
}

impl FailedJob {
    pub fn into_inner(self) -> RosterJob {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn make_job(status: JobStatus) -> RosterJob {
        RosterJob {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 9).unwrap(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pending_from_pending_job_succeeds() {
        let job = make_job(JobStatus::Pending);
        assert!(PendingJob::from_roster_job(job).is_some());
    }

    #[test]
    fn pending_from_non_pending_job_returns_none() {
        for status in [JobStatus::Processing, JobStatus::Completed, JobStatus::Failed] {
            let job = make_job(status);
            assert!(PendingJob::from_roster_job(job).is_none());
        }
    }

    #[test]
    fn pending_to_processing_transition() {
        let job = make_job(JobStatus::Pending);
        let job_id = job.id;
        let pending = PendingJob::from_roster_job(job).unwrap();

        let (processing, id, status) = pending.start_processing();
        assert_eq!(id, job_id);
        assert_eq!(status, JobStatus::Processing);
        assert_eq!(processing.id(), job_id);
    }

    #[test]
    fn processing_to_completed_transition() {
        let job = make_job(JobStatus::Pending);
        let job_id = job.id;
        let pending = PendingJob::from_roster_job(job).unwrap();
        let (processing, _, _) = pending.start_processing();

        let (completed, id, status) = processing.complete();
        assert_eq!(id, job_id);
        assert_eq!(status, JobStatus::Completed);

        let inner = completed.into_inner();
        assert_eq!(inner.status, JobStatus::Completed);
    }

    #[test]
    fn processing_to_failed_transition() {
        let job = make_job(JobStatus::Pending);
        let job_id = job.id;
        let pending = PendingJob::from_roster_job(job).unwrap();
        let (processing, _, _) = pending.start_processing();

        let (failed, id, status) = processing.fail();
        assert_eq!(id, job_id);
        assert_eq!(status, JobStatus::Failed);

        let inner = failed.into_inner();
        assert_eq!(inner.status, JobStatus::Failed);
    }
}
