//! Read-only views over a job list, shared by the HTTP handlers and export.

use serde::Serialize;
use serde_json::Value;

use crate::config::SummaryMode;
use crate::error::{Result, StatusError};
use crate::job::{JobRecord, JobStatus};

/// Attributes in a summary row, in output order.
pub const SUMMARY_FIELDS: [&str; 6] = [
    JobRecord::GLOBAL_JOB_ID,
    JobRecord::CLUSTER_ID,
    JobRecord::Q_DATE,
    JobRecord::OWNER,
    JobRecord::CMD,
    JobRecord::JOB_STATUS,
];

/// Body of `jobs.json`: the snapshot exactly as fetched.
#[derive(Debug, Serialize)]
pub struct JobList<'a> {
    pub jobs: &'a [JobRecord],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JobCounts {
    pub total: usize,
    pub idle: usize,
    pub running: usize,
    pub held: usize,
}

impl JobCounts {
    /// Jobs with any status other than idle, running or held still count
    /// toward `total`.
    pub fn from_jobs(jobs: &[JobRecord]) -> Self {
        let mut counts = JobCounts {
            total: jobs.len(),
            ..Default::default()
        };
        for job in jobs {
            match job.status() {
                Some(JobStatus::Idle) => counts.idle += 1,
                Some(JobStatus::Running) => counts.running += 1,
                Some(JobStatus::Held) => counts.held += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    #[serde(rename = "GlobalJobId")]
    pub global_job_id: Value,
    #[serde(rename = "ClusterId")]
    pub cluster_id: Value,
    #[serde(rename = "QDate")]
    pub q_date: Value,
    #[serde(rename = "Owner")]
    pub owner: Value,
    #[serde(rename = "Cmd")]
    pub cmd: Value,
    #[serde(rename = "JobStatus")]
    pub job_status: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub index: usize,
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub jobs: Vec<JobSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<MissingField>,
}

/// Project each job onto [`SUMMARY_FIELDS`].
///
/// In strict mode the first record lacking a field fails the whole
/// projection. In lenient mode the value becomes `null` and the gap is
/// listed in `missing`.
pub fn summarize(jobs: &[JobRecord], mode: SummaryMode) -> Result<SummaryReport> {
    let mut missing = Vec::new();
    let mut rows = Vec::with_capacity(jobs.len());

    for (index, job) in jobs.iter().enumerate() {
        let mut take = |field: &'static str| -> Result<Value> {
            match job.get(field) {
                Some(value) => Ok(value.clone()),
                None if mode == SummaryMode::Strict => {
                    Err(StatusError::MissingField { index, field })
                }
                None => {
                    missing.push(MissingField { index, field });
                    Ok(Value::Null)
                }
            }
        };

        rows.push(JobSummary {
            global_job_id: take(JobRecord::GLOBAL_JOB_ID)?,
            cluster_id: take(JobRecord::CLUSTER_ID)?,
            q_date: take(JobRecord::Q_DATE)?,
            owner: take(JobRecord::OWNER)?,
            cmd: take(JobRecord::CMD)?,
            job_status: take(JobRecord::JOB_STATUS)?,
        });
    }

    if !missing.is_empty() {
        tracing::warn!(
            missing = missing.len(),
            "Job records are missing summary fields"
        );
    }

    Ok(SummaryReport {
        jobs: rows,
        missing,
    })
}
