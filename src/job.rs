use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTCondor `JobStatus` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Idle,
    Running,
    Removed,
    Completed,
    Held,
    TransferringOutput,
    Suspended,
}

impl JobStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(JobStatus::Idle),
            2 => Some(JobStatus::Running),
            3 => Some(JobStatus::Removed),
            4 => Some(JobStatus::Completed),
            5 => Some(JobStatus::Held),
            6 => Some(JobStatus::TransferringOutput),
            7 => Some(JobStatus::Suspended),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            JobStatus::Idle => 1,
            JobStatus::Running => 2,
            JobStatus::Removed => 3,
            JobStatus::Completed => 4,
            JobStatus::Held => 5,
            JobStatus::TransferringOutput => 6,
            JobStatus::Suspended => 7,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Idle => write!(f, "idle"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Removed => write!(f, "removed"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Held => write!(f, "held"),
            JobStatus::TransferringOutput => write!(f, "transferring output"),
            JobStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// One job ClassAd as printed by `condor_q -json`.
///
/// The attribute set is open ended, so the record keeps every attribute it
/// was given and serializes back out unchanged. Accessors cover the
/// attributes the projections need.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord(Map<String, Value>);

impl JobRecord {
    pub const JOB_STATUS: &'static str = "JobStatus";
    pub const CLUSTER_ID: &'static str = "ClusterId";
    pub const GLOBAL_JOB_ID: &'static str = "GlobalJobId";
    pub const Q_DATE: &'static str = "QDate";
    pub const OWNER: &'static str = "Owner";
    pub const CMD: &'static str = "Cmd";

    pub fn new(attrs: Map<String, Value>) -> Self {
        Self(attrs)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Raw `JobStatus` code. Non-integer values read as absent.
    pub fn status_code(&self) -> Option<i64> {
        self.0.get(Self::JOB_STATUS).and_then(Value::as_i64)
    }

    pub fn status(&self) -> Option<JobStatus> {
        self.status_code().and_then(JobStatus::from_code)
    }

    pub fn cluster_id(&self) -> Option<i64> {
        self.0.get(Self::CLUSTER_ID).and_then(Value::as_i64)
    }

    pub fn global_job_id(&self) -> Option<&str> {
        self.0.get(Self::GLOBAL_JOB_ID).and_then(Value::as_str)
    }

    pub fn owner(&self) -> Option<&str> {
        self.0.get(Self::OWNER).and_then(Value::as_str)
    }

    pub fn cmd(&self) -> Option<&str> {
        self.0.get(Self::CMD).and_then(Value::as_str)
    }

    /// Submission time, stored by HTCondor as seconds since the epoch.
    pub fn q_date(&self) -> Option<DateTime<Utc>> {
        self.0
            .get(Self::Q_DATE)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl From<Map<String, Value>> for JobRecord {
    fn from(attrs: Map<String, Value>) -> Self {
        Self(attrs)
    }
}

/// The full job list from one refresh. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSnapshot {
    pub jobs: Vec<JobRecord>,
    /// `None` for the empty snapshot that exists before the first refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl JobSnapshot {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs,
            refreshed_at: Some(Utc::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
