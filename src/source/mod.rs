pub mod condor_q;
pub mod sample;

use std::future::Future;

pub use condor_q::CondorQ;
pub use sample::SampleSource;

use crate::config::SourceConfig;
use crate::error::Result;
use crate::job::{JobRecord, JobSnapshot};

/// Something that can produce the current list of jobs.
///
/// Transient failures are the implementation's problem and must come back
/// as `Ok` with an empty list. `Err` is reserved for broken deployments.
pub trait JobSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<JobRecord>>> + Send;
}

/// The job source selected by configuration.
#[derive(Debug, Clone)]
pub enum Source {
    CondorQ(CondorQ),
    Simulated(SampleSource),
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Self {
        if config.simulate {
            match &config.sample_path {
                Some(path) => Source::Simulated(SampleSource::from_path(path)),
                None => Source::Simulated(SampleSource::bundled()),
            }
        } else {
            Source::CondorQ(CondorQ::from_config(config))
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Source::Simulated(_))
    }
}

impl JobSource for Source {
    async fn fetch(&self) -> Result<Vec<JobRecord>> {
        match self {
            Source::CondorQ(q) => Ok(q.query().await),
            Source::Simulated(sample) => sample.simulate().await,
        }
    }
}

/// Fetch the current jobs once, either from `condor_q` or from the bundled sample.
pub async fn fetch_jobs(
    simulate: bool,
    include_all: bool,
    include_global: bool,
) -> Result<JobSnapshot> {
    let config = SourceConfig {
        simulate,
        include_all,
        include_global,
        ..Default::default()
    };
    let jobs = Source::from_config(&config).fetch().await?;
    Ok(JobSnapshot::new(jobs))
}
