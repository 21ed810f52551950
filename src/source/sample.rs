use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, StatusError};
use crate::job::JobRecord;

/// Sample `condor_q -json` output shipped with the binary.
pub const BUNDLED_SAMPLE: &str = include_str!("sample_condor_q_output.json");

/// Stand-in for `condor_q` that serves random subsets of recorded output.
///
/// Every fetch picks between 1 and N-1 distinct records in random order, so
/// the dashboard visibly changes from one refresh to the next. Errors only
/// when the sample itself is unreadable or has fewer than two records.
#[derive(Debug, Clone, Default)]
pub struct SampleSource {
    path: Option<PathBuf>,
}

impl SampleSource {
    /// Use the bundled sample.
    pub fn bundled() -> Self {
        Self { path: None }
    }

    /// Read the sample from `path` on every fetch.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub async fn load(&self) -> Result<Vec<JobRecord>> {
        match &self.path {
            None => parse_sample(BUNDLED_SAMPLE),
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|source| {
                    StatusError::SampleAsset {
                        path: path.clone(),
                        source,
                    }
                })?;
                parse_sample(&text)
            }
        }
    }

    pub async fn simulate(&self) -> Result<Vec<JobRecord>> {
        let data = self.load().await?;
        Ok(random_subset(data, &mut rand::thread_rng()))
    }
}

pub fn parse_sample(text: &str) -> Result<Vec<JobRecord>> {
    let jobs: Vec<JobRecord> =
        serde_json::from_str(text).map_err(|e| StatusError::InvalidSample(e.to_string()))?;
    if jobs.len() < 2 {
        return Err(StatusError::InvalidSample(format!(
            "need at least 2 records to draw a proper subset, found {}",
            jobs.len()
        )));
    }
    Ok(jobs)
}

/// Draw a random proper, non-empty subset without replacement.
///
/// Callers guarantee `data.len() >= 2`.
pub fn random_subset<R: Rng>(mut data: Vec<JobRecord>, rng: &mut R) -> Vec<JobRecord> {
    let total = data.len();
    let k = rng.gen_range(1..total);
    let (picked, _) = data.partial_shuffle(rng, k);
    picked.to_vec()
}
