use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StatusError};
use crate::job::{JobRecord, JobSnapshot, JobStatus};
use crate::source::JobSource;
use crate::store::SnapshotStore;

/// Fetch jobs once and publish them as the current snapshot.
///
/// Only sample-data errors propagate. Everything else has already been
/// turned into an empty list by the source.
pub async fn refresh_once<S: JobSource>(source: &S, store: &SnapshotStore) -> Result<usize> {
    let jobs = source.fetch().await?;
    let count = jobs.len();

    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(
            jobs = count,
            breakdown = %status_breakdown(&jobs),
            "Refreshed job snapshot"
        );
    }

    store.replace(JobSnapshot::new(jobs));
    Ok(count)
}

/// Per-status job counts in code order, e.g. `idle=2 running=1 held=1`.
/// Records without a known status are grouped under `unknown`.
pub fn status_breakdown(jobs: &[JobRecord]) -> String {
    let mut counts = [0usize; 7];
    let mut unknown = 0;
    for job in jobs {
        match job.status() {
            Some(status) => counts[(status.code() - 1) as usize] += 1,
            None => unknown += 1,
        }
    }

    let mut parts: Vec<String> = (1..=7)
        .filter_map(JobStatus::from_code)
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(status, n)| format!("{status}={n}"))
        .collect();
    if unknown > 0 {
        parts.push(format!("unknown={unknown}"));
    }
    parts.join(" ")
}

/// Periodically refreshes the snapshot store until cancelled.
///
/// The first tick fires one full period after `spawn`, since startup has
/// already done a refresh of its own. A slow fetch delays the following
/// tick rather than queueing a burst of catch-up refreshes.
pub struct RefreshScheduler<S> {
    source: Arc<S>,
    store: SnapshotStore,
    period: Duration,
}

impl<S: JobSource> RefreshScheduler<S> {
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `period` is zero.
    pub fn new(source: Arc<S>, store: SnapshotStore, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(StatusError::InvalidConfig(
                "refresh interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            source,
            store,
            period,
        })
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(period_secs = self.period.as_secs_f64(), "Refresh scheduler started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = refresh_once(self.source.as_ref(), &self.store) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Refresh failed, publishing empty snapshot");
                        self.store.replace(JobSnapshot::new(Vec::new()));
                    }
                }
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }
}
