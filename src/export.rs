use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{ExportConfig, SummaryMode};
use crate::error::Result;
use crate::projection::{summarize, JobCounts, JobList};
use crate::refresh::refresh_once;
use crate::source::{JobSource, Source};
use crate::store::SnapshotStore;

pub const JOBS_FILE: &str = "jobs.json";
pub const COUNTS_FILE: &str = "counts.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Refresh once and write the three JSON documents the server would serve.
///
/// All projections are computed before anything is written, so a strict
/// summary failure leaves the output directory untouched.
pub async fn export_snapshot<S: JobSource>(
    source: &S,
    out_dir: &Path,
    mode: SummaryMode,
) -> Result<Vec<PathBuf>> {
    let store = SnapshotStore::new();
    refresh_once(source, &store).await?;
    let snapshot = store.current();

    let jobs = to_json(&JobList {
        jobs: &snapshot.jobs,
    })?;
    let counts = to_json(&JobCounts::from_jobs(&snapshot.jobs))?;
    let summary = to_json(&summarize(&snapshot.jobs, mode)?)?;

    tokio::fs::create_dir_all(out_dir).await?;

    let mut written = Vec::with_capacity(3);
    for (name, body) in [
        (JOBS_FILE, jobs),
        (COUNTS_FILE, counts),
        (SUMMARY_FILE, summary),
    ] {
        let path = out_dir.join(name);
        tokio::fs::write(&path, body).await?;
        tracing::debug!(path = %path.display(), "Wrote export file");
        written.push(path);
    }

    tracing::info!(
        jobs = snapshot.len(),
        dir = %out_dir.display(),
        "Exported job snapshot"
    );
    Ok(written)
}

pub async fn run_export(config: ExportConfig) -> Result<Vec<PathBuf>> {
    let source = Source::from_config(&config.source);
    export_snapshot(&source, &config.out_dir, config.summary_mode).await
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    Ok(body)
}
