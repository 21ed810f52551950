use std::process::Stdio;
use tokio::process::Command;

use crate::config::SourceConfig;
use crate::job::JobRecord;

/// Queries the HTCondor pool by running `condor_q -json`.
///
/// Any failure (missing binary, non-zero exit, empty or unparsable output)
/// yields an empty job list. A misbehaving `condor_q` must never take the
/// server down, and the next refresh simply tries again.
#[derive(Debug, Clone)]
pub struct CondorQ {
    command: String,
    include_all: bool,
    include_global: bool,
}

impl CondorQ {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            include_all: true,
            include_global: true,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            command: config.command.clone(),
            include_all: config.include_all,
            include_global: config.include_global,
        }
    }

    pub fn args(&self) -> Vec<&'static str> {
        let mut args = vec!["-json"];
        if self.include_global {
            args.push("-global");
        }
        if self.include_all {
            args.push("-all");
        }
        args
    }

    pub async fn query(&self) -> Vec<JobRecord> {
        let args = self.args();
        tracing::debug!(command = %self.command, ?args, "Running job query");

        let result = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        Self::process_output(&self.command, result)
    }

    fn process_output(
        command: &str,
        result: Result<std::process::Output, std::io::Error>,
    ) -> Vec<JobRecord> {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(command, error = %e, "Failed to run job query");
                return Vec::new();
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                command,
                exit_code = ?output.status.code(),
                stderr = %stderr.trim(),
                "Job query exited with failure"
            );
            return Vec::new();
        }

        parse_jobs(&output.stdout)
    }
}

/// Parse `condor_q -json` output. `condor_q` prints nothing at all when the
/// queue is empty, so blank output is an empty list rather than an error.
pub fn parse_jobs(stdout: &[u8]) -> Vec<JobRecord> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!("Job query returned no output");
        return Vec::new();
    }

    match serde_json::from_slice::<Vec<JobRecord>>(stdout) {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::warn!(error = %e, bytes = stdout.len(), "Unparsable job query output");
            Vec::new()
        }
    }
}
