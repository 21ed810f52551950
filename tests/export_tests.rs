
use serde_json::{json, Value};

use htcondor_status::config::{ExportConfig, SummaryMode};
use htcondor_status::error::StatusError;
use htcondor_status::export::{export_snapshot, run_export, COUNTS_FILE, JOBS_FILE, SUMMARY_FILE};
use test_harness::{jobs_with_statuses, CountingSource};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_export_writes_three_documents() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let jobs = jobs_with_statuses(&[1, 2, 5, 4]);
    let source = CountingSource::new(jobs.clone());

    let written = export_snapshot(&source, &out, SummaryMode::Strict)
        .await
        .unwrap();

    assert_eq!(
        written,
        vec![out.join(JOBS_FILE), out.join(COUNTS_FILE), out.join(SUMMARY_FILE)]
    );
    assert_eq!(source.calls(), 1);

    assert_eq!(
        read_json(&out.join(JOBS_FILE)),
        json!({ "jobs": serde_json::to_value(&jobs).unwrap() })
    );
    assert_eq!(
        read_json(&out.join(COUNTS_FILE)),
        json!({"total": 4, "idle": 1, "running": 1, "held": 1})
    );

    let summary = read_json(&out.join(SUMMARY_FILE));
    let rows = summary["jobs"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.as_object().unwrap().len() == 6));
}

#[tokio::test]
async fn test_export_strict_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut jobs = jobs_with_statuses(&[1]);
    jobs.push(serde_json::from_value(json!({"JobStatus": 2})).unwrap());
    let source = CountingSource::new(jobs);

    let result = export_snapshot(&source, &out, SummaryMode::Strict).await;

    assert!(matches!(
        result,
        Err(StatusError::MissingField { index: 1, .. })
    ));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_export_lenient_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    let mut jobs = jobs_with_statuses(&[1]);
    jobs.push(serde_json::from_value(json!({"JobStatus": 2})).unwrap());
    let source = CountingSource::new(jobs);

    export_snapshot(&source, dir.path(), SummaryMode::Lenient)
        .await
        .unwrap();

    let summary = read_json(&dir.path().join(SUMMARY_FILE));
    assert_eq!(summary["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(summary["missing"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_run_export_simulated() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ExportConfig::new(dir.path());
    config.source.simulate = true;

    run_export(config).await.unwrap();

    let jobs = read_json(&dir.path().join(JOBS_FILE));
    let counts = read_json(&dir.path().join(COUNTS_FILE));
    let total = jobs["jobs"].as_array().unwrap().len();
    assert!(total >= 1);
    assert_eq!(counts["total"], total);
}
