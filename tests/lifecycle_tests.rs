
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use htcondor_status::app::App;
use htcondor_status::config::{ServerConfig, SourceConfig};
use htcondor_status::error::StatusError;
use htcondor_status::source::sample::{parse_sample, BUNDLED_SAMPLE};
use test_harness::{http_get, jobs_with_statuses, CountingSource};

fn local_config() -> ServerConfig {
    ServerConfig::new("127.0.0.1:0".parse().unwrap())
        .with_refresh_interval(Duration::from_secs(3600))
}

#[tokio::test]
async fn test_first_request_sees_initial_refresh() {
    let source = CountingSource::new(jobs_with_statuses(&[1, 2, 5]));
    let app = App::with_source(local_config(), source.clone());
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));

    let response = http_get(addr, "/counts.json").await;
    assert_eq!(response.status, 200);
    assert!(response
        .header("content-type")
        .unwrap()
        .contains("application/json"));
    assert!(response.header("x-snapshot-refreshed-at").is_some());
    assert_eq!(
        response.json(),
        json!({"total": 3, "idle": 1, "running": 1, "held": 1})
    );
    assert_eq!(source.calls(), 1);

    let response = http_get(addr, "/").await;
    assert_eq!(response.status, 200);
    assert!(response.header("content-type").unwrap().starts_with("text/html"));

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_empty_source_serves_empty_jobs() {
    let source = CountingSource::new(Vec::new());
    let app = App::with_source(local_config(), source);
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));

    let response = http_get(addr, "/jobs.json").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"jobs": []}));

    let response = http_get(addr, "/summary.json").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"jobs": []}));

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_failing_condor_q_does_not_crash() {
    let mut config = local_config();
    config.source = SourceConfig {
        command: "/nonexistent/condor_q".to_string(),
        ..Default::default()
    };
    let app = App::new(config);
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));

    let response = http_get(addr, "/jobs.json").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json(), json!({"jobs": []}));

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_simulated_startup_serves_sample_subset() {
    let sample = parse_sample(BUNDLED_SAMPLE).unwrap();
    let sample: Vec<serde_json::Value> = sample
        .iter()
        .map(|job| serde_json::to_value(job).unwrap())
        .collect();

    let app = App::new(local_config().simulated());
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));

    let body = http_get(addr, "/jobs.json").await.json();
    let jobs = body["jobs"].as_array().unwrap();
    assert!(!jobs.is_empty());
    assert!(jobs.len() < sample.len());
    for job in jobs {
        assert!(sample.contains(job));
    }

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_listener() {
    let source = CountingSource::new(jobs_with_statuses(&[2]));
    let app = App::with_source(local_config(), source);
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));
    assert_eq!(http_get(addr, "/counts.json").await.status, 200);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after shutdown")
        .unwrap()
        .unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_port_in_use_is_fatal() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = taken.local_addr().unwrap();

    let app = App::with_source(ServerConfig::new(addr), CountingSource::default());
    let result = app.run(CancellationToken::new()).await;

    assert!(matches!(result, Err(StatusError::Bind { .. })));
}

#[tokio::test]
async fn test_broken_sample_is_fatal_at_startup() {
    let mut config = local_config().simulated();
    config.source.sample_path = Some(PathBuf::from("/nonexistent/sample.json"));

    let app = App::new(config);
    let listener = app.bind().await.unwrap();
    let result = app.serve(listener, CancellationToken::new()).await;

    assert!(matches!(result, Err(StatusError::SampleAsset { .. })));
}

#[tokio::test]
async fn test_zero_refresh_interval_is_rejected() {
    let source = CountingSource::new(jobs_with_statuses(&[1]));
    let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
        .with_refresh_interval(Duration::ZERO);
    let app = App::with_source(config, source.clone());
    let listener = app.bind().await.unwrap();

    let result = app.serve(listener, CancellationToken::new()).await;

    assert!(matches!(result, Err(StatusError::InvalidConfig(_))));
    assert_eq!(source.calls(), 0);
}
