use std::path::PathBuf;

use axum::{
    extract::State,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::SummaryMode;
use crate::error::StatusError;
use crate::job::JobSnapshot;
use crate::projection::{summarize, JobCounts, JobList};
use crate::store::SnapshotStore;

/// Response header carrying the time the served snapshot was taken.
pub const REFRESHED_AT_HEADER: HeaderName = HeaderName::from_static("x-snapshot-refreshed-at");

#[derive(Clone)]
pub struct DashboardState {
    pub store: SnapshotStore,
    pub summary_mode: SummaryMode,
}

impl DashboardState {
    pub fn new(store: SnapshotStore, summary_mode: SummaryMode) -> Self {
        Self {
            store,
            summary_mode,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl ErrorResponse {
    fn from_error(e: &StatusError) -> Self {
        match e {
            StatusError::MissingField { index, field } => Self {
                error: e.to_string(),
                index: Some(*index),
                field: Some(field),
            },
            _ => Self {
                error: e.to_string(),
                index: None,
                field: None,
            },
        }
    }
}

/// Build the dashboard router. Every handler reads the current snapshot and
/// nothing else, so requests never wait on a refresh.
pub fn router(state: DashboardState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/jobs.json", get(jobs_handler))
        .route("/counts.json", get(counts_handler))
        .route("/summary.json", get(summary_handler));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(cors).with_state(state)
}

/// Serve the dashboard on an already-bound listener until `shutdown` fires.
pub async fn run_dashboard(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, "Starting dashboard server");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

fn snapshot_headers(snapshot: &JobSnapshot) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(at) = snapshot.refreshed_at {
        if let Ok(value) = HeaderValue::from_str(&at.to_rfc3339()) {
            headers.insert(REFRESHED_AT_HEADER, value);
        }
    }
    headers
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

async fn jobs_handler(State(state): State<DashboardState>) -> Response {
    let snapshot = state.store.current();
    (
        snapshot_headers(&snapshot),
        Json(JobList {
            jobs: &snapshot.jobs,
        }),
    )
        .into_response()
}

async fn counts_handler(State(state): State<DashboardState>) -> Response {
    let snapshot = state.store.current();
    (
        snapshot_headers(&snapshot),
        Json(JobCounts::from_jobs(&snapshot.jobs)),
    )
        .into_response()
}

async fn summary_handler(State(state): State<DashboardState>) -> Response {
    let snapshot = state.store.current();
    match summarize(&snapshot.jobs, state.summary_mode) {
        Ok(report) => (snapshot_headers(&snapshot), Json(report)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Cannot build job summary");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from_error(&e)),
            )
                .into_response()
        }
    }
}
