use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::dashboard::{router, run_dashboard, DashboardState};
use crate::error::{Result, StatusError};
use crate::refresh::{refresh_once, RefreshScheduler};
use crate::source::{JobSource, Source};
use crate::store::SnapshotStore;

/// The running status service: one job source, one snapshot store, and the
/// two tasks that share them.
pub struct App<S = Source> {
    pub config: ServerConfig,
    source: Arc<S>,
    store: SnapshotStore,
}

impl App<Source> {
    pub fn new(config: ServerConfig) -> Self {
        let source = Source::from_config(&config.source);
        Self::with_source(config, source)
    }
}

impl<S: JobSource> App<S> {
    pub fn with_source(config: ServerConfig, source: S) -> Self {
        Self {
            config,
            source: Arc::new(source),
            store: SnapshotStore::new(),
        }
    }

    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.listen_addr;
        TcpListener::bind(addr)
            .await
            .map_err(|source| StatusError::Bind { addr, source })
    }

    /// Bind the configured address and run until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Fails if the port cannot be bound, if the refresh interval is zero,
    /// if the initial refresh cannot load sample data, or if the server
    /// itself fails.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Run on an already-bound listener:
    /// 1. Refreshes once, so the first request sees real data
    /// 2. Spawns the periodic refresh scheduler
    /// 3. Serves HTTP until `shutdown` is cancelled, letting in-flight
    ///    requests finish
    /// 4. Stops the scheduler
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        let scheduler = RefreshScheduler::new(
            self.source.clone(),
            self.store.clone(),
            self.config.refresh_interval,
        )?;

        let count = refresh_once(self.source.as_ref(), &self.store).await?;
        tracing::info!(jobs = count, "Initial job snapshot loaded");

        let scheduler_token = shutdown.child_token();
        let scheduler = scheduler.spawn(scheduler_token.clone());

        let state = DashboardState::new(self.store.clone(), self.config.summary_mode);
        let app = router(state, self.config.static_dir.clone());
        let served = run_dashboard(listener, app, shutdown).await;

        scheduler_token.cancel();
        if let Err(e) = scheduler.await {
            tracing::warn!(error = %e, "Refresh scheduler task failed");
        }

        tracing::info!("Dashboard server stopped");
        served.map_err(StatusError::from)
    }
}
