use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9100;
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// How `/summary.json` treats records that lack one of the summary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    /// Fail the whole response and name the offending record and field.
    #[default]
    Strict,
    /// Emit `null` for the missing field and list it under `missing`.
    Lenient,
}

/// Where job records come from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Path or name of the `condor_q` binary
    pub command: String,
    /// Pass `-all` to include jobs from every owner
    pub include_all: bool,
    /// Pass `-global` to query every schedd in the pool
    pub include_global: bool,
    /// Serve random subsets of sample data instead of calling `condor_q`
    pub simulate: bool,
    /// Sample file to use in simulate mode. The bundled sample is used when unset.
    pub sample_path: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: "condor_q".to_string(),
            include_all: true,
            include_global: true,
            simulate: false,
            sample_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub refresh_interval: Duration,
    pub summary_mode: SummaryMode,
    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
    pub source: SourceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            summary_mode: SummaryMode::default(),
            static_dir: None,
            source: SourceConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn simulated(mut self) -> Self {
        self.source.simulate = true;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

/// Settings for the one-shot export mode.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    pub summary_mode: SummaryMode,
    pub source: SourceConfig,
}

impl ExportConfig {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            summary_mode: SummaryMode::default(),
            source: SourceConfig::default(),
        }
    }
}
