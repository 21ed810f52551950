use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use htcondor_status::app::App;
use htcondor_status::config::{
    ExportConfig, ServerConfig, SourceConfig, SummaryMode, DEFAULT_PORT,
};
use htcondor_status::export::run_export;
use htcondor_status::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "htcondor-status")]
#[command(version)]
#[command(about = "Web dashboard for the jobs in an HTCondor pool")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the dashboard and JSON endpoints
    Serve(ServeArgs),

    /// Query once and write jobs.json, counts.json and summary.json to a directory
    Export(ExportArgs),
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Seconds between job queries
    #[arg(long, default_value = "30")]
    refresh_interval: u64,

    /// Directory of static assets served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Directory to write the JSON files into
    #[arg(long, short = 'o')]
    out: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Use random subsets of sample data instead of running condor_q
    #[arg(long)]
    simulate: bool,

    /// Sample data file for --simulate (defaults to the bundled sample)
    #[arg(long, requires = "simulate")]
    sample: Option<PathBuf>,

    /// condor_q binary to run
    #[arg(long, default_value = "condor_q")]
    condor_q: String,

    /// Only show the current user's jobs (omit -all)
    #[arg(long)]
    no_all: bool,

    /// Only query the local schedd (omit -global)
    #[arg(long)]
    no_global: bool,

    /// Report missing summary fields as nulls instead of failing the request
    #[arg(long)]
    lenient_summary: bool,
}

impl CommonArgs {
    fn source_config(&self) -> SourceConfig {
        SourceConfig {
            command: self.condor_q.clone(),
            include_all: !self.no_all,
            include_global: !self.no_global,
            simulate: self.simulate,
            sample_path: self.sample.clone(),
        }
    }

    fn summary_mode(&self) -> SummaryMode {
        if self.lenient_summary {
            SummaryMode::Lenient
        } else {
            SummaryMode::Strict
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

// =============================================================================
// Commands
// =============================================================================

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.common.debug);

    let config = ServerConfig {
        listen_addr: SocketAddr::new(args.host, args.port),
        refresh_interval: Duration::from_secs(args.refresh_interval),
        summary_mode: args.common.summary_mode(),
        static_dir: args.static_dir,
        source: args.common.source_config(),
    };

    tracing::info!(
        addr = %config.listen_addr,
        simulate = config.source.simulate,
        refresh_secs = args.refresh_interval,
        "Starting htcondor-status"
    );

    let shutdown = install_shutdown_handler()?;
    App::new(config).run(shutdown).await?;
    Ok(())
}

async fn run_export_command(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.common.debug);

    let config = ExportConfig {
        out_dir: args.out,
        summary_mode: args.common.summary_mode(),
        source: args.common.source_config(),
    };

    for path in run_export(config).await? {
        println!("{}", path.display());
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Serve(serve_args) => run_server(serve_args).await?,
        Commands::Export(export_args) => run_export_command(export_args).await?,
    }

    Ok(())
}
