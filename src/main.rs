use aro_rp_versions::{
    config::{resolve_locations, Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    logging::init_tracing,
    render::{render, OutputFormat},
    runner::{HttpVersionSource, VersionChecker},
};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Parser)]
#[command(name = "aro-rp-versions")]
#[command(about = "Show RP and OCP versions deployed in each Azure location")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Enable debugging output
    #[arg(short, long)]
    debug: bool,

    /// Comma-separated Azure regions
    #[arg(short, long, value_delimiter = ',')]
    location: Vec<String>,

    /// YAML list of regions used when no --location is given
    #[arg(short = 'f', long, value_name = "FILE")]
    locations_file: Option<PathBuf>,

    /// Output format (table|json)
    #[arg(short, long, default_value = "table")]
    output: String,

    /// Print version information
    #[arg(short, long)]
    version: bool,

    /// Base URL of the versioning endpoint
    #[arg(long, env = "ARO_RP_VERSIONS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Show a progress bar on stderr while fetching
    #[arg(long)]
    progress: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.log_json, level);

    if cli.version {
        println!("aro-rp-versions\nversion v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let locations = resolve_locations(cli.location, cli.locations_file.as_deref())?;

    let config = Config {
        base_url: cli.base_url,
        timeout: Duration::from_secs(cli.timeout),
        show_progress: cli.progress,
    };
    let source = HttpVersionSource::new(&config)?;
    let checker = VersionChecker::new(source).with_progress(config.show_progress);
    let records = checker.check_all(&locations).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&records, OutputFormat::from(cli.output.as_str()), &mut out)?;
    out.flush()?;
    Ok(())
}
