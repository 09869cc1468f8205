//! Offline Coverage Table builder.
//!
//! Turns the ARCEP antenna dataset (Lambert-93 coordinates) into the
//! city-keyed Coverage Table read by the query server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use netcoverage::builder::{read_antennas, CoverageBuilder};
use netcoverage::config::Config;
use netcoverage::coverage::CoverageTable;
use netcoverage::geocoding::GeocodingClient;
use netcoverage::projection::LambertConformalConic;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the network coverage table from ARCEP antenna sites")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Geocoder base URL (overrides the config file)
    #[arg(long, global = true)]
    geocoder_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map operators and reproject antenna sites to WGS84
    Project {
        /// Antenna CSV (`Operateur;x;y;2G;3G;4G`), optionally .gz
        #[arg(short, long)]
        input: PathBuf,

        /// Intermediate site CSV (`provider,lon,lat,2G,3G,4G`)
        #[arg(short, long, default_value = "sites.csv")]
        output: PathBuf,
    },
    /// Reverse geocode an intermediate site CSV into a Coverage Table
    Resolve {
        /// Intermediate site CSV produced by `project`
        #[arg(short, long, default_value = "sites.csv")]
        input: PathBuf,

        /// Coverage Table (defaults to the configured table path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run `project` and `resolve` in one go
    Build {
        /// Antenna CSV (`Operateur;x;y;2G;3G;4G`), optionally .gz
        #[arg(short, long)]
        input: PathBuf,

        /// Coverage Table (defaults to the configured table path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.common.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(url) = args.common.geocoder_url {
        config.geocoder.base_url = url;
    }

    info!("Network Coverage Ingest");

    let client = GeocodingClient::new(&config.geocoder).context("Failed to create geocoder client")?;
    let builder = CoverageBuilder::new(
        client,
        LambertConformalConic::lambert93(),
        config.geocoder.max_upload_bytes,
    );

    match args.command {
        Command::Project { input, output } => {
            let antennas = read_antennas(&input)?;
            let payload = builder.project(&antennas)?;
            std::fs::write(&output, &payload)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {} bytes of sites to {}", payload.len(), output.display());
        }
        Command::Resolve { input, output } => {
            let payload = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let table = resolve_with_spinner(&builder, payload).await?;
            write_table(&table, output.as_deref().unwrap_or(config.coverage.table_path.as_path()))?;
        }
        Command::Build { input, output } => {
            let antennas = read_antennas(&input)?;
            let payload = builder.project(&antennas)?;
            let table = resolve_with_spinner(&builder, payload).await?;
            write_table(&table, output.as_deref().unwrap_or(config.coverage.table_path.as_path()))?;
        }
    }

    info!("Done");
    Ok(())
}

async fn resolve_with_spinner(
    builder: &CoverageBuilder<LambertConformalConic>,
    payload: Vec<u8>,
) -> Result<CoverageTable> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Reverse geocoding {} bytes of sites...", payload.len()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = builder.resolve(payload).await;
    pb.finish_and_clear();

    let table = result.context("Reverse geocoding failed")?;
    info!("Resolved {} sites", table.len());
    Ok(table)
}

fn write_table(table: &CoverageTable, path: &Path) -> Result<()> {
    table
        .write(path)
        .with_context(|| format!("Failed to write coverage table {}", path.display()))
}
