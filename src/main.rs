use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_aggregator::{
    config::Config,
    discovery::{CompositeDiscovery, SearchDiscovery, StaticDiscovery},
    run,
    utils::HttpPlaylistFetcher,
    RunOutcome,
};

#[derive(Parser)]
#[command(name = "m3u-aggregator")]
#[command(version = "0.1.0")]
#[command(about = "Aggregates public M3U playlists into per-country channel playlists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Output directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Pause between source fetches in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Skip web search and use only --source values and the fallback list
    #[arg(long)]
    no_discovery: bool,

    /// Extra playlist URL to aggregate (repeatable)
    #[arg(short, long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", Config::default().to_toml_string()?);
        return Ok(());
    }

    let log_filter = format!("m3u_aggregator={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting M3U Aggregator v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;

    // Override config with CLI arguments
    if let Some(output_dir) = cli.output_dir {
        config.output.path = output_dir;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.aggregation.request_delay_ms = delay_ms;
    }
    if cli.no_discovery {
        config.discovery.enabled = false;
    }

    info!("Writing catalog to: {}", config.output.path.display());

    let mut discovery = CompositeDiscovery::new().with(StaticDiscovery::new(cli.sources));
    if config.discovery.enabled {
        discovery = discovery.with(SearchDiscovery::new(
            config.discovery.clone(),
            config.fetch.timeout(),
        )?);
    } else {
        info!("Web search discovery disabled");
    }

    let fetcher = HttpPlaylistFetcher::new(&config.fetch)?;

    match run(&config, &discovery, fetcher).await? {
        RunOutcome::Completed { summary, .. } => {
            info!(
                "Catalog written: {} channels across {} partitions",
                summary.total, summary.partition_count
            );
        }
        RunOutcome::Empty { report, .. } => {
            warn!(
                "No channels found ({} of {} sources usable), empty catalog written",
                report.succeeded(),
                report.attempted()
            );
        }
    }

    Ok(())
}
