mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder-cli")]
#[command(about = "Query the store locator dataset from the terminal")]
struct Cli {
    /// GeoJSON dataset; defaults to `STOREFINDER_DATASET_PATH`.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search stores and shopping centers by free text.
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List stores inside a bounding box.
    InView {
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, default_value_t = 12.0)]
        zoom: f64,
    },
    /// List shopping-center records.
    Centers,
    /// Print dataset totals.
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storefinder_core::load_search_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let dataset_path = cli.dataset.unwrap_or_else(|| config.dataset_path.clone());

    let Some(command) = cli.command else {
        println!("storefinder-cli: no command given; try `storefinder-cli --help`");
        return Ok(());
    };

    let dataset = storefinder_core::load_store_dataset(&dataset_path)?;

    match command {
        Commands::Search { query, limit } => {
            commands::run_search(&dataset, &query, config.resolve_limit(limit));
        }
        Commands::InView {
            west,
            south,
            east,
            north,
            zoom,
        } => {
            let bounds = storefinder_search::Bounds {
                west,
                south,
                east,
                north,
            };
            commands::run_in_view(&dataset, &bounds, zoom)?;
        }
        Commands::Centers => commands::run_centers(&dataset),
        Commands::Stats => commands::run_stats(&dataset),
    }

    Ok(())
}
