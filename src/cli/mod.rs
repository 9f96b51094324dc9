//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod place;
pub mod search;
pub mod serve;

use crate::error::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Nearby restaurant search with review-driven analysis
#[derive(Parser)]
#[command(name = "plate-finder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Find restaurants near a point, an address, or your IP location
    Search(search::SearchArgs),

    /// Summarize the dining scene around a point
    Area(search::AreaArgs),

    /// Resolve a location from coordinates, an address, or an IP
    Locate(locate::LocateArgs),

    /// Show details for one place
    Details(place::DetailsArgs),

    /// Show reviews for one place
    Reviews(place::ReviewsArgs),

    /// Analyze one place from its rating and reviews
    Analyze(place::AnalyzeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_tracing("info");
            serve::run(args).await
        }
        Commands::Search(args) => {
            init_tracing("warn");
            search::run(args).await
        }
        Commands::Area(args) => {
            init_tracing("warn");
            search::run_area(args).await
        }
        Commands::Locate(args) => {
            init_tracing("warn");
            locate::run(args).await
        }
        Commands::Details(args) => {
            init_tracing("warn");
            place::run_details(args).await
        }
        Commands::Reviews(args) => {
            init_tracing("warn");
            place::run_reviews(args).await
        }
        Commands::Analyze(args) => {
            init_tracing("warn");
            place::run_analyze(args).await
        }
        Commands::Config(args) => config::run(args),
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
