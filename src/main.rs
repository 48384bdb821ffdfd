//! CLI entry point for the mandi price client.
//!
//! Provides subcommands for listing prices, enumerating crops and markets,
//! summarizing a crop, computing its price trend, and loading the dashboard
//! cards.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use mandi_prices::error::FetchOutcome;
use mandi_prices::output::{append_record, print_json, print_pretty};
use mandi_prices::services::dashboard::{DEFAULT_CARD_COUNT, load_dashboard};
use mandi_prices::trend::sort_chronologically;
use mandi_prices::{
    ApiConfig, CancelScope, CancelToken, DataGovClient, PriceApi, PriceTrend, SearchCriteria,
};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mandi_prices")]
#[command(about = "Query and summarize daily mandi commodity prices", long_about = None)]
struct Cli {
    /// JSON config file; MANDI_* environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List price records, optionally filtered by crop and city/market
    Prices {
        /// Exact commodity name, filtered by the upstream
        #[arg(long)]
        crop: Option<String>,

        /// Case-insensitive substring of the market name
        #[arg(long)]
        city: Option<String>,
    },
    /// List distinct crop names from the default page
    Categories,
    /// List distinct market names from the default page
    Markets,
    /// Average prices and markets for one crop
    Summary {
        #[arg(value_name = "CROP")]
        crop: String,

        #[arg(long)]
        city: Option<String>,

        /// CSV file to append the summary to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Modal price change between the oldest and newest record of a crop
    Trend {
        #[arg(value_name = "CROP")]
        crop: String,

        #[arg(long)]
        city: Option<String>,
    },
    /// Summaries for the leading crops, fetched concurrently
    Dashboard {
        #[arg(long)]
        crop: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// Number of crops to summarize when no crop is given
        #[arg(short, long, default_value_t = DEFAULT_CARD_COUNT)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mandi_prices.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mandi_prices.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::from_env()?,
    };
    info!(base_url = %config.base_url, "Using price API");
    let api = Arc::new(DataGovClient::from_config(&config)?);

    // Ctrl+C abandons whatever is in flight.
    let scope = Arc::new(CancelScope::new());
    let token = scope.token();
    {
        let scope = scope.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding requests");
                scope.cancel();
            }
        });
    }

    match cli.command {
        Commands::Prices { crop, city } => {
            let criteria = SearchCriteria::new(crop, city);
            let result = token.run(api.list_prices(&criteria)).await;
            match FetchOutcome::from(result) {
                FetchOutcome::Data(records) => {
                    info!(count = records.len(), "Records found");
                    print_json(&records)?;
                }
                FetchOutcome::Empty => {
                    info!("No results found for the search criteria");
                    print_json(&Vec::<()>::new())?;
                }
                FetchOutcome::Failed(e) => return Err(anyhow!(e).context("failed to load prices")),
            }
        }
        Commands::Categories => {
            let categories = token.run(api.list_categories()).await?;
            print_json(&categories)?;
        }
        Commands::Markets => {
            let markets = token.run(api.list_markets()).await?;
            print_json(&markets)?;
        }
        Commands::Summary { crop, city, output } => {
            let summary = token.run(api.crop_summary(&crop, city.as_deref())).await?;
            if summary.is_empty() {
                info!(crop = %crop, "No records for crop");
            }
            print_pretty(&summary);
            print_json(&summary)?;

            if let Some(path) = output {
                append_record(&path, &summary)?;
                info!(path = %path, "Summary appended");
            }
        }
        Commands::Trend { crop, city } => {
            trend(api.as_ref(), &crop, city.as_deref(), &token).await?;
        }
        Commands::Dashboard { crop, city, top } => {
            let criteria = SearchCriteria::new(crop, city);
            let cards = load_dashboard(api, &criteria, top, &token).await?;
            if cards.is_empty() {
                info!("No results found for the search criteria");
            }
            print_json(&cards)?;
        }
    }

    Ok(())
}

/// Prints the two-point modal price trend for a crop.
#[tracing::instrument(skip(api, token))]
async fn trend<A: PriceApi>(
    api: &A,
    crop: &str,
    city: Option<&str>,
    token: &CancelToken,
) -> Result<()> {
    let summary = token.run(api.crop_summary(crop, city)).await?;
    let sorted = sort_chronologically(&summary.price_data);
    let trend = PriceTrend::from_sorted(&sorted);

    info!(
        records = sorted.len(),
        direction = ?trend.direction,
        change = %trend.percent_label(),
        "Trend computed"
    );
    print_json(&trend)?;
    Ok(())
}
