//! Terminal dashboard over the TrendLens API.
//!
//! Every view goes through the resilient client, so it keeps working with the
//! backend down; a banner announces when the data shown is synthetic.

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use trendlens_client::{MockDataStatus, TrendClient};
use trendlens_common::{Config, FetchResult, Platform, TopicModelRequest};

mod views;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "TrendLens social trend dashboard")]
#[command(version)]
struct Cli {
    /// Always use mock data, never contact the backend
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest posts or videos for a platform
    Recent {
        platform: Platform,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Run the topic model over a date range
    Topics {
        /// Number of named topics
        #[arg(short = 'n', long = "topics", default_value_t = 5)]
        num_topics: u32,

        /// YYYY-MM-DD; defaults to a week ago
        #[arg(long)]
        start: Option<String>,

        /// YYYY-MM-DD; defaults to today
        #[arg(long)]
        end: Option<String>,

        #[arg(long, value_delimiter = ',', default_value = "reddit,tiktok,youtube")]
        platforms: Vec<Platform>,
    },

    /// MLOps pipelines and their steps
    Pipelines,

    /// Trigger a pipeline run
    Execute { id: String },

    /// Drift report for a model
    Drift { model: String },

    /// Scraper health per platform
    Status,

    /// Scraper logs, optionally for one platform
    Logs { platform: Option<Platform> },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = runtime.block_on(run()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if cli.mock {
        config.force_mock = true;
    }
    config.log_redacted();
    tracing::debug!(force_mock = config.force_mock, "Starting dashboard");

    let status = MockDataStatus::new(config.force_mock);
    let banner = tokio::spawn(watch_banner(status.subscribe()));
    let client = TrendClient::new(config).with_status(status);

    let output = match cli.command {
        Commands::Recent { platform, limit } => client
            .fetch_recent_data(platform, limit)
            .await
            .map(|items| views::recent(platform.as_str(), &items)),
        Commands::Topics {
            num_topics,
            start,
            end,
            platforms,
        } => {
            let today = Utc::now().date_naive();
            let request = TopicModelRequest {
                start_date: start
                    .unwrap_or_else(|| (today - Duration::days(7)).format("%Y-%m-%d").to_string()),
                end_date: end.unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
                platforms,
                num_topics,
            };
            client
                .fetch_topic_model(request)
                .await
                .map(|model| views::topics(&model))
        }
        Commands::Pipelines => client
            .fetch_pipelines()
            .await
            .map(|p| views::pipelines(&p)),
        Commands::Execute { id } => client
            .execute_pipeline(&id)
            .await
            .map(|ack| views::execution(&ack)),
        Commands::Drift { model } => client
            .fetch_model_drift(&model)
            .await
            .map(|report| views::drift(&report)),
        Commands::Status => client
            .fetch_scraper_status()
            .await
            .map(|s| views::scraper_status(&s)),
        Commands::Logs { platform } => {
            let entries = match platform {
                Some(p) => client.fetch_platform_log(p).await,
                None => client.fetch_logs().await,
            };
            entries.map(|e| views::logs(&e))
        }
    };

    // Closing the last status sender ends the banner task.
    drop(client);
    let _ = banner.await;

    render(output)
}

/// Print a banner each time the displayed data turns synthetic.
async fn watch_banner(mut using_mock: watch::Receiver<bool>) {
    if *using_mock.borrow_and_update() {
        eprintln!("{}", views::MOCK_BANNER);
    }
    while using_mock.changed().await.is_ok() {
        if *using_mock.borrow_and_update() {
            eprintln!("{}", views::MOCK_BANNER);
        }
    }
}

fn render(output: FetchResult<String>) -> Result<()> {
    match output {
        FetchResult::Success { data, .. } => {
            print!("{data}");
            Ok(())
        }
        FetchResult::Failure { error_message } => Err(anyhow!(error_message)),
    }
}
