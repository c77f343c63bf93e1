use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trendlens_mock_server::{build_router, MockState};

#[derive(Parser)]
#[command(name = "mock-api", about = "TrendLens mock API server")]
struct Cli {
    /// Interface to bind
    #[arg(long, env = "MOCK_API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "MOCK_API_PORT", default_value_t = 3001)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    let app = build_router(MockState::new());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, "Mock API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
