//! Voyage chat relay server binary.
//!
//! Serves `POST /api/chat` and `GET /api/health`. Completion service settings
//! come from the environment (or a `.env` file); missing values do not stop
//! the server, they fail each chat request instead.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use voyage_api::AppState;
use voyage_api::config::ApiConfig;

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "voyage_server", about = "Voyage chat relay server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3100")]
    bind_addr: String,

    /// Completion service base URL (overrides `AZURE_OPENAI_ENDPOINT`).
    #[arg(long)]
    endpoint: Option<String>,

    /// Completion deployment identifier (overrides `AZURE_OPENAI_DEPLOYMENT`).
    #[arg(long)]
    deployment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,voyage_api=debug,voyage_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    if args.endpoint.is_some() {
        config.relay.endpoint = args.endpoint;
    }
    if args.deployment.is_some() {
        config.relay.deployment = args.deployment;
    }

    info!(bind_addr = %config.bind_addr, relay = ?config.relay, "starting voyage_server");

    let missing = config.relay.missing();
    if !missing.is_empty() {
        warn!(?missing, "completion service is not configured; chat requests will fail");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = voyage_api::router(AppState::new(config));

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
            }
            shutdown.cancel();
        }
    });

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
