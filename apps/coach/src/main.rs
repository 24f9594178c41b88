mod cli;
mod config;
mod errors;
mod features;
mod gateway;
mod llm_client;
mod models;
mod quiz;
mod routes;
mod session;
mod state;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::gateway::ApiClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("coach error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let cli = Cli::parse();
    init_tracing(&config, &cli);

    cli::run::dispatch(cli, config).await
}

/// Structured logging to stderr. Interactive commands stay quiet unless asked;
/// the server logs at `RUST_LOG`.
fn init_tracing(config: &Config, cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if matches!(cli.command, Commands::Serve) {
        config.rust_log.as_str()
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Runs the actions service until the process is stopped.
async fn serve(config: Config) -> Result<()> {
    info!("Starting career coach actions v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::from_config(&config)?;
    info!("Backend API at {}", api.base_url());

    let llm = LlmClient::new(&config)?;
    info!("LLM client initialized (model: {})", llm.model());
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; AI actions will fail");
    }

    let state = AppState {
        config: config.clone(),
        api,
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
