use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wayfind_adaptor_web::{ApiServer, ApiState, WebServerConfig};
use wayfind_core::config::{load_env, ApiConfig};
use wayfind_core::security::TokenIssuer;
use wayfind_provider_embedding::LocalEmbedder;
use wayfind_storage_sql::PostgresAdapter;

#[derive(Parser, Debug)]
#[command(name = "run-api-server", about = "Wayfind tourism recommendation API")]
struct Cli {
    /// Host to bind to (overrides WAYFIND_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides WAYFIND_PORT)
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, env = "WAYFIND_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> wayfind_core::Result<()> {
    load_env()?;
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut config = ApiConfig::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let adapter = Arc::new(PostgresAdapter::new(&config.database_url).await?);
    adapter.initialize().await?;

    // One model pool for the whole process; dropped on shutdown
    let embedder = Arc::new(LocalEmbedder::new(
        &config.embedding_model,
        config.embedding_workers,
        Duration::from_secs(config.embedding_timeout_secs),
    )?);

    let state = ApiState::new(
        adapter.clone(),
        adapter,
        embedder,
        TokenIssuer::new(&config.jwt_secret, config.token_ttl_days),
        config.search_threshold,
    );

    let server = ApiServer::new(
        WebServerConfig {
            host: config.host.clone(),
            port: config.port,
        },
        state,
    );
    server.start().await
}
