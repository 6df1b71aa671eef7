use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pharmamate_api::config::{config, Environment};
use pharmamate_api::database::DatabaseManager;
use pharmamate_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pharmamate_api=info,tower_http=info")),
        )
        .init();

    let config = config().clone();
    tracing::info!("Starting PharmaMate API in {:?} mode", config.environment);

    if config.environment == Environment::Production && config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECRET_KEY must be set in production");
    }

    let store = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open store")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(store, config).context("failed to build application state")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PharmaMate API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
