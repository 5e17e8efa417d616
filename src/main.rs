//! rival-watch server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use rival_watch::api;
use rival_watch::app_state::AppState;
use rival_watch::config::WatchConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env before tracing picks up RUST_LOG)
    let config = WatchConfig::from_env()?;
    init_tracing();
    tracing::info!(
        addr = %config.listen_addr,
        threshold = config.similarity_threshold,
        "starting rival-watch"
    );

    // Build pipeline and application state
    let app_state = AppState::from_config(&config).await?;

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
