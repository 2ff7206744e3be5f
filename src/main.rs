use anyhow::Context;
use tracing_subscriber::EnvFilter;

use timesheet::build_router;
use timesheet::config::Config;
use timesheet::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing, JSON lines in production
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("timesheet=info,tower_http=info"));
    if config.environment.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = config.server_addr();
    let environment = config.environment;

    // Initialize application state (connects to the database)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("Database connection established");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%environment, "Server started on http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
