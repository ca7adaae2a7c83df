//! Lending Core - API Server Binary
//!
//! Starts the HTTP API server for the commercial lending system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin lending-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin lending-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_VALUATION_URL` - Base URL of the valuation calculator
//! * `API_VALUATION_TIMEOUT_MS` - Valuation call timeout (default: 5000)
//! * `API_LTV_APPROVAL_THRESHOLD` - Approval threshold percentage (default: 75)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_lending::{
    HttpValuationClient, LoanService, LtvEngine, ValuationOrchestrator, ValuatorConfig,
};
use infra_db::{create_pool, DatabaseConfig, PgLoanStore};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        valuation_url = %config.valuation_url,
        "starting lending core API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url)).await?;

    tracing::info!("running database migrations");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let store = Arc::new(PgLoanStore::new(pool.clone()));
    let valuator = Arc::new(
        HttpValuationClient::new(
            ValuatorConfig::new(&config.valuation_url).timeout_ms(config.valuation_timeout_ms),
        )
        .map_err(|e| anyhow::anyhow!("failed to build valuation client: {e}"))?,
    );

    let state = AppState {
        pool,
        loans: Arc::new(LoanService::new(store.clone())),
        orchestrator: Arc::new(ValuationOrchestrator::new(
            store,
            valuator.clone(),
            LtvEngine::new(config.ltv_approval_threshold),
        )),
        valuator,
    };

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables, falling back to
/// individual variables and defaults
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            valuation_url: std::env::var("API_VALUATION_URL").unwrap_or(defaults.valuation_url),
            valuation_timeout_ms: std::env::var("API_VALUATION_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.valuation_timeout_ms),
            ltv_approval_threshold: std::env::var("API_LTV_APPROVAL_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.ltv_approval_threshold),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    })
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM) so in-flight requests can
/// complete before the process exits
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}
