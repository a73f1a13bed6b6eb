//! Acadia Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use acadia_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use acadia_server::{
    config::Config,
    features::{self, AppState},
    middleware,
    storage::{config::StorageConfig, Storage},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("acadia-server".to_string())
        .filter_directives("acadia_server=debug,tower_http=debug,axum=trace,sqlx=info".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting Acadia Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Database connection pool established");

    // Initialize S3/MinIO storage
    let storage_config = StorageConfig::from_env()?;
    let storage = Storage::new(storage_config).await?;
    info!("Storage client initialized");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    // Create application state
    let state = AppState {
        db: db_pool,
        storage,
        auth: config.auth.clone(),
    };

    // Build the application router
    let app = create_router(state, &config);

    // Create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown. Once a signal arrives, in-flight
    // requests get `shutdown_timeout_secs` to finish before the process exits.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let server = axum::serve(listener, app).with_graceful_shutdown({
        let mut rx = shutdown_rx.clone();
        async move {
            let _ = rx.changed().await;
        }
    });

    let drain = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = server => {
            result?;
            info!("Server shut down gracefully");
        },
        _ = drain_deadline(shutdown_rx, drain) => {
            tracing::warn!(
                "Connections still open after {}s drain window, exiting",
                config.server.shutdown_timeout_secs
            );
        },
    }

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState, config: &Config) -> Router {
    let feature_routes = features::router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", feature_routes)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Result<Response, StatusCode> {
    // Check database connectivity
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

/// Bounds the drain: resolves only after shutdown has been signalled and the
/// drain window has elapsed. Pends forever while the server is running.
async fn drain_deadline(mut shutdown_rx: tokio::sync::watch::Receiver<bool>, drain: Duration) {
    // An error means the sender is gone and no signal can ever arrive.
    if shutdown_rx.wait_for(|signalled| *signalled).await.is_err() {
        std::future::pending::<()>().await;
    }
    info!(
        "Waiting up to {} seconds for connections to close",
        drain.as_secs()
    );
    tokio::time::sleep(drain).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_drain_deadline_fires_only_after_signal() {
        let (tx, rx) = tokio::sync::watch::channel(false);
        let deadline = drain_deadline(rx, Duration::from_secs(30));
        tokio::pin!(deadline);

        // No signal yet: the deadline must not fire, however long we wait.
        assert!(
            tokio::time::timeout(Duration::from_secs(3600), deadline.as_mut())
                .await
                .is_err()
        );

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(31), deadline.as_mut())
            .await
            .expect("deadline fires within the drain window");
    }
}
