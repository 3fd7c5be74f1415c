//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router construction with every endpoint
//! - Middleware stack (request ids, logging, timeout, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{auth, health, upload};
use crate::routes::{hello, home_page, method_not_allowed, not_found};
use crate::state::ServerState;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{on, post, MethodFilter};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// The returned router owns its state; nothing is registered globally. Every
/// route answers unsupported methods with 405 through the method fallback.
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS (only when `enable_cors` is set)
/// 5. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    // GET routes go through `on` so HEAD falls through to the 405 fallback.
    let routes = Router::new()
        .route(
            "/",
            on(MethodFilter::GET, home_page).fallback(method_not_allowed),
        )
        .route(
            "/hello",
            on(MethodFilter::GET, hello).fallback(method_not_allowed),
        )
        .route(
            "/health",
            on(MethodFilter::GET, health::health_check).fallback(method_not_allowed),
        )
        .route(
            "/auth",
            on(MethodFilter::GET, auth::authenticate)
                .post(auth::authenticate)
                .fallback(method_not_allowed),
        )
        .route(
            "/upload",
            post(upload::upload_files).fallback(method_not_allowed),
        );

    let mut app = routes.fallback(not_found).layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        state.config.timeout(),
    ));

    // The CORS layer answers every OPTIONS request itself, so it is only
    // mounted when cross-origin access is wanted.
    if state.config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the formgate HTTP server
///
/// Initializes logging, builds the router and serves until SIGTERM or
/// Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let state = Arc::new(ServerState::new(config.clone()));
    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting formgate server on {} as {}",
        addr,
        config.service_name
    );
    tracing::info!(
        "Timeout: {}s, Max upload: {}MB",
        config.timeout_secs,
        config.max_upload_mb
    );
    tracing::info!("CORS: {}", config.enable_cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
