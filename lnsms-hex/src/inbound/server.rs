//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use lnsms_types::{Ledger, LightningWallet};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::RelayService;

/// HTTP Server for the relay API.
pub struct HttpServer<L: Ledger, W: LightningWallet> {
    state: Arc<AppState<L, W>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<L: Ledger, W: LightningWallet> HttpServer<L, W> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: RelayService<L, W>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 20 req / 5 min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: RelayService<L, W>, requests: u32, period: Duration) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::new(requests, period)),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/requestinvoicetonumber",
                post(handlers::request_invoice::<L, W>),
            )
            .route("/claim", post(handlers::claim::<L, W>))
            .route("/api-docs/openapi.json", get(handlers::openapi_spec))
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
