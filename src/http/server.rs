//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared application state once from configuration
//! - Create the Axum router with the `/notify` and `/health` handlers
//! - Wire up middleware (request ID, tracing) and the body size cap
//! - Serve until the shutdown broadcast fires
//! - Periodically evict idle rate limiter entries

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::NotifyConfig;
use crate::http::handlers::{health, notify};
use crate::lifecycle::ShutdownListener;
use crate::notification::NotificationDispatcher;
use crate::observability::metrics;
use crate::security::{Authenticator, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub limiter: Arc<RateLimiter>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(config: &NotifyConfig, dispatcher: NotificationDispatcher) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(config.auth.token.clone())),
            limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// HTTP server for the notification service.
pub struct HttpServer {
    router: Router,
    config: NotifyConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server with the production speech and popup backends.
    pub fn new(config: NotifyConfig) -> Self {
        let dispatcher = NotificationDispatcher::from_config(&config);
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server around an already-built dispatcher.
    pub fn with_dispatcher(config: NotifyConfig, dispatcher: NotificationDispatcher) -> Self {
        let state = AppState::new(&config, dispatcher);
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &NotifyConfig, state: AppState) -> Router {
        Router::new()
            .route("/notify", post(notify))
            .route("/health", get(health))
            .with_state(state)
            // Checked by the Json extractor: an oversized body is a 422.
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth = self.state.auth.is_enabled(),
            rate_limit = self.config.rate_limit.max_requests,
            visual = self.state.dispatcher.visual_enabled(),
            "HTTP server starting"
        );

        let sweeper = tokio::spawn(sweep_idle_clients(
            self.state.limiter.clone(),
            self.config.rate_limit.sweep_interval(),
            shutdown.resubscribe(),
        ));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "Idle client sweeper failed");
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Evict rate limiter keys with no requests left in their window.
async fn sweep_idle_clients(
    limiter: Arc<RateLimiter>,
    every: Duration,
    mut shutdown: ShutdownListener,
) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = limiter.evict_idle();
                let tracked = limiter.tracked_clients();
                metrics::record_tracked_clients(tracked);
                if evicted > 0 {
                    tracing::debug!(evicted, tracked, "Evicted idle rate limit entries");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
