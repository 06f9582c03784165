//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::AdminServiceConfig;
use crate::error::ErrorBody;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::status::{get_health, get_info};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::reload::ReloadCommand;
use crate::sites::SiteStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SiteStore>,
    pub reloader: Arc<ReloadCommand>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn from_config(config: &AdminServiceConfig) -> Self {
        Self {
            store: Arc::new(SiteStore::from_config(&config.sites)),
            reloader: Arc::new(ReloadCommand::from_config(&config.reload)),
            api_key: config.admin.api_key.as_deref().map(Arc::from),
        }
    }
}

/// HTTP server for the admin API.
pub struct HttpServer {
    router: Router,
    config: AdminServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AdminServiceConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AdminServiceConfig, state: AppState) -> Router {
        Router::new()
            .nest("/api/admin", setup_admin_router(state))
            .route("/api/health", get(get_health))
            .route("/api/info", get(get_info))
            .fallback(fallback)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(DefaultBodyLimit::disable()),
            )
    }

    /// Run the server until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.sites.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found")))
}
