//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding settings, the URL
//! registry, stats, and uptime), [`build_router`] for constructing the
//! Axum router, [`apply_layers`] for the middleware stack, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::any::Any;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::Uri;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::model::Settings;
use crate::config::ConfigVersion;
use crate::error::ApiError;
use crate::health::health_handler;
use crate::logging::RequestSpan;
use crate::middleware::{request_id_middleware, stats::track_stats};
use crate::urls::UrlRegistry;

#[derive(Debug)]
pub struct LoadedConfig {
    pub settings: Arc<Settings>,
    pub urls: Arc<UrlRegistry>,
    pub version: ConfigVersion,
    pub source_name: String,
    pub loaded_at: Instant,
}

impl LoadedConfig {
    #[must_use]
    pub fn new(settings: Settings, version: ConfigVersion, source_name: impl Into<String>) -> Self {
        let urls = UrlRegistry::from_settings(&settings.urls);
        Self {
            settings: Arc::new(settings),
            urls: Arc::new(urls),
            version,
            source_name: source_name.into(),
            loaded_at: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub struct Stats {
    pub served: AtomicU64,
    pub failed: AtomicU64,
    pub config_reloads: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            served: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            config_reloads: AtomicU64::new(0),
        }
    }
}

pub struct AppState {
    pub config: RwLock<LoadedConfig>,
    pub start_time: Instant,
    /// Names of the apps whose bootstrap ran, in registration order.
    pub apps: Vec<String>,
    /// API version the router was mounted under at start-up.
    pub api_version: String,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(loaded: LoadedConfig, apps: Vec<String>) -> Self {
        let api_version = loaded.settings.api.version.clone();
        Self {
            config: RwLock::new(loaded),
            start_time: Instant::now(),
            apps,
            api_version,
            stats: Stats::new(),
        }
    }
}

pub fn build_router(state: Arc<AppState>, max_body: usize, timeout: Duration) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::router(&state.api_version))
        .fallback(not_found)
        .with_state(state.clone());
    apply_layers(router, state, max_body, timeout)
}

/// Wrap `router` in the middleware stack, outer to inner: correlation id,
/// trace span, response stats, panic recovery, timeout, body limit.
///
/// The correlation layer sits outside everything else so responses produced
/// by the inner layers (panic 500, timeout 408, body-limit 413) still carry
/// `X-Request-ID`. The trace span sits inside it so the id is known when the
/// span is created.
#[allow(deprecated)]
pub fn apply_layers(
    router: Router,
    state: Arc<AppState>,
    max_body: usize,
    timeout: Duration,
) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
            .layer(middleware::from_fn_with_state(state, track_stats))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TimeoutLayer::new(timeout))
            // `Timeout` needs a `Default` response body; box the limit layer's body.
            .map_response(|res: Response<_>| res.map(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(max_body)),
    )
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "handler panicked");
    ApiError::Internal.into_response()
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
