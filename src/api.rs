//! Versioned REST sub-router.
//!
//! Mounts `GET /api/{version}/`, an index of the registered resources, and
//! the `auth/login/` and `auth/logout/` paths. Session handling is not part
//! of this service, so both auth paths answer `501 Not Implemented`.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::middleware::RequestId;
use crate::server::AppState;

/// Routes for one API version. Paths are spelled out in full rather than
/// nested so the trailing slash of the root is matched exactly.
pub fn router(version: &str) -> Router<Arc<AppState>> {
    let base = format!("/api/{version}");
    Router::new()
        .route(&format!("{base}/"), get(api_root))
        .route(&format!("{base}/auth/login/"), get(login).post(login))
        .route(&format!("{base}/auth/logout/"), post(logout))
}

/// Path of a resource's list endpoint.
#[must_use]
pub fn resource_path(version: &str, resource: &str) -> String {
    format!("/api/{version}/{resource}/")
}

/// Join `path` onto `site_url`, or return `path` unchanged when there is no
/// usable base.
#[must_use]
pub fn absolute_url(site_url: Option<&str>, path: &str) -> String {
    let Some(base) = site_url else {
        return path.to_string();
    };
    match url::Url::parse(base).and_then(|b| b.join(path)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::warn!(site_url = %base, error = %e, "site_url unusable, serving relative links");
            path.to_string()
        }
    }
}

async fn api_root(
    State(state): State<Arc<AppState>>,
    request_id: Option<RequestId>,
) -> Json<Value> {
    let settings = Arc::clone(&state.config.read().await.settings);
    let mut index = Map::new();
    for resource in &settings.api.resources {
        let path = resource_path(&state.api_version, resource);
        index.insert(
            resource.clone(),
            Value::String(absolute_url(settings.site_url.as_deref(), &path)),
        );
    }
    tracing::debug!(
        request_id = request_id.as_ref().map_or("-", RequestId::as_str),
        resources = index.len(),
        "api root served"
    );
    Json(Value::Object(index))
}

async fn login() -> ApiError {
    ApiError::NotImplemented("Login is handled by the accounts service.".into())
}

async fn logout() -> ApiError {
    ApiError::NotImplemented("Logout is handled by the accounts service.".into())
}
