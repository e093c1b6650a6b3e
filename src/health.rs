//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, settings source metadata, the bootstrapped apps,
//! and cumulative response statistics.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_sha: String,
    pub uptime_seconds: u64,
    pub settings: SettingsHealth,
    pub apps: Vec<String>,
    pub stats: StatsResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsHealth {
    pub source: String,
    pub version: String,
    pub loaded_ago_seconds: u64,
    pub url_names: usize,
    pub sidebar_items: usize,
    pub api_version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_served: u64,
    pub requests_failed: u64,
    pub settings_reloads: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    // Clone the Arc and release the lock before building the payload
    let (settings, source_name, version, loaded_ago) = {
        let loaded = state.config.read().await;
        (
            Arc::clone(&loaded.settings),
            loaded.source_name.clone(),
            loaded.version.short().to_string(),
            loaded.loaded_at.elapsed().as_secs(),
        )
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: env!("HAWWA_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        settings: SettingsHealth {
            source: source_name,
            version,
            loaded_ago_seconds: loaded_ago,
            url_names: settings.total_url_names(),
            sidebar_items: settings.total_sidebar_items(),
            api_version: state.api_version.clone(),
        },
        apps: state.apps.clone(),
        stats: StatsResponse {
            requests_served: state.stats.served.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
            settings_reloads: state.stats.config_reloads.load(Ordering::Relaxed),
        },
    })
}
