//! Response counters backing the `/health` stats block.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::server::AppState;

pub async fn track_stats(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if response.status().is_server_error() {
        state.stats.failed.fetch_add(1, Ordering::Relaxed);
    } else {
        state.stats.served.fetch_add(1, Ordering::Relaxed);
    }
    response
}
