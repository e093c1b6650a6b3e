//! Structured logging setup using the `tracing` ecosystem.
//!
//! Configures a `tracing-subscriber` with either JSON output (for
//! production) or pretty-printed output (for TTY / local dev). Format
//! is auto-detected from the terminal but can be forced via `--json`
//! or `--pretty`.
//!
//! Per-request fields come from [`RequestSpan`], the span maker handed to
//! `TraceLayer`: every event logged while handling a request is recorded
//! inside a `request` span carrying `request_id`, `ip`, `url` and `method`.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use tower_http::trace::MakeSpan;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;
use crate::middleware::RequestId;

/// Placeholder for a context field that is not known.
pub const UNKNOWN: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = Targets::new().with_default(level.to_tracing_level());

    #[cfg(feature = "sentry-integration")]
    let sentry_layer = Some(sentry_tracing::layer());
    #[cfg(not(feature = "sentry-integration"))]
    let sentry_layer: Option<tracing_subscriber::layer::Identity> = None;

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(sentry_layer)
                .with(fmt::layer().json().with_target(false).with_current_span(true))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(sentry_layer)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

/// Correlation fields attached to every log record of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub ip: String,
    pub url: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: UNKNOWN.to_string(),
            ip: UNKNOWN.to_string(),
            url: UNKNOWN.to_string(),
        }
    }
}

impl RequestContext {
    /// Read the context off a request. Fields not available yet are `-`.
    #[must_use]
    pub fn from_request<B>(req: &http::Request<B>) -> Self {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map_or_else(|| UNKNOWN.to_string(), ToString::to_string);
        let ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| UNKNOWN.to_string(), |ConnectInfo(addr)| addr.ip().to_string());
        let url = match req.uri().path() {
            "" => UNKNOWN.to_string(),
            path => path.to_string(),
        };
        Self {
            request_id,
            ip,
            url,
        }
    }
}

/// `TraceLayer` span maker producing the `request` span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, req: &http::Request<B>) -> tracing::Span {
        let ctx = RequestContext::from_request(req);
        tracing::info_span!(
            "request",
            request_id = %ctx.request_id,
            ip = %ctx.ip,
            url = %ctx.url,
            method = %req.method(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_wins() {
        assert_eq!(resolve_format(false, true), LogFormat::Json);
        assert_eq!(resolve_format(true, false), LogFormat::Pretty);
    }

    #[test]
    fn bare_request_defaults_to_dashes() {
        let req = http::Request::builder().uri("/").body(()).unwrap();
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.request_id, "-");
        assert_eq!(ctx.ip, "-");
        assert_eq!(ctx.url, "/");
    }

    #[test]
    fn context_reads_extensions() {
        let mut req = http::Request::builder()
            .uri("/bookings/12/?tab=items")
            .body(())
            .unwrap();
        let id = crate::middleware::request_id::on_request(&mut req);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 52000))));

        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.request_id, id.as_str());
        assert_eq!(ctx.ip, "10.0.0.7");
        assert_eq!(ctx.url, "/bookings/12/");
    }

    #[test]
    fn default_context_is_all_dashes() {
        let ctx = RequestContext::default();
        assert_eq!(
            (ctx.request_id.as_str(), ctx.ip.as_str(), ctx.url.as_str()),
            ("-", "-", "-")
        );
    }
}
