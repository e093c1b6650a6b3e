//! `hawwa health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::HawwaError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), HawwaError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| HawwaError::UriParse {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| HawwaError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| HawwaError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| HawwaError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| HawwaError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(HawwaError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", render(&args.url, &health)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn render(url: &str, health: &HealthResponse) -> String {
    let s = &health.settings;
    format!(
        "\u{2713} hawwa is healthy ({url})\n  \
         uptime:           {}\n  \
         build:            {} ({})\n  \
         settings source:  {}\n  \
         settings version: {} (loaded {}s ago)\n  \
         urls:             {} names, {} sidebar items\n  \
         api:              /api/{}/\n  \
         apps:             {}\n  \
         requests:         {} served, {} failed\n",
        format_uptime(health.uptime_seconds),
        health.version,
        health.git_sha,
        s.source,
        s.version,
        s.loaded_ago_seconds,
        s.url_names,
        s.sidebar_items,
        s.api_version,
        health.apps.join(", "),
        health.stats.requests_served,
        health.stats.requests_failed,
    )
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3_725), "1h 2m 5s");
    }

    #[test]
    fn renders_health_summary() {
        let health: HealthResponse = serde_json::from_value(serde_json::json!({
            "status": "healthy",
            "version": "0.1.0",
            "git_sha": "abc1234",
            "uptime_seconds": 61,
            "settings": {
                "source": "yaml",
                "version": "deadbeef",
                "loaded_ago_seconds": 3,
                "url_names": 7,
                "sidebar_items": 3,
                "api_version": "v1"
            },
            "apps": ["core", "financial"],
            "stats": {"requests_served": 10, "requests_failed": 1, "settings_reloads": 0}
        }))
        .unwrap();
        let text = render("http://localhost:8000", &health);
        assert!(text.contains("1m 1s"));
        assert!(text.contains("core, financial"));
        assert!(text.contains("10 served, 1 failed"));
    }
}
