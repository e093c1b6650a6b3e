//! `hawwa run` — start the web backend.
//!
//! Loads settings from a file source (with an optional fallback file),
//! runs the one-time app bootstrap, starts the Axum HTTP server with
//! graceful shutdown, and spawns a background settings refresh loop for
//! hot-reloading.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::apps::AppRegistry;
use crate::cli::RunArgs;
use crate::config::sources;
use crate::config::{ConfigResolver, ConfigSource};
use crate::error::HawwaError;
use crate::logging;
use crate::server::{self, AppState, LoadedConfig};

pub async fn execute(args: RunArgs) -> Result<(), HawwaError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let resolver = resolve_config_sources(&args).await?;
    let (settings, version) = resolver.load_with_fallback().await?;

    let mut registry = AppRegistry::with_defaults();
    registry.populate()?;

    let loaded = LoadedConfig::new(settings, version, resolver.primary_name());
    let url_names = loaded.urls.len();
    let api_version = loaded.settings.api.version.clone();
    let state = Arc::new(AppState::new(loaded, registry.app_names()));

    // Dropping shutdown_tx closes the channel and stops the refresh loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let refresh_state = state.clone();
    let poll_interval = args.poll_interval;
    let refresh_handle = tokio::spawn(async move {
        config_refresh_loop(refresh_state, resolver, poll_interval, shutdown_rx).await;
    });

    let router = server::build_router(
        state,
        args.max_body,
        Duration::from_millis(args.timeout),
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        url_names,
        api = %format!("/api/{api_version}/"),
        apps = %registry.app_names().join(","),
        "hawwa started"
    );

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown)
    .await?;

    if let Err(e) = refresh_handle.await {
        tracing::error!(error = %e, "settings refresh task failed");
    }

    tracing::info!("hawwa stopped");
    Ok(())
}

async fn resolve_config_sources(args: &RunArgs) -> Result<ConfigResolver, HawwaError> {
    let primary = resolve_file_source(args.config.as_deref()).await?;
    let fallback = args
        .fallback_config
        .as_deref()
        .map(create_file_source)
        .transpose()?;

    match (primary, fallback) {
        (Some(primary), fallback) => Ok(ConfigResolver::new(primary, fallback)),
        (None, Some(fallback)) => {
            tracing::warn!("no primary settings file, using fallback only");
            Ok(ConfigResolver::new(fallback, None))
        }
        (None, None) => Err(HawwaError::NoConfigSource {
            hint: "Provide --config <file> or place hawwa.yaml in the working directory.\n  \
                   Run 'hawwa init' to create a settings file."
                .into(),
        }),
    }
}

async fn resolve_file_source(
    explicit: Option<&Path>,
) -> Result<Option<Box<dyn ConfigSource>>, HawwaError> {
    if let Some(path) = explicit {
        return create_file_source(path).map(Some);
    }

    let candidates = ["hawwa.yaml", "hawwa.yml", "hawwa.json", "hawwa.toml"];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected settings file");
            return create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}

fn create_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, HawwaError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(HawwaError::UnsupportedFormat(other.to_string())),
    }
}

async fn config_refresh_loop(
    state: Arc<AppState>,
    resolver: ConfigResolver,
    interval_secs: u64,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    interval.tick().await; // first tick is immediate

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("settings refresh loop shutting down");
                return;
            }
        }

        let current_version = state.config.read().await.version.clone();

        match resolver.primary().has_changed(&current_version).await {
            Ok(true) => {
                tracing::info!("settings change detected, reloading");
                match resolver.load_with_fallback().await {
                    Ok((settings, version)) => {
                        let loaded = LoadedConfig::new(settings, version, resolver.primary_name());
                        let url_names = loaded.urls.len();
                        if loaded.settings.api.version != state.api_version {
                            tracing::warn!(
                                mounted = %state.api_version,
                                configured = %loaded.settings.api.version,
                                "api version changed; restart to remount the API"
                            );
                        }
                        *state.config.write().await = loaded;
                        state.stats.config_reloads.fetch_add(1, Ordering::Relaxed);
                        tracing::info!(url_names, "settings reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "settings reload failed, keeping current settings");
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "settings change check failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            create_file_source(Path::new("settings.ini")),
            Err(HawwaError::UnsupportedFormat(ref e)) if e == "ini"
        ));
    }

    #[test]
    fn json_source_is_always_available() {
        let source = create_file_source(Path::new("hawwa.json")).unwrap();
        assert_eq!(source.name(), "json");
    }
}
