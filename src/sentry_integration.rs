//! Optional Sentry error tracking.
//!
//! Hold the returned guard for the lifetime of the process; dropping it
//! flushes pending events.

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    sentry::init(options(dsn, environment))
}

fn options(dsn: &str, environment: Option<&str>) -> sentry::ClientOptions {
    let parsed_dsn = match dsn.parse() {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled");
            None
        }
    };

    sentry::ClientOptions {
        dsn: parsed_dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: Some(concat!("hawwa@", env!("CARGO_PKG_VERSION")).into()),
        attach_stacktrace: true,
        send_default_pii: false,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dsn_disables_reporting() {
        let opts = options("not a dsn", Some("staging"));
        assert!(opts.dsn.is_none());
        assert_eq!(opts.environment.as_deref(), Some("staging"));
        assert!(opts.release.as_deref().is_some_and(|r| r.starts_with("hawwa@")));
    }
}
