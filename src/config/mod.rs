//! Settings loading, validation, and hot-reloading.
//!
//! Defines the [`ConfigSource`] trait for pluggable settings backends,
//! the [`ConfigResolver`] for primary/fallback source resolution, and
//! the [`ConfigVersion`] enum for change detection. Submodules provide
//! the data model, validation logic, and concrete source implementations.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::HawwaError;
use model::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

impl ConfigVersion {
    /// Short form for display (first 8 hex chars of the hash).
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
        }
    }
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Settings, ConfigVersion), HawwaError>;
    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, HawwaError>;
}

pub struct ConfigResolver {
    primary: Box<dyn ConfigSource>,
    fallback: Option<Box<dyn ConfigSource>>,
}

impl ConfigResolver {
    #[must_use]
    pub fn new(primary: Box<dyn ConfigSource>, fallback: Option<Box<dyn ConfigSource>>) -> Self {
        Self { primary, fallback }
    }

    pub async fn load_with_fallback(&self) -> Result<(Settings, ConfigVersion), HawwaError> {
        match self.primary.load().await {
            Ok(result) => Ok(result),
            Err(primary_err) => {
                if let Some(ref fallback) = self.fallback {
                    tracing::warn!(
                        primary = self.primary.name(),
                        fallback = fallback.name(),
                        error = %primary_err,
                        "primary settings source failed, using fallback"
                    );
                    fallback.load().await
                } else {
                    Err(primary_err)
                }
            }
        }
    }

    #[must_use]
    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    #[must_use]
    pub fn primary(&self) -> &dyn ConfigSource {
        &*self.primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<Settings>, &'static str);

    #[async_trait]
    impl ConfigSource for Fixed {
        fn name(&self) -> &'static str {
            self.1
        }

        async fn load(&self) -> Result<(Settings, ConfigVersion), HawwaError> {
            self.0.clone().map_or_else(
                || {
                    Err(HawwaError::ConfigFileNotFound {
                        path: "missing.yaml".into(),
                    })
                },
                |s| Ok((s, ConfigVersion::Hash(self.1.into()))),
            )
        }

        async fn has_changed(&self, _current: &ConfigVersion) -> Result<bool, HawwaError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn fallback_used_when_primary_fails() {
        let resolver = ConfigResolver::new(
            Box::new(Fixed(None, "primary")),
            Some(Box::new(Fixed(Some(Settings::default()), "fallback"))),
        );
        let (_, version) = resolver.load_with_fallback().await.unwrap();
        assert_eq!(version, ConfigVersion::Hash("fallback".into()));
        assert_eq!(resolver.primary_name(), "primary");
    }

    #[tokio::test]
    async fn primary_error_surfaces_without_fallback() {
        let resolver = ConfigResolver::new(Box::new(Fixed(None, "primary")), None);
        assert!(matches!(
            resolver.load_with_fallback().await,
            Err(HawwaError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn short_version_truncates_hash() {
        assert_eq!(ConfigVersion::Hash("0123456789abcdef".into()).short(), "01234567");
        assert_eq!(ConfigVersion::Hash("abc".into()).short(), "abc");
    }
}
