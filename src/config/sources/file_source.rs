//! Generic async file-based settings source with SHA-256 change detection.
//!
//! [`FileSource`] implements [`ConfigSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the file asynchronously via Tokio, validates the result, and computes
//! a SHA-256 hash for version tracking.

use std::path::PathBuf;

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::Settings;
use crate::config::validation::validate;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::HawwaError;

type Deserialize = fn(&str) -> Result<Settings, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserialize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserialize) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, HawwaError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HawwaError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                HawwaError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<(Settings, ConfigVersion), HawwaError> {
        let content = self.read_content().await?;

        let settings = (self.deserialize)(&content).map_err(|e| HawwaError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&settings) {
            return Err(HawwaError::ConfigValidation { errors });
        }

        let hash = sha256_hex(content.as_bytes());
        Ok((settings, ConfigVersion::Hash(hash)))
    }

    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, HawwaError> {
        let content = self.read_content().await?;
        let hash = sha256_hex(content.as_bytes());
        Ok(*current != ConfigVersion::Hash(hash))
    }
}
