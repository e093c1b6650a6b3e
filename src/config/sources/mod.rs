//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides file-based sources (JSON always, YAML and TOML behind feature
//! flags) and the [`parse_settings_str`] helper for format-specific
//! deserialization, shared with `hawwa validate`.

pub mod file_source;

#[cfg(feature = "yaml")]
pub mod yaml;

pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

use sha2::{Digest, Sha256};

use crate::config::model::Settings;
use crate::error::HawwaError;

/// Parse a settings string based on file extension.
pub fn parse_settings_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Settings, HawwaError> {
    parse_document(ext, content, path_display)
}

/// Deserialize any document type from YAML, JSON or TOML text by extension.
///
/// Used for settings files and for migration files.
pub fn parse_document<T: serde::de::DeserializeOwned>(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<T, HawwaError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| HawwaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| HawwaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| HawwaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(HawwaError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parses_without_feature_flag() {
        let settings = parse_settings_str("json", r#"{"api": {"version": "v2"}}"#, "s.json").unwrap();
        assert_eq!(settings.api.version, "v2");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_settings_str("ini", "", "s.ini").unwrap_err();
        assert!(matches!(err, HawwaError::UnsupportedFormat(ref e) if e == "ini"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_settings_str("json", "{", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn sha256_is_stable() {
        assert_eq!(
            sha256_hex(b"hawwa"),
            format!("{:x}", Sha256::digest(b"hawwa"))
        );
        assert_eq!(sha256_hex(b"").len(), 64);
    }
}
