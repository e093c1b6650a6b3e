//! `hawwa validate` — check a settings file for errors.
//!
//! Parses and validates the settings file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::sources::parse_settings_str;
use crate::config::validation;
use crate::error::HawwaError;

pub fn execute(args: &ValidateArgs) -> Result<(), HawwaError> {
    let path = &args.config;

    if !path.exists() {
        return Err(HawwaError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let settings = parse_settings_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&settings) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "section": e.section,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(HawwaError::ConfigValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &settings)
            );
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "url_namespaces": settings.urls.len(),
                    "url_names": settings.total_url_names(),
                    "sidebar_items": settings.total_sidebar_items(),
                    "api_resources": settings.api.resources.len(),
                })
            );
        }
    }

    Ok(())
}
