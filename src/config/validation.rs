//! Settings validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Settings`] for structural
//! errors such as an empty currency symbol, malformed URL prefixes,
//! duplicate route names, bad permission codes, or an unusable API
//! version. Returns a list of [`ValidationError`] values with per-field
//! suggestions.

use std::collections::HashSet;

use url::Url;

use super::model::{Settings, UrlNamespace};
use crate::error::ValidationError;

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validate a namespace prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix cannot be empty (use '/' for the site root)".into());
    }
    if !prefix.starts_with('/') {
        return Err("prefix must start with '/'".into());
    }
    if !prefix.ends_with('/') {
        return Err("prefix must end with '/'".into());
    }
    Ok(())
}

/// Validate a route path relative to its namespace prefix.
pub fn validate_route_path(path: &str) -> Result<(), String> {
    if path.starts_with('/') {
        return Err("route path is relative to the namespace prefix and must not start with '/'".into());
    }
    let mut seen = HashSet::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if let Some(param) = segment.strip_prefix(':') {
            if !is_identifier(param) {
                return Err(format!("'{segment}' is not a valid parameter segment"));
            }
            if !seen.insert(param) {
                return Err(format!("parameter ':{param}' appears more than once"));
            }
        }
    }
    Ok(())
}

/// Validate the public site URL. Returns `Ok(())` or a human-readable error.
pub fn validate_site_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate a permission code of the form `app_label.codename`.
pub fn validate_perm(perm: &str) -> Result<(), String> {
    match perm.split_once('.') {
        Some((app, codename)) if is_identifier(app) && is_identifier(codename) => Ok(()),
        _ => Err(format!(
            "'{perm}' is not a permission code (expected 'app_label.codename')"
        )),
    }
}

fn error(section: &str, field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        section: section.into(),
        field: field.into(),
        message: message.into(),
        suggestion: None,
    }
}

fn validate_namespace(ns: &UrlNamespace, index: usize, errors: &mut Vec<ValidationError>) {
    let section = if ns.namespace.is_empty() {
        format!("urls[{index}]")
    } else {
        format!("urls.{}", ns.namespace)
    };

    if !is_identifier(&ns.namespace) {
        errors.push(error(
            &section,
            "namespace",
            "namespace must be a non-empty identifier (letters, digits, '_', '-')",
        ));
    }

    if let Err(msg) = validate_prefix(&ns.prefix) {
        let suggestion = if ns.prefix.is_empty() {
            None
        } else {
            let trimmed = ns.prefix.trim_matches('/');
            Some(format!("did you mean '/{trimmed}/'?"))
        };
        errors.push(ValidationError {
            section: section.clone(),
            field: "prefix".into(),
            message: msg,
            suggestion,
        });
    }

    let mut seen_names = HashSet::new();
    for route in &ns.routes {
        if !is_identifier(&route.name) {
            errors.push(error(
                &section,
                "routes.name",
                format!("'{}' is not a valid route name", route.name),
            ));
        }
        if !seen_names.insert(route.name.as_str()) {
            errors.push(error(
                &section,
                "routes.name",
                format!("duplicate route name '{}'", route.name),
            ));
        }
        if let Err(msg) = validate_route_path(&route.path) {
            errors.push(ValidationError {
                section: section.clone(),
                field: format!("routes.{}.path", route.name),
                message: msg,
                suggestion: route
                    .path
                    .strip_prefix('/')
                    .map(|p| format!("did you mean '{p}'?")),
            });
        }
    }
}

pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.currency.symbol.trim().is_empty() {
        errors.push(error("currency", "symbol", "currency symbol cannot be empty"));
    }
    let code = &settings.currency.code;
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError {
            section: "currency".into(),
            field: "code".into(),
            message: format!("'{code}' is not an ISO 4217 currency code"),
            suggestion: (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
                .then(|| format!("did you mean '{}'?", code.to_ascii_uppercase())),
        });
    }

    if let Some(ref site_url) = settings.site_url {
        if let Err(msg) = validate_site_url(site_url) {
            errors.push(error("(root)", "site_url", msg));
        }
    }

    let mut seen_namespaces = HashSet::new();
    for (i, ns) in settings.urls.iter().enumerate() {
        if !ns.namespace.is_empty() && !seen_namespaces.insert(ns.namespace.as_str()) {
            errors.push(error(
                &format!("urls.{}", ns.namespace),
                "namespace",
                "duplicate namespace",
            ));
        }
        validate_namespace(ns, i, &mut errors);
    }

    for (i, section) in settings.sidebar.iter().enumerate() {
        let section_id = if section.title.is_empty() {
            format!("sidebar[{i}]")
        } else {
            format!("sidebar.{}", section.title)
        };
        if section.title.trim().is_empty() {
            errors.push(error(&section_id, "title", "section title cannot be empty"));
        }
        for item in &section.items {
            if item.label.trim().is_empty() {
                errors.push(error(&section_id, "items.label", "item label cannot be empty"));
            }
            if item.url_name.trim().is_empty() {
                errors.push(error(
                    &section_id,
                    "items.url_name",
                    format!("item '{}' has no url_name", item.label),
                ));
            }
            if let Some(ref perm) = item.perm {
                if let Err(msg) = validate_perm(perm) {
                    errors.push(error(&section_id, "items.perm", msg));
                }
            }
        }
    }

    let version = &settings.api.version;
    if version.is_empty()
        || !version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        errors.push(error(
            "api",
            "version",
            format!("'{version}' is not a usable API version segment"),
        ));
    }
    let mut seen_resources = HashSet::new();
    for resource in &settings.api.resources {
        if !is_identifier(resource) {
            errors.push(error(
                "api",
                "resources",
                format!("'{resource}' is not a valid resource name"),
            ));
        }
        if !seen_resources.insert(resource.as_str()) {
            errors.push(error(
                "api",
                "resources",
                format!("duplicate resource '{resource}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, settings: &Settings) -> String {
    let mut lines = vec![format!(
        "  {} url namespaces, {} url names, {} sidebar items\n",
        settings.urls.len(),
        settings.total_url_names(),
        settings.total_sidebar_items(),
    )];

    lines.push(format!(
        "  currency: {} ({}, symbol {:?})",
        settings.currency.symbol,
        settings.currency.code,
        settings.currency.position,
    ));
    lines.push(format!(
        "  api:      /api/{}/ ({} resources)",
        settings.api.version,
        settings.api.resources.len()
    ));

    for ns in &settings.urls {
        lines.push(format!(
            "  {}  -> {} ({} routes)",
            ns.namespace,
            ns.prefix,
            ns.routes.len()
        ));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{SidebarItem, SidebarSection, UrlRoute};

    fn bookings() -> UrlNamespace {
        UrlNamespace {
            namespace: "bookings".into(),
            prefix: "/bookings/".into(),
            routes: vec![
                UrlRoute {
                    name: "booking_list".into(),
                    path: String::new(),
                },
                UrlRoute {
                    name: "booking_detail".into(),
                    path: ":pk/".into(),
                },
            ],
        }
    }

    fn minimal_settings() -> Settings {
        Settings {
            urls: vec![bookings()],
            sidebar: vec![SidebarSection {
                title: "Operations".into(),
                items: vec![SidebarItem {
                    label: "Bookings".into(),
                    url_name: "bookings:booking_list".into(),
                    icon: None,
                    perm: Some("bookings.view_booking".into()),
                }],
            }],
            ..Settings::default()
        }
    }

    #[test]
    fn valid_settings_pass() {
        assert!(validate(&minimal_settings()).is_ok());
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn empty_symbol_fails() {
        let mut settings = minimal_settings();
        settings.currency.symbol = "  ".into();
        let errors = validate(&settings).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "symbol"));
    }

    #[test]
    fn lowercase_code_suggests_uppercase() {
        let mut settings = minimal_settings();
        settings.currency.code = "qar".into();
        let errors = validate(&settings).unwrap_err();
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean 'QAR'?"));
    }

    #[test]
    fn prefix_without_slashes_suggests_fix() {
        let mut settings = minimal_settings();
        settings.urls[0].prefix = "bookings".into();
        let errors = validate(&settings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/bookings/'?")));
    }

    #[test]
    fn duplicate_namespace_fails() {
        let mut settings = minimal_settings();
        settings.urls.push(bookings());
        let errors = validate(&settings).unwrap_err();
        assert!(errors.iter().any(|e| e.message == "duplicate namespace"));
    }

    #[test]
    fn duplicate_route_name_fails() {
        let mut settings = minimal_settings();
        settings.urls[0].routes.push(UrlRoute {
            name: "booking_list".into(),
            path: "all/".into(),
        });
        let errors = validate(&settings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("duplicate route name")));
    }

    #[test]
    fn absolute_route_path_fails() {
        let mut settings = minimal_settings();
        settings.urls[0].routes[1].path = "/:pk/".into();
        let errors = validate(&settings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean ':pk/'?")));
    }

    #[test]
    fn repeated_parameter_fails() {
        assert!(validate_route_path(":id/items/:id/").is_err());
        assert!(validate_route_path(":/").is_err());
        assert!(validate_route_path(":id/items/:item_id/").is_ok());
    }

    #[test]
    fn malformed_perm_fails() {
        let mut settings = minimal_settings();
        settings.sidebar[0].items[0].perm = Some("view_booking".into());
        let errors = validate(&settings).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "items.perm"));
    }

    #[test]
    fn bad_site_url_fails() {
        let mut settings = minimal_settings();
        settings.site_url = Some("ftp://hawwa.qa".into());
        let errors = validate(&settings).unwrap_err();
        assert!(errors[0].message.contains("unsupported scheme"));

        settings.site_url = Some("not a url".into());
        let errors = validate(&settings).unwrap_err();
        assert!(errors[0].message.contains("not a valid URL"));
    }

    #[test]
    fn api_version_with_slash_fails() {
        let mut settings = minimal_settings();
        settings.api.version = "v1/beta".into();
        let errors = validate(&settings).unwrap_err();
        assert!(errors.iter().any(|e| e.section == "api" && e.field == "version"));
    }

    #[test]
    fn duplicate_resource_fails() {
        let mut settings = minimal_settings();
        settings.api.resources = vec!["bookings".into(), "bookings".into()];
        let errors = validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn report_lists_namespaces() {
        let report = format_validation_report("hawwa.yaml", &minimal_settings());
        assert!(report.starts_with("hawwa.yaml is valid"));
        assert!(report.contains("bookings  -> /bookings/ (2 routes)"));
    }
}
