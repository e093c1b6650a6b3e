//! `hawwa init` — generate a starter settings file.
//!
//! Creates a YAML, JSON, or TOML settings file with either a minimal
//! or a full template.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::HawwaError;

pub fn execute(args: &InitArgs) -> Result<(), HawwaError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("hawwa.{}", args.format.extension())));

    if output.exists() {
        return Err(HawwaError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# Hawwa settings

currency:
  symbol: "QAR"
  code: "QAR"

site:
  SITE_NAME: "Hawwa"
"#;

const YAML_FULL: &str = r#"# Hawwa settings
#
# Values shown for currency and api are the defaults.

currency:
  symbol: "QAR"
  code: "QAR"
  position: before            # before | after

# Exposed to templates as HAWWA_SETTINGS
site:
  SITE_NAME: "Hawwa"
  SUPPORT_EMAIL: "support@hawwa.qa"

# Base for absolute links in the API root
# site_url: "https://hawwa.qa"

sidebar:
  - title: "Operations"
    items:
      - label: "Bookings"
        url_name: "bookings:booking_list"
        icon: "calendar"
      - label: "Services"
        url_name: "services:service_list"
        icon: "briefcase"
  - title: "Finance"
    items:
      - label: "Invoices"
        url_name: "financial:invoice_list"
        icon: "file-text"
        perm: "financial.view_invoice"

urls:
  - namespace: core
    prefix: "/"
    routes:
      - { name: home, path: "" }
  - namespace: bookings
    prefix: "/bookings/"
    routes:
      - { name: booking_list, path: "" }
      - { name: booking_detail, path: ":pk/" }
  - namespace: services
    prefix: "/services/"
    routes:
      - { name: service_list, path: "" }
      - { name: service_detail, path: ":pk/" }
  - namespace: financial
    prefix: "/financial/"
    routes:
      - { name: invoice_list, path: "invoices/" }
      - { name: invoice_detail, path: "invoices/:pk/" }

api:
  version: "v1"
  resources: [users, categories, services, bookings, booking-items]
"#;

const JSON_MINIMAL: &str = r#"{
  "currency": {
    "symbol": "QAR",
    "code": "QAR"
  },
  "site": {
    "SITE_NAME": "Hawwa"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "currency": {
    "symbol": "QAR",
    "code": "QAR",
    "position": "before"
  },
  "site": {
    "SITE_NAME": "Hawwa",
    "SUPPORT_EMAIL": "support@hawwa.qa"
  },
  "sidebar": [
    {
      "title": "Operations",
      "items": [
        { "label": "Bookings", "url_name": "bookings:booking_list", "icon": "calendar" },
        { "label": "Services", "url_name": "services:service_list", "icon": "briefcase" }
      ]
    },
    {
      "title": "Finance",
      "items": [
        {
          "label": "Invoices",
          "url_name": "financial:invoice_list",
          "icon": "file-text",
          "perm": "financial.view_invoice"
        }
      ]
    }
  ],
  "urls": [
    { "namespace": "core", "prefix": "/", "routes": [{ "name": "home", "path": "" }] },
    {
      "namespace": "bookings",
      "prefix": "/bookings/",
      "routes": [
        { "name": "booking_list", "path": "" },
        { "name": "booking_detail", "path": ":pk/" }
      ]
    },
    {
      "namespace": "services",
      "prefix": "/services/",
      "routes": [
        { "name": "service_list", "path": "" },
        { "name": "service_detail", "path": ":pk/" }
      ]
    },
    {
      "namespace": "financial",
      "prefix": "/financial/",
      "routes": [
        { "name": "invoice_list", "path": "invoices/" },
        { "name": "invoice_detail", "path": "invoices/:pk/" }
      ]
    }
  ],
  "api": {
    "version": "v1",
    "resources": ["users", "categories", "services", "bookings", "booking-items"]
  }
}
"#;

const TOML_MINIMAL: &str = r#"# Hawwa settings

[currency]
symbol = "QAR"
code = "QAR"

[site]
SITE_NAME = "Hawwa"
"#;

const TOML_FULL: &str = r#"# Hawwa settings
#
# Values shown for currency and api are the defaults.

# site_url = "https://hawwa.qa"

[currency]
symbol = "QAR"
code = "QAR"
position = "before"

[site]
SITE_NAME = "Hawwa"
SUPPORT_EMAIL = "support@hawwa.qa"

[api]
version = "v1"
resources = ["users", "categories", "services", "bookings", "booking-items"]

[[sidebar]]
title = "Operations"

[[sidebar.items]]
label = "Bookings"
url_name = "bookings:booking_list"
icon = "calendar"

[[sidebar.items]]
label = "Services"
url_name = "services:service_list"
icon = "briefcase"

[[sidebar]]
title = "Finance"

[[sidebar.items]]
label = "Invoices"
url_name = "financial:invoice_list"
icon = "file-text"
perm = "financial.view_invoice"

[[urls]]
namespace = "core"
prefix = "/"
routes = [{ name = "home", path = "" }]

[[urls]]
namespace = "bookings"
prefix = "/bookings/"
routes = [
  { name = "booking_list", path = "" },
  { name = "booking_detail", path = ":pk/" },
]

[[urls]]
namespace = "services"
prefix = "/services/"
routes = [
  { name = "service_list", path = "" },
  { name = "service_detail", path = ":pk/" },
]

[[urls]]
namespace = "financial"
prefix = "/financial/"
routes = [
  { name = "invoice_list", path = "invoices/" },
  { name = "invoice_detail", path = "invoices/:pk/" },
]
"#;
