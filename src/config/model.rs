//! Serde data structures for the Hawwa settings file.
//!
//! Contains [`Settings`] (the root), [`CurrencySettings`],
//! [`SidebarSection`] / [`SidebarItem`], [`UrlNamespace`] / [`UrlRoute`],
//! and [`ApiSettings`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_symbol() -> String {
    "QAR".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn is_default_currency(v: &CurrencySettings) -> bool {
    *v == CurrencySettings::default()
}

fn is_default_api(v: &ApiSettings) -> bool {
    v.version == default_api_version() && v.resources.is_empty()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "is_default_currency")]
    pub currency: CurrencySettings,

    /// Free-form values exposed to templates as `HAWWA_SETTINGS`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub site: BTreeMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidebar: Vec<SidebarSection>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<UrlNamespace>,

    #[serde(default, skip_serializing_if = "is_default_api")]
    pub api: ApiSettings,
}

impl Settings {
    #[must_use]
    pub fn total_url_names(&self) -> usize {
        self.urls.iter().map(|ns| ns.routes.len()).sum()
    }

    #[must_use]
    pub fn total_sidebar_items(&self) -> usize {
        self.sidebar.iter().map(|s| s.items.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencySettings {
    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_symbol")]
    pub code: String,

    #[serde(default)]
    pub position: SymbolPosition,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            code: default_symbol(),
            position: SymbolPosition::Before,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarSection {
    pub title: String,

    #[serde(default)]
    pub items: Vec<SidebarItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarItem {
    pub label: String,

    /// Qualified route name, e.g. `bookings:booking_list`.
    pub url_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Permission required to see the item. `None` means always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perm: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UrlNamespace {
    pub namespace: String,

    /// Mount point, e.g. `/bookings/`.
    pub prefix: String,

    #[serde(default)]
    pub routes: Vec<UrlRoute>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UrlRoute {
    pub name: String,

    /// Path relative to the namespace prefix, with `:param` segments.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSettings {
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Resource names listed by the API root, e.g. `bookings`.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            version: default_api_version(),
            resources: Vec::new(),
        }
    }
}
