//! Template context processors.
//!
//! [`hawwa_settings`] exposes the site settings and a per-user view of the
//! sidebar. [`app_title`] derives a header title for the current page.
//! Both read from [`Settings`] and never modify it.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::model::{SidebarSection, Settings};
use crate::urls::{ResolverMatch, UrlRegistry};

/// What a user is allowed to see.
pub trait Permissions {
    fn has_perm(&self, perm: &str) -> bool;
}

/// A fixed set of `app.codename` grants.
#[derive(Debug, Clone, Default)]
pub struct GrantedPermissions {
    perms: HashSet<String>,
    superuser: bool,
}

impl GrantedPermissions {
    pub fn new<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            perms: perms.into_iter().map(Into::into).collect(),
            superuser: false,
        }
    }

    #[must_use]
    pub fn superuser() -> Self {
        Self {
            perms: HashSet::new(),
            superuser: true,
        }
    }
}

impl Permissions for GrantedPermissions {
    fn has_perm(&self, perm: &str) -> bool {
        self.superuser || self.perms.contains(perm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItemView {
    pub label: String,
    pub url_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<String>,
    pub visible: bool,
    /// Reversed `url_name`, or `""` when it cannot be reversed.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSectionView {
    pub title: String,
    pub items: Vec<SidebarItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    #[serde(rename = "HAWWA_SETTINGS")]
    pub settings: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "HAWWA_SIDEBAR_APPS")]
    pub sidebar: Vec<SidebarSectionView>,
}

/// Site settings plus the sidebar as seen by `user`.
///
/// Items without a `perm` are always visible. Restricted items are visible
/// only to a user holding the permission; `None` (anonymous) sees none.
#[must_use]
pub fn hawwa_settings(
    settings: &Settings,
    user: Option<&dyn Permissions>,
    urls: &UrlRegistry,
) -> TemplateContext {
    let sidebar = settings
        .sidebar
        .iter()
        .map(|section| SidebarSectionView {
            title: section.title.clone(),
            items: section
                .items
                .iter()
                .map(|item| {
                    let visible = match (&item.perm, user) {
                        (None, _) => true,
                        (Some(perm), Some(user)) => user.has_perm(perm),
                        (Some(_), None) => false,
                    };
                    SidebarItemView {
                        label: item.label.clone(),
                        url_name: item.url_name.clone(),
                        icon: item.icon.clone(),
                        perm: item.perm.clone(),
                        visible,
                        href: urls.safe_url(&item.url_name, &[], &[]),
                    }
                })
                .collect(),
        })
        .collect();

    TemplateContext {
        settings: settings.site.clone(),
        sidebar,
    }
}

/// Header title for the resolved page. Empty on the landing page.
#[must_use]
pub fn app_title(resolved: Option<&ResolverMatch>, sidebar: &[SidebarSection]) -> String {
    let Some(resolved) = resolved else {
        return String::new();
    };
    let app = resolved.app_name.as_str();
    let name = resolved.url_name.as_str();

    if app == "core" && (name == "home" || name.is_empty()) {
        return String::new();
    }

    if !app.is_empty() {
        let label = sidebar
            .iter()
            .flat_map(|section| &section.items)
            .find(|item| {
                item.url_name
                    .split_once(':')
                    .is_some_and(|(item_app, _)| item_app == app)
                    && !item.label.is_empty()
            })
            .map(|item| item.label.as_str());
        if let Some(label) = label {
            return capfirst(label);
        }
        return capfirst(&app.replace('_', " "));
    }

    capfirst(&name.replace('_', " "))
}

fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::model::{SidebarItem, UrlNamespace, UrlRoute};

    fn item(label: &str, url_name: &str, perm: Option<&str>) -> SidebarItem {
        SidebarItem {
            label: label.into(),
            url_name: url_name.into(),
            icon: None,
            perm: perm.map(String::from),
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings
            .site
            .insert("brand".into(), serde_json::json!("Hawwa"));
        settings.sidebar = vec![SidebarSection {
            title: "Operations".into(),
            items: vec![
                item("Bookings", "bookings:booking_list", None),
                item("Payroll", "hrms:payroll", Some("hrms.view_payroll")),
            ],
        }];
        settings.urls = vec![UrlNamespace {
            namespace: "bookings".into(),
            prefix: "/bookings/".into(),
            routes: vec![UrlRoute {
                name: "booking_list".into(),
                path: String::new(),
            }],
        }];
        settings
    }

    fn resolved(app: &str, name: &str) -> ResolverMatch {
        ResolverMatch {
            app_name: app.into(),
            url_name: name.into(),
            kwargs: HashMap::new(),
        }
    }

    #[test]
    fn unrestricted_items_are_visible_to_anonymous() {
        let settings = settings();
        let urls = UrlRegistry::from_settings(&settings.urls);
        let ctx = hawwa_settings(&settings, None, &urls);
        let items = &ctx.sidebar[0].items;
        assert!(items[0].visible);
        assert!(!items[1].visible);
    }

    #[test]
    fn restricted_items_follow_permissions() {
        let settings = settings();
        let urls = UrlRegistry::from_settings(&settings.urls);

        let clerk = GrantedPermissions::new(["bookings.view_booking"]);
        let ctx = hawwa_settings(&settings, Some(&clerk), &urls);
        assert!(!ctx.sidebar[0].items[1].visible);

        let hr = GrantedPermissions::new(["hrms.view_payroll"]);
        let ctx = hawwa_settings(&settings, Some(&hr), &urls);
        assert!(ctx.sidebar[0].items[1].visible);

        let admin = GrantedPermissions::superuser();
        let ctx = hawwa_settings(&settings, Some(&admin), &urls);
        assert!(ctx.sidebar[0].items[1].visible);
    }

    #[test]
    fn hrefs_are_reversed_or_empty() {
        let settings = settings();
        let urls = UrlRegistry::from_settings(&settings.urls);
        let ctx = hawwa_settings(&settings, None, &urls);
        assert_eq!(ctx.sidebar[0].items[0].href, "/bookings/");
        assert_eq!(ctx.sidebar[0].items[1].href, "");
    }

    #[test]
    fn settings_are_exposed_and_left_untouched() {
        let settings = settings();
        let before = serde_json::to_value(&settings).unwrap();
        let urls = UrlRegistry::from_settings(&settings.urls);
        let ctx = hawwa_settings(&settings, None, &urls);
        assert_eq!(serde_json::to_value(&settings).unwrap(), before);

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["HAWWA_SETTINGS"]["brand"], "Hawwa");
        assert_eq!(json["HAWWA_SIDEBAR_APPS"][0]["items"][1]["visible"], false);
    }

    #[test]
    fn title_is_empty_on_home() {
        let sidebar = settings().sidebar;
        assert_eq!(app_title(Some(&resolved("core", "home")), &sidebar), "");
        assert_eq!(app_title(None, &sidebar), "");
    }

    #[test]
    fn title_prefers_sidebar_label() {
        let sidebar = settings().sidebar;
        assert_eq!(
            app_title(Some(&resolved("bookings", "booking_detail")), &sidebar),
            "Bookings"
        );
    }

    #[test]
    fn title_falls_back_to_readable_names() {
        let sidebar = settings().sidebar;
        assert_eq!(
            app_title(Some(&resolved("change_management", "index")), &sidebar),
            "Change management"
        );
        assert_eq!(
            app_title(Some(&resolved("", "vendor_list")), &sidebar),
            "Vendor list"
        );
    }
}
