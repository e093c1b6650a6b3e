//! User display helpers for the navbar and avatars.

use serde::{Deserialize, Serialize};

/// The fields of a user the templates display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub is_authenticated: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl UserView {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One uppercase initial: first name, else email; empty for anonymous.
#[must_use]
pub fn user_initial(user: Option<&UserView>) -> String {
    let Some(user) = user.filter(|u| u.is_authenticated) else {
        return String::new();
    };
    [user.first_name.as_str(), user.email.as_str()]
        .into_iter()
        .find_map(|s| s.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Full name, else email; empty for anonymous.
#[must_use]
pub fn user_display_name(user: Option<&UserView>) -> String {
    let Some(user) = user.filter(|u| u.is_authenticated) else {
        return String::new();
    };
    let full = user.full_name();
    if full.is_empty() {
        user.email.clone()
    } else {
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str, email: &str) -> UserView {
        UserView {
            is_authenticated: true,
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
        }
    }

    #[test]
    fn initial_prefers_first_name() {
        assert_eq!(user_initial(Some(&user("mariam", "", "m@hawwa.qa"))), "M");
        assert_eq!(user_initial(Some(&user("", "", "noor@hawwa.qa"))), "N");
        assert_eq!(user_initial(Some(&user("", "", ""))), "");
    }

    #[test]
    fn anonymous_users_render_empty() {
        let anon = UserView::default();
        assert_eq!(user_initial(Some(&anon)), "");
        assert_eq!(user_display_name(Some(&anon)), "");
        assert_eq!(user_display_name(None), "");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(
            user_display_name(Some(&user("Mariam", "Al-Thani", "m@hawwa.qa"))),
            "Mariam Al-Thani"
        );
        assert_eq!(
            user_display_name(Some(&user("", "", "m@hawwa.qa"))),
            "m@hawwa.qa"
        );
    }
}
