//! Form widget attribute helpers.

use std::collections::BTreeMap;

/// A rendered form field: its name, input type and HTML attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub input_type: String,
    pub attrs: BTreeMap<String, String>,
}

impl FormField {
    #[must_use]
    pub fn new(name: impl Into<String>, input_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        use html_escape::encode_double_quoted_attribute as attr;

        let mut html = format!(
            r#"<input type="{}" name="{}""#,
            attr(&self.input_type),
            attr(&self.name)
        );
        for (key, value) in &self.attrs {
            html.push_str(&format!(r#" {}="{}""#, attr(key), attr(value)));
        }
        html.push('>');
        html
    }
}

/// Append `css` to the field's `class` attribute.
#[must_use]
pub fn add_class(mut field: FormField, css: &str) -> FormField {
    let existing = field.attrs.remove("class").unwrap_or_default();
    let merged = format!("{existing} {css}").trim().to_string();
    if !merged.is_empty() {
        field.attrs.insert("class".into(), merged);
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_to_empty_class() {
        let field = add_class(FormField::new("email", "email"), "form-control");
        assert_eq!(field.attrs["class"], "form-control");
    }

    #[test]
    fn appends_to_existing_class() {
        let mut field = FormField::new("email", "email");
        field.attrs.insert("class".into(), "wide".into());
        let field = add_class(field, "form-control");
        assert_eq!(field.attrs["class"], "wide form-control");
    }

    #[test]
    fn empty_css_leaves_no_class() {
        let field = add_class(FormField::new("q", "text"), "  ");
        assert!(!field.attrs.contains_key("class"));
    }

    #[test]
    fn render_escapes_attributes() {
        let field = add_class(FormField::new("q", "text"), r#"a"b"#);
        assert_eq!(
            field.render(),
            r#"<input type="text" name="q" class="a&quot;b">"#
        );
    }
}
