//! String filters: splitting, first element, search highlighting.

use regex::RegexBuilder;
use serde_json::Value;

/// Split on `sep`, or on whitespace when no separator is given.
#[must_use]
pub fn split(value: Option<&str>, sep: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match sep {
        Some(sep) if !sep.is_empty() => value.split(sep).map(String::from).collect(),
        _ => value.split_whitespace().map(String::from).collect(),
    }
}

/// First element of an array or first character of a string, else `""`.
#[must_use]
pub fn first(value: &Value) -> Value {
    match value {
        Value::Array(items) => items.first().cloned().unwrap_or_else(|| Value::from("")),
        Value::String(s) => Value::from(s.chars().next().map(String::from).unwrap_or_default()),
        _ => Value::from(""),
    }
}

/// Wrap case-insensitive occurrences of `query` in
/// `<span class="search-highlight">`. The result is HTML-escaped apart
/// from the inserted spans.
#[must_use]
pub fn highlight_search(value: &str, query: &str) -> String {
    if value.is_empty() || query.is_empty() {
        return html_escape::encode_text(value).into_owned();
    }
    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, "highlight pattern rejected");
            return html_escape::encode_text(value).into_owned();
        }
    };

    let mut out = String::with_capacity(value.len() + 32);
    let mut last = 0;
    for m in pattern.find_iter(value) {
        out.push_str(&html_escape::encode_text(&value[last..m.start()]));
        out.push_str(r#"<span class="search-highlight">"#);
        out.push_str(&html_escape::encode_text(m.as_str()));
        out.push_str("</span>");
        last = m.end();
    }
    out.push_str(&html_escape::encode_text(&value[last..]));
    out
}
