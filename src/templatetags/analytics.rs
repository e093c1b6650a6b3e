//! Score and trend presentation for the analytics dashboards.

use serde_json::Value;

use super::numeric::as_f64;

const GRADES: &[(f64, &str)] = &[
    (95.0, "A+"),
    (90.0, "A"),
    (85.0, "B+"),
    (80.0, "B"),
    (75.0, "C+"),
    (70.0, "C"),
    (65.0, "D+"),
    (60.0, "D"),
];

/// Letter grade for a 0–100 quality score; `N/A` when not numeric.
#[must_use]
pub fn quality_grade(score: &Value) -> &'static str {
    let Some(score) = as_f64(score) else {
        return "N/A";
    };
    GRADES
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map_or("F", |(_, grade)| *grade)
}

#[must_use]
pub fn score_color_class(score: &Value) -> &'static str {
    match as_f64(score) {
        Some(s) if s >= 90.0 => "text-success",
        Some(s) if s >= 80.0 => "text-info",
        Some(s) if s >= 70.0 => "text-warning",
        Some(_) => "text-danger",
        None => "text-muted",
    }
}

/// Font Awesome icon class for a trend label.
#[must_use]
pub fn trend_icon(trend: &str) -> &'static str {
    match trend.to_lowercase().as_str() {
        "improving" | "up" => "fa-arrow-up",
        "declining" | "down" => "fa-arrow-down",
        _ => "fa-minus",
    }
}

/// Human-readable duration for a number of hours.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(hours: &Value) -> String {
    let Some(hours) = as_f64(hours) else {
        return "N/A".to_string();
    };
    if hours < 1.0 {
        format!("{} min", (hours * 60.0).trunc() as i64)
    } else if hours < 24.0 {
        format!("{hours:.1} hrs")
    } else {
        let days = (hours / 24.0).trunc() as i64;
        let remaining = (hours % 24.0).trunc() as i64;
        if remaining > 0 {
            format!("{days}d {remaining}h")
        } else {
            format!("{days} days")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeThresholds {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 80.0,
            average: 70.0,
        }
    }
}

/// Bootstrap badge markup for a performance score.
#[must_use]
pub fn performance_badge(score: &Value, thresholds: BadgeThresholds) -> String {
    let Some(score) = as_f64(score) else {
        return r#"<span class="badge bg-secondary">N/A</span>"#.to_string();
    };
    let class = if score >= thresholds.excellent {
        "bg-success"
    } else if score >= thresholds.good {
        "bg-info"
    } else if score >= thresholds.average {
        "bg-warning"
    } else {
        "bg-danger"
    };
    format!(r#"<span class="badge {class}">{score:.1}</span>"#)
}
