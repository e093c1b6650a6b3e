//! Currency formatting for templates.
//!
//! [`parse_amount`] and [`CurrencyFormat::try_format`] make failure
//! explicit. The template-facing functions ([`currency`],
//! [`currency_short`] and their aliases) never fail: missing or
//! unparseable input renders as the zero amount (`QAR 0.00`).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::model::{CurrencySettings, SymbolPosition};

/// Tokens stripped from textual amounts before parsing.
const STRIPPED_TOKENS: &[&str] = &["$", "ر.ق", "QAR", ","];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("amount is not a finite number")]
    NotFinite,
}

/// A value handed to a currency helper.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
}

impl From<&str> for Amount {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Amount {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Amount {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Amount {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for Amount {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Amount {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

impl From<&serde_json::Value> for Amount {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Missing),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl Amount {
    /// `Ok(None)` for missing or blank input, `Err` for anything unparseable.
    pub fn to_decimal(&self) -> Result<Option<Decimal>, AmountError> {
        match self {
            Self::Missing => Ok(None),
            Self::Text(s) => parse_amount(s),
            Self::Integer(i) => Ok(Some(Decimal::from(*i))),
            Self::Float(f) if !f.is_finite() => Err(AmountError::NotFinite),
            Self::Float(f) => parse_amount(&f.to_string()),
            Self::Decimal(d) => Ok(Some(*d)),
        }
    }
}

/// Parse a textual amount, tolerating currency symbols and thousands
/// separators.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, AmountError> {
    let mut cleaned = raw.to_string();
    for token in STRIPPED_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "None" {
        return Ok(None);
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .map(Some)
        .map_err(|_| AmountError::NotANumber(raw.to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render `amount` with `dp` decimals and thousands separators.
///
/// Rounds half to even.
#[must_use]
pub fn format_decimal(amount: Decimal, dp: u32) -> String {
    let mut rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    // rescale caps the scale for very large amounts; pad back to dp
    if dp > 0 {
        let frac = frac_part.unwrap_or("");
        out.push('.');
        out.push_str(frac);
        for _ in frac.len()..dp as usize {
            out.push('0');
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    code: String,
    position: SymbolPosition,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::from(&CurrencySettings::default())
    }
}

impl From<&CurrencySettings> for CurrencyFormat {
    fn from(settings: &CurrencySettings) -> Self {
        Self {
            symbol: settings.symbol.clone(),
            code: settings.code.clone(),
            position: settings.position,
        }
    }
}

impl CurrencyFormat {
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    fn affix(&self, number: &str) -> String {
        match self.position {
            SymbolPosition::Before => format!("{} {number}", self.symbol),
            SymbolPosition::After => format!("{number} {}", self.symbol),
        }
    }

    /// Format with explicit outcomes: `Ok(None)` when there is no amount.
    pub fn try_format(&self, amount: impl Into<Amount>, dp: u32) -> Result<Option<String>, AmountError> {
        Ok(amount
            .into()
            .to_decimal()?
            .map(|d| self.affix(&format_decimal(d, dp))))
    }

    fn render(&self, amount: Amount, dp: u32) -> String {
        match self.try_format(amount, dp) {
            Ok(Some(text)) => text,
            Ok(None) => self.affix(&format_decimal(Decimal::ZERO, dp)),
            Err(e) => {
                tracing::debug!(error = %e, "currency input rendered as zero");
                self.affix(&format_decimal(Decimal::ZERO, dp))
            }
        }
    }

    /// Two decimals, e.g. `QAR 5,000.00`.
    #[must_use]
    pub fn format(&self, amount: impl Into<Amount>) -> String {
        self.render(amount.into(), 2)
    }

    /// No decimals, e.g. `QAR 5,000`.
    #[must_use]
    pub fn format_short(&self, amount: impl Into<Amount>) -> String {
        self.render(amount.into(), 0)
    }
}

#[must_use]
pub fn currency(value: impl Into<Amount>) -> String {
    CurrencyFormat::default().format(value)
}

#[must_use]
pub fn currency_short(value: impl Into<Amount>) -> String {
    CurrencyFormat::default().format_short(value)
}

#[must_use]
pub fn currency_format(value: impl Into<Amount>) -> String {
    currency(value)
}

#[must_use]
pub fn qar_format(value: impl Into<Amount>) -> String {
    currency(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_integer_with_grouping() {
        assert_eq!(currency(5000), "QAR 5,000.00");
        assert_eq!(currency(1_234_567_i64), "QAR 1,234,567.00");
        assert_eq!(currency(999), "QAR 999.00");
    }

    #[test]
    fn missing_and_blank_render_zero() {
        assert_eq!(currency(Amount::Missing), "QAR 0.00");
        assert_eq!(currency(None::<&str>), "QAR 0.00");
        assert_eq!(currency(""), "QAR 0.00");
        assert_eq!(currency("None"), "QAR 0.00");
        assert_eq!(currency(&serde_json::Value::Null), "QAR 0.00");
    }

    #[test]
    fn invalid_input_renders_zero() {
        assert_eq!(currency("abc"), "QAR 0.00");
        assert_eq!(currency(f64::NAN), "QAR 0.00");
        assert_eq!(currency_short("twelve"), "QAR 0");
    }

    #[test]
    fn strips_symbols_and_separators() {
        assert_eq!(currency("QAR 1,234.5"), "QAR 1,234.50");
        assert_eq!(currency("$99"), "QAR 99.00");
        assert_eq!(currency("250 ر.ق"), "QAR 250.00");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(currency("2.675"), "QAR 2.68");
        assert_eq!(currency("2.665"), "QAR 2.66");
        assert_eq!(currency_short("1234.5"), "QAR 1,234");
        assert_eq!(currency_short("1235.5"), "QAR 1,236");
    }

    #[test]
    fn handles_negative_and_scientific() {
        assert_eq!(currency("-1234.5"), "QAR -1,234.50");
        assert_eq!(currency("1e3"), "QAR 1,000.00");
        assert_eq!(currency(1234.5_f64), "QAR 1,234.50");
    }

    #[test]
    fn json_values_are_accepted() {
        assert_eq!(currency(&serde_json::json!(5000)), "QAR 5,000.00");
        assert_eq!(currency(&serde_json::json!("7.5")), "QAR 7.50");
    }

    #[test]
    fn symbol_after_position() {
        let format = CurrencyFormat::from(&CurrencySettings {
            symbol: "ر.ق".into(),
            code: "QAR".into(),
            position: SymbolPosition::After,
        });
        assert_eq!(format.format(5000), "5,000.00 ر.ق");
        assert_eq!(format.format(Amount::Missing), "0.00 ر.ق");
        assert_eq!(format.symbol(), "ر.ق");
        assert_eq!(format.code(), "QAR");
    }

    #[test]
    fn try_format_exposes_failures() {
        let format = CurrencyFormat::default();
        assert_eq!(format.try_format("", 2), Ok(None));
        assert_eq!(
            format.try_format("abc", 2),
            Err(AmountError::NotANumber("abc".into()))
        );
        assert_eq!(format.try_format(10, 2), Ok(Some("QAR 10.00".into())));
    }

    #[test]
    fn aliases_match_currency() {
        assert_eq!(currency_format(42), currency(42));
        assert_eq!(qar_format(42), "QAR 42.00");
    }

    #[test]
    fn grouping_boundaries() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn huge_amounts_keep_their_decimals() {
        let expected = format!("QAR 1{}.00", ",000".repeat(9));
        assert_eq!(currency("1e27"), expected);
        assert_eq!(currency_short("1e27"), format!("QAR 1{}", ",000".repeat(9)));
    }
}
