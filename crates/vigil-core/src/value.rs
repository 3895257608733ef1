//! Field values captured from entities.
//!
//! `FieldValue` compares by logical value: `Integer(10)` equals
//! `Decimal(10.00)`, a reference equals an integer with the same id, and a
//! decimal written as `"10.0"` equals one written as `"10.00"`. Only the text
//! form handed to the audit log is formatted, via [`FieldValue::to_audit_text`].

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::FieldKind;
use crate::errors::CoreError;

/// Fixed-point decimal with two fractional digits, stored as hundredths.
///
/// Money columns (price, discount) never carry more than two decimal places.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal(i64);

impl Decimal {
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Build from a whole part and a two-digit fractional part: `(12, 50)` is `12.50`.
    ///
    /// Meant for small literals. The arithmetic is unchecked, and a negative
    /// value below one (`-0.50`) cannot be written this way; use
    /// [`Decimal::checked_new`] or [`Decimal::from_hundredths`] for computed
    /// input.
    #[must_use]
    pub const fn new(whole: i64, fraction: i64) -> Self {
        if whole < 0 {
            Self(whole * 100 - fraction)
        } else {
            Self(whole * 100 + fraction)
        }
    }

    /// Like [`Decimal::new`], but rejects a fraction outside `0..=99` and
    /// values that do not fit.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` naming the offending parts.
    pub fn checked_new(whole: i64, fraction: i64) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidValue {
            kind: "decimal",
            value: format!("{whole}.{fraction:02}"),
        };
        if !(0..=99).contains(&fraction) {
            return Err(invalid());
        }
        let scaled = whole.checked_mul(100).ok_or_else(invalid)?;
        let hundredths = if whole < 0 {
            scaled.checked_sub(fraction)
        } else {
            scaled.checked_add(fraction)
        };
        hundredths.map(Self).ok_or_else(invalid)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Parse `"10"`, `"10.5"`, `"10.50"`, `"-3.25"`, `"+7"`.
    ///
    /// Extra fractional digits are accepted only when they are zeros, so
    /// `"10.500"` parses but `"10.505"` does not.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` for malformed or out-of-range input.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidValue {
            kind: "decimal",
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let (kept, rest) = fraction.split_at(fraction.len().min(2));
        if rest.chars().any(|c| c != '0') {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match kept.len() {
            0 => 0,
            1 => kept.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => kept.parse().map_err(|_| invalid())?,
        };

        let total = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl TryFrom<String> for Decimal {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

/// A single captured field value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// Raw id of a related row. The related entity is never captured.
    Reference(i64),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Kind of the value, or `None` for null.
    #[must_use]
    pub const fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(FieldKind::Text),
            Self::Integer(_) => Some(FieldKind::Integer),
            Self::Decimal(_) => Some(FieldKind::Decimal),
            Self::Boolean(_) => Some(FieldKind::Boolean),
            Self::Date(_) => Some(FieldKind::Date),
            Self::DateTime(_) => Some(FieldKind::DateTime),
            Self::Reference(_) => Some(FieldKind::Reference),
        }
    }

    /// Text stored in `audit_log.old_value` / `new_value`. Null stays `None`.
    #[must_use]
    pub fn to_audit_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Integer(n) | Self::Reference(n) => Some(n.to_string()),
            Self::Decimal(d) => Some(d.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }

    #[must_use]
    pub fn reference(id: Option<i64>) -> Self {
        id.map_or(Self::Null, Self::Reference)
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a) | Self::Reference(a), Self::Integer(b) | Self::Reference(b)) => {
                a == b
            }
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Integer(n), Self::Decimal(d)) | (Self::Decimal(d), Self::Integer(n)) => {
                n.checked_mul(100) == Some(d.hundredths())
            }
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_audit_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn checked_new_matches_new_for_small_values() {
        assert_eq!(Decimal::checked_new(12, 50).unwrap(), Decimal::new(12, 50));
        assert_eq!(Decimal::checked_new(-3, 25).unwrap(), Decimal::from_hundredths(-325));
    }

    #[test]
    fn checked_new_rejects_overflow_and_bad_fractions() {
        assert!(matches!(
            Decimal::checked_new(i64::MAX, 0),
            Err(CoreError::InvalidValue { kind: "decimal", .. })
        ));
        assert!(Decimal::checked_new(i64::MIN / 100, 99).is_err());
        assert!(Decimal::checked_new(1, 100).is_err());
        assert!(Decimal::checked_new(1, -5).is_err());
    }

    #[rstest]
    #[case("10", 1000)]
    #[case("10.5", 1050)]
    #[case("10.50", 1050)]
    #[case("10.500", 1050)]
    #[case("0.07", 7)]
    #[case(".25", 25)]
    #[case("-3.25", -325)]
    #[case("+7", 700)]
    #[case(" 12.50 ", 1250)]
    fn decimal_parses(#[case] input: &str, #[case] hundredths: i64) {
        assert_eq!(Decimal::parse(input).unwrap().hundredths(), hundredths);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("-")]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("10.505")]
    #[case("1e3")]
    #[case("99999999999999999999")]
    fn decimal_rejects(#[case] input: &str) {
        assert!(Decimal::parse(input).is_err(), "{input:?} should not parse");
    }

    #[test]
    fn decimal_display_pads_fraction() {
        assert_eq!(Decimal::new(10, 0).to_string(), "10.00");
        assert_eq!(Decimal::new(12, 50).to_string(), "12.50");
        assert_eq!(Decimal::from_hundredths(-5).to_string(), "-0.05");
        assert_eq!(Decimal::new(-3, 25).to_string(), "-3.25");
        assert_eq!(Decimal::zero().to_string(), "0.00");
    }

    #[test]
    fn decimal_serializes_as_string() {
        let json = serde_json::to_string(&Decimal::new(12, 50)).unwrap();
        assert_eq!(json, "\"12.50\"");
        let back: Decimal = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(back, Decimal::new(12, 50));
        assert!(serde_json::from_str::<Decimal>("\"twelve\"").is_err());
    }

    #[test]
    fn decimals_compare_logically_not_textually() {
        let a = FieldValue::Decimal(Decimal::parse("10.0").unwrap());
        let b = FieldValue::Decimal(Decimal::parse("10.00").unwrap());
        assert_eq!(a, b);
        assert_eq!(FieldValue::Integer(10), b);
        assert_eq!(b, FieldValue::Integer(10));
        assert_ne!(FieldValue::Integer(11), b);
    }

    #[test]
    fn null_equality() {
        assert_eq!(FieldValue::Null, FieldValue::Null);
        assert_ne!(FieldValue::Null, FieldValue::Text(String::new()));
        assert_ne!(FieldValue::Text(String::new()), FieldValue::Null);
        assert_ne!(FieldValue::Null, FieldValue::Boolean(false));
    }

    #[test]
    fn text_is_never_coerced() {
        assert_ne!(FieldValue::from("10"), FieldValue::Integer(10));
        assert_ne!(FieldValue::from("true"), FieldValue::Boolean(true));
    }

    #[test]
    fn reference_equals_integer_with_same_id() {
        assert_eq!(FieldValue::Reference(3), FieldValue::Integer(3));
        assert_ne!(FieldValue::Reference(3), FieldValue::Reference(4));
    }

    #[test]
    fn audit_text_forms() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(FieldValue::Null.to_audit_text(), None);
        assert_eq!(FieldValue::from("Shampoo").to_audit_text().as_deref(), Some("Shampoo"));
        assert_eq!(FieldValue::from(true).to_audit_text().as_deref(), Some("true"));
        assert_eq!(FieldValue::from(date).to_audit_text().as_deref(), Some("2021-01-01"));
        assert_eq!(FieldValue::Reference(7).to_audit_text().as_deref(), Some("7"));
        assert_eq!(
            FieldValue::from(Decimal::new(10, 0)).to_audit_text().as_deref(),
            Some("10.00")
        );
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        let none: Option<String> = None;
        assert!(FieldValue::from(none).is_null());
        assert_eq!(
            FieldValue::from(Some("x".to_string())),
            FieldValue::Text("x".into())
        );
        assert!(FieldValue::reference(None).is_null());
        assert_eq!(FieldValue::reference(Some(2)).kind(), Some(FieldKind::Reference));
    }
}
