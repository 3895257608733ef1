//! Row and column conversion helpers.
//!
//! Field values are stored in their audit text form where SQLite has no native
//! type: decimals as `"10.00"`, dates as `"2021-01-01"`, timestamps as RFC 3339.
//! Booleans are stored as `0`/`1`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use vigil_core::enums::FieldKind;
use vigil_core::value::{Decimal, FieldValue};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000001Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Format a timestamp the way audit rows store it. Fixed width, so text order
/// is time order.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Empty strings are kept; only SQL NULL is `None`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_nullable_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?)
}

/// Read a nullable INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_nullable_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?)
}

/// Convert a field value into a bindable SQL value.
#[must_use]
pub fn to_sql_value(value: &FieldValue) -> libsql::Value {
    match value {
        FieldValue::Null => libsql::Value::Null,
        FieldValue::Integer(n) | FieldValue::Reference(n) => libsql::Value::Integer(*n),
        FieldValue::Boolean(b) => libsql::Value::Integer(i64::from(*b)),
        FieldValue::Text(s) => libsql::Value::Text(s.clone()),
        FieldValue::Decimal(_) | FieldValue::Date(_) | FieldValue::DateTime(_) => {
            value.to_audit_text().map_or(libsql::Value::Null, libsql::Value::Text)
        }
    }
}

/// Decode a stored column into a field value of the declared kind.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored value does not fit `kind`.
pub fn from_sql_value(kind: FieldKind, value: libsql::Value) -> Result<FieldValue, DatabaseError> {
    use libsql::Value;

    let mismatch = |value: &Value| {
        DatabaseError::InvalidState(format!("column of kind {kind} holds {value:?}"))
    };

    let decoded = match (kind, value) {
        (_, Value::Null) => FieldValue::Null,
        (FieldKind::Text, Value::Text(s)) => FieldValue::Text(s),
        (FieldKind::Integer, Value::Integer(n)) => FieldValue::Integer(n),
        (FieldKind::Reference, Value::Integer(n)) => FieldValue::Reference(n),
        (FieldKind::Boolean, Value::Integer(n)) => FieldValue::Boolean(n != 0),
        (FieldKind::Decimal, Value::Text(s)) => FieldValue::Decimal(Decimal::parse(&s)?),
        (FieldKind::Decimal, Value::Integer(n)) => n
            .checked_mul(100)
            .map(|h| FieldValue::Decimal(Decimal::from_hundredths(h)))
            .ok_or_else(|| mismatch(&Value::Integer(n)))?,
        (FieldKind::Date, Value::Text(s)) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|e| DatabaseError::InvalidState(format!("bad date '{s}': {e}")))?,
        (FieldKind::DateTime, Value::Text(s)) => FieldValue::DateTime(parse_datetime(&s)?),
        (_, other) => return Err(mismatch(&other)),
    };
    Ok(decoded)
}
