use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use vigil_core::value::Decimal;

/// Parse an enum value using serde deserialization. Hyphens become underscores.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_decimal(raw: &str, field: &str) -> anyhow::Result<Decimal> {
    Decimal::parse(raw).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// RFC 3339, or a bare date meaning midnight UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let date = parse_date(raw, field)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
