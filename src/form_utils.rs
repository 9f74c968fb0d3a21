/// Serde helpers for HTML form and query deserialization.
///
/// `<select>` elements with an "All" `<option value="">` send an empty string,
/// which cannot be parsed as a number. These helpers treat empty strings as
/// `None`.
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

fn deserialize_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional(deserializer)
}

pub fn deserialize_optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional(deserializer)
}

/// Parse a non-negative amount field. An empty field counts as zero.
pub fn parse_amount(field: &str, raw: Option<&str>) -> Result<f64, String> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{} must be a number", field))?;
    if !value.is_finite() {
        return Err(format!("{} must be a number", field));
    }
    if value < 0.0 {
        return Err(format!("{} must not be negative", field));
    }
    Ok(value)
}
