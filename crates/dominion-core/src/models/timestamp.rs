//! Deserialization for the backend's timestamp wire format.
//!
//! The backend writes naive UTC datetimes with no offset
//! ("2026-07-01T09:30:00.123456"); offset-bearing RFC 3339 also appears in
//! stored records. Both forms land in `DateTime<Utc>`. Serialization is
//! untouched - outgoing timestamps stay RFC 3339, which the backend accepts.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

fn parse(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("invalid timestamp: {:?}", s))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse(&value).map_err(serde::de::Error::custom)
}

/// For `Option<DateTime<Utc>>` fields; combine with `#[serde(default)]` so a
/// missing key also reads as `None`.
pub fn option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|s| parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}
