use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

/// An account as returned by the Dominion API.
///
/// The backend includes aggregate fields (points, streak, followers) that it
/// maintains itself; the client treats them as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub university: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub fitness_level: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub streak_count: i64,
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Registration form data submitted to `POST /api/auth/register`.
///
/// Numeric fields left blank on the form are submitted as absent, never as
/// zero - see [`parse_optional_field`].
#[derive(Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegisterProfile {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

// Manual Debug so the password never ends up in logs.
impl fmt::Debug for RegisterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterProfile")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("age", &self.age)
            .field("height", &self.height)
            .field("weight", &self.weight)
            .field("university", &self.university)
            .field("city", &self.city)
            .finish()
    }
}

/// Parse an optional numeric form field.
///
/// Blank input means the field was left empty and maps to `None`; it is never
/// coerced to a zero value. Anything else must parse cleanly.
pub fn parse_optional_field<T: FromStr>(input: &str) -> Result<Option<T>, T::Err> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

/// Parse an optional text form field: blank maps to `None`.
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
