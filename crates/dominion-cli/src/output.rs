//! Text output helpers for aligned, terminal-friendly listings.

use chrono::{DateTime, Utc};

/// Pad or truncate a value to a fixed column width.
pub fn column(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        truncate(s, width)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional value, showing "-" if absent.
pub fn optional_display(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("-").to_string()
}

/// Format a timestamp as a short readable date.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}
