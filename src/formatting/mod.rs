//! Formatting utilities for ticket display
//!
//! Server timestamps arrive as ISO 8601 strings, sometimes without an offset.
//! Offset-less values are treated as UTC.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

/// Placeholder shown for missing or unparseable values
pub const MISSING: &str = "-";

/// Parse a server timestamp, accepting values with or without an offset
pub fn parse_server_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts);
    }

    raw.parse::<DateTime>()
        .ok()
        .and_then(|dt| dt.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
}

/// Format a timestamp as `dd.MM.yyyy HH:mm:ss` in the given zone
///
/// ```
/// use jiff::tz::TimeZone;
/// use ticketdesk::formatting::format_timestamp;
///
/// assert_eq!(
///     format_timestamp(Some("2025-01-05T10:20:30Z"), &TimeZone::UTC),
///     "05.01.2025 10:20:30"
/// );
/// assert_eq!(format_timestamp(None, &TimeZone::UTC), "-");
/// ```
pub fn format_timestamp(raw: Option<&str>, tz: &TimeZone) -> String {
    format_with(raw, tz, "%d.%m.%Y %H:%M:%S")
}

/// Compact form used in comment threads: `dd.MM.yyyy-HH.mm`
pub fn format_timestamp_compact(raw: Option<&str>, tz: &TimeZone) -> String {
    format_with(raw, tz, "%d.%m.%Y-%H.%M")
}

fn format_with(raw: Option<&str>, tz: &TimeZone, pattern: &str) -> String {
    raw.and_then(parse_server_timestamp)
        .map(|ts| ts.to_zoned(tz.clone()).strftime(pattern).to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Truncate a string to a maximum length, handling multi-byte characters properly.
/// Appends "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Fit a value into a fixed-width table cell (truncated, then right-padded)
pub fn fit_cell(s: &str, width: usize) -> String {
    let truncated = truncate_string(s, width);
    let len = truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(len)))
}

/// Join tags for display in a form field
pub fn join_tags(tags: Option<&[String]>) -> String {
    tags.map(|t| t.join(", ")).unwrap_or_default()
}
