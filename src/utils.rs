/// Utility functions for time formatting and value rounding
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Format a timestamp for the snapshot and the query endpoint
///
/// Converts an OffsetDateTime to DD-MM-YYYY HH:MM:SS format.
/// Falls back to default string representation if formatting fails.
pub fn format_timestamp(dt: &OffsetDateTime) -> String {
    let format = format_description!("[day]-[month]-[year] [hour]:[minute]:[second]");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Format the time of day shown on the clock page (HH:MM:SS)
pub fn format_clock(dt: &OffsetDateTime) -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Format a unix timestamp (seconds) in the given local offset
///
/// Returns None when the value is outside the representable range.
pub fn format_unix(seconds: i64, offset: UtcOffset) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .map(|dt| format_timestamp(&dt.to_offset(offset)))
}

/// Round a reading to a fixed number of decimal places
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}

/// Round a coordinate to a fixed number of decimal places
pub fn round_to_f64(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
