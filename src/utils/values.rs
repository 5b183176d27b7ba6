use chrono::{NaiveDate, NaiveDateTime};

/// Formats accepted for timestamp cells, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a timestamp cell, returning `None` for anything unrecognised.
///
/// Date-only values are read as midnight. RFC 3339 values with an offset are
/// converted to UTC so equal instants compare equal; values without an
/// offset are taken as written.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse an integer cell. Whole-valued decimals such as `"3.0"` are accepted.
pub fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }

    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

/// Trim a text cell, treating blank values as missing.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
