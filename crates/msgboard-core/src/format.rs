use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Shown when a timestamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Format an ISO-8601 timestamp for display, e.g. `Jan 5, 2024, 02:07 PM`.
///
/// Timestamps with an offset are shown in local time. Naive timestamps (what
/// the board server writes) are taken to already be local. Anything else
/// yields [`INVALID_DATE`].
pub fn format_timestamp(iso: &str) -> String {
    match parse_timestamp(iso.trim()) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_timestamp(iso: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            // Date-only values start at midnight
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    // DST gaps have no local representation
    Local.from_local_datetime(&naive).earliest()
}
