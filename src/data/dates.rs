use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a day/month/year date like "30/09/2007".
pub fn parse_dmy(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}

/// Parse a measurement timestamp like "2017-01-01 14:00", keeping only
/// the calendar date.
pub fn parse_measured_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Seconds since the Unix epoch at midnight of `date`, used as the
/// plot-axis value for date domains.
pub fn date_to_timestamp(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp() as f64)
        .unwrap_or(0.0)
}

/// Format a plot-axis timestamp back into "YYYY-MM-DD".
pub fn format_timestamp(ts: f64) -> String {
    match DateTime::<Utc>::from_timestamp(ts as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => format!("{ts:.0}"),
    }
}

/// Short "Mon YYYY" form for axis ticks.
pub fn format_timestamp_month(ts: f64) -> String {
    match DateTime::<Utc>::from_timestamp(ts as i64, 0) {
        Some(dt) => dt.format("%b %Y").to_string(),
        None => format!("{ts:.0}"),
    }
}
