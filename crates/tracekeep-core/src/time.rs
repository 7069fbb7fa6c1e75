//! Timestamp helpers shared by the aggregator and reconciler

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO-8601 timestamp, with or without fractional seconds
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The `YYYY-MM-DD` prefix of a timestamp, if it is a real calendar date
pub fn date_prefix(ts: &str) -> Option<&str> {
    let prefix = ts.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some(prefix)
}
