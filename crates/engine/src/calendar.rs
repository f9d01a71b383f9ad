//! ISO week derivation and Europe/Moscow wall-clock helpers used for
//! visualization. `day_of_week` itself is supplied by the caller on every
//! `Timeslot` (0 = Monday .. 6 = Sunday) and is not derived here.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Europe::Moscow;

/// ISO year-week string (`"YYYY-Www"`) for a civil date, interpreted at
/// Europe/Moscow midnight. Used to group weekend slots by week.
pub fn week_key(date: &str) -> Option<String> {
    let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let midnight = naive.and_hms_opt(0, 0, 0)?;
    let moscow_dt = Moscow.from_local_datetime(&midnight).single()?;
    let iso = moscow_dt.date_naive().iso_week();
    Some(format!("{}-W{:02}", iso.year(), iso.week()))
}

/// Formats a civil date + "HH:MM" as an Europe/Moscow ISO-8601 datetime
/// string, for the gantt projection.
pub fn to_moscow_iso(date: &str, start_time: &str) -> Option<String> {
    let naive_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let naive_time = NaiveTime::parse_from_str(start_time, "%H:%M").ok()?;
    let naive_dt = naive_date.and_time(naive_time);
    let moscow_dt = Moscow.from_local_datetime(&naive_dt).single()?;
    Some(moscow_dt.to_rfc3339())
}

/// Adds a fixed number of hours to an RFC 3339 timestamp, preserving its
/// offset. Used to derive a show's end time from its start.
pub fn plus_hours(rfc3339: &str, hours: i64) -> Option<String> {
    let dt = chrono::DateTime::parse_from_rfc3339(rfc3339).ok()?;
    Some((dt + Duration::hours(hours)).to_rfc3339())
}
