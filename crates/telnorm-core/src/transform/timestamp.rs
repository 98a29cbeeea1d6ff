//! Flexible timestamp parser for device date/time strings.
//!
//! Supports:
//! - RFC 3339 / ISO 8601 with offset: `2024-11-26T14:30:00Z`, `2024-11-26T14:30:00.250+02:00`
//! - Compact offsets: `2024-11-26T14:30:00+0200`
//! - Naive date-time (UTC): `2024-11-26T14:30:00`, `2024-11-26 14:30:00.5`, `2024-11-26T14:30`
//! - Slash dates (UTC): `2024/11/26 14:30:00`, `2024/11/26`
//! - Date only (UTC midnight): `2024-11-26`
//!
//! The zero date `0000-01-01…` and `null` mark uninitialized values on some
//! devices and parse to `None` without complaint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const ZERO_DATE: &str = "0000-01-01";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses `input` into Unix epoch seconds with microsecond precision.
pub fn parse_timestamp(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() || input.starts_with(ZERO_DATE) || input.eq_ignore_ascii_case("null") {
        return None;
    }

    let dt = try_parse_rfc3339(input)
        .or_else(|| try_parse_with_offset(input))
        .or_else(|| try_parse_zulu(input))
        .or_else(|| try_parse_naive(input))
        .or_else(|| try_parse_date(input))?;

    Some(dt.timestamp_micros() as f64 / 1_000_000.0)
}

fn try_parse_rfc3339(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn try_parse_with_offset(input: &str) -> Option<DateTime<Utc>> {
    OFFSET_FORMATS.iter().find_map(|fmt| {
        DateTime::parse_from_str(input, fmt)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// `Z`-suffixed forms that RFC 3339 rejects, e.g. `2024-11-26 14:30Z`.
fn try_parse_zulu(input: &str) -> Option<DateTime<Utc>> {
    let naive = input.strip_suffix('Z').or_else(|| input.strip_suffix('z'))?;
    try_parse_naive(naive)
}

fn try_parse_naive(input: &str) -> Option<DateTime<Utc>> {
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(input, fmt)
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    })
}

fn try_parse_date(input: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS.iter().find_map(|fmt| {
        let date = NaiveDate::parse_from_str(input, fmt).ok()?;
        let naive = date.and_hms_opt(0, 0, 0)?;
        Some(Utc.from_utc_datetime(&naive))
    })
}
