//! Structural validation for mute time intervals
//!
//! Mirrors the time-interval grammar used by alert routing: clock ranges
//! in `HH:MM`, and inclusive `start:end` ranges for weekdays, days of
//! month, months and years.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definitions::{MuteTimeInterval, TimeInterval, TimeRange};
use crate::{Error, Result};

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(([01][0-9]|2[0-3]):[0-5][0-9]|24:00)$").expect("valid regex"));

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(UTC|Local|[A-Za-z_]+(/[A-Za-z0-9_+\-]+)+)$").expect("valid regex")
});

const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Validate a mute time interval submitted for create or update
pub fn validate_mute_time_interval(mti: &MuteTimeInterval) -> Result<()> {
    if mti.name.is_empty() {
        return Err(Error::InvalidInput(
            "mute time interval is missing a name".to_string(),
        ));
    }
    if mti.name.trim() != mti.name {
        return Err(Error::InvalidInput(format!(
            "mute time interval name '{}' has leading or trailing whitespace",
            mti.name
        )));
    }

    for (idx, interval) in mti.time_intervals.iter().enumerate() {
        validate_time_interval(interval).map_err(|msg| {
            Error::InvalidInput(format!(
                "mute time interval '{}': time interval {}: {}",
                mti.name, idx, msg
            ))
        })?;
    }
    Ok(())
}

fn validate_time_interval(interval: &TimeInterval) -> std::result::Result<(), String> {
    for range in &interval.times {
        validate_time_range(range)?;
    }
    for raw in &interval.weekdays {
        parse_ordered_range(raw, parse_weekday)?;
    }
    for raw in &interval.days_of_month {
        let (start, end) = parse_range(raw, parse_day_of_month)?;
        // Mixed signs ("1:-1") span to the end of any month
        if start.signum() == end.signum() && start > end {
            return Err(format!("day of month range '{}' ends before it starts", raw));
        }
    }
    for raw in &interval.months {
        parse_ordered_range(raw, parse_month)?;
    }
    for raw in &interval.years {
        parse_ordered_range(raw, parse_year)?;
    }
    if let Some(location) = &interval.location
        && !LOCATION_RE.is_match(location)
    {
        return Err(format!("invalid location '{}'", location));
    }
    Ok(())
}

fn validate_time_range(range: &TimeRange) -> std::result::Result<(), String> {
    let start = parse_clock(&range.start_time)?;
    let end = parse_clock(&range.end_time)?;
    if start >= end {
        return Err(format!(
            "start time {} must be before end time {}",
            range.start_time, range.end_time
        ));
    }
    Ok(())
}

/// Minutes since midnight for `HH:MM`, allowing `24:00`
fn parse_clock(raw: &str) -> std::result::Result<u32, String> {
    if !CLOCK_RE.is_match(raw) {
        return Err(format!("invalid time '{}', expected HH:MM", raw));
    }
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid time '{}'", raw))?;
    let hours: u32 = hours.parse().map_err(|_| format!("invalid hour in '{}'", raw))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format!("invalid minute in '{}'", raw))?;
    Ok(hours * 60 + minutes)
}

/// Parse `value` or `start:end` without checking order
fn parse_range<T, F>(raw: &str, parse: F) -> std::result::Result<(T, T), String>
where
    T: Copy,
    F: Fn(&str) -> std::result::Result<T, String>,
{
    match raw.split_once(':') {
        Some((start, end)) => Ok((parse(start)?, parse(end)?)),
        None => {
            let value = parse(raw)?;
            Ok((value, value))
        }
    }
}

fn parse_ordered_range<F>(raw: &str, parse: F) -> std::result::Result<(u32, u32), String>
where
    F: Fn(&str) -> std::result::Result<u32, String>,
{
    let (start, end) = parse_range(raw, parse)?;
    if start > end {
        return Err(format!("range '{}' ends before it starts", raw));
    }
    Ok((start, end))
}

fn parse_weekday(raw: &str) -> std::result::Result<u32, String> {
    let lower = raw.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .position(|day| *day == lower)
        .map(|idx| idx as u32)
        .ok_or_else(|| format!("invalid weekday '{}'", raw))
}

fn parse_day_of_month(raw: &str) -> std::result::Result<i32, String> {
    let day: i32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid day of month '{}'", raw))?;
    if day == 0 || !(-31..=31).contains(&day) {
        return Err(format!(
            "day of month {} out of range, expected 1..31 or -31..-1",
            day
        ));
    }
    Ok(day)
}

fn parse_month(raw: &str) -> std::result::Result<u32, String> {
    let lower = raw.trim().to_lowercase();
    if let Some(idx) = MONTHS.iter().position(|month| *month == lower) {
        return Ok(idx as u32 + 1);
    }
    match lower.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(format!("invalid month '{}'", raw)),
    }
}

fn parse_year(raw: &str) -> std::result::Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(year) if year > 0 => Ok(year),
        _ => Err(format!("invalid year '{}'", raw)),
    }
}
