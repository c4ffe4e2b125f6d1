//! Canonicalizes caller-supplied due/reminder values into RFC 3339 UTC
//! instant strings.
//!
//! Due dates carry a default-time-of-day policy: a value at exactly
//! midnight is moved to 08:00 local, preserving the date. Reminders are
//! converted as supplied. Parsing always happens first, so an
//! unparseable value fails with `InvalidDateFormat` instead of being
//! silently rewritten.

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};

use crate::error::{Error, Result};

/// Hour of day substituted for a due date supplied at exactly midnight.
const DEFAULT_DUE_HOUR: u32 = 8;

/// Accepted datetime shapes for naive (offset-free) input.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

enum Parsed {
    Zoned(DateTime<Utc>),
    Naive(NaiveDateTime),
}

fn parse_value(input: &str) -> Result<Parsed> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Parsed::Zoned(dt.with_timezone(&Utc)));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Parsed::Naive(ndt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Parsed::Naive(date.and_time(NaiveTime::MIN)));
    }
    Err(Error::InvalidDateFormat(input.to_string()))
}

fn at_default_hour(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_opt(DEFAULT_DUE_HOUR, 0, 0)
        .ok_or_else(|| Error::InvalidDateFormat(date.to_string()))
}

/// Interpret a naive local datetime in the system timezone. Ambiguous or
/// nonexistent wall-clock times (DST transitions) are rejected rather
/// than guessed.
fn local_to_utc(ndt: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&ndt)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidDateFormat(ndt.to_string()))
}

fn render(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Normalize a due-date value. Midnight (00:00:00) time-of-day becomes
/// 08:00:00 local on the same date; any other time is preserved exactly.
pub fn normalize_due(input: &str) -> Result<String> {
    let instant = match parse_value(input)? {
        Parsed::Zoned(dt) => {
            let local = dt.with_timezone(&Local);
            if local.time() == NaiveTime::MIN {
                local_to_utc(at_default_hour(local.date_naive())?)?
            } else {
                dt
            }
        }
        Parsed::Naive(ndt) => {
            if ndt.time() == NaiveTime::MIN {
                local_to_utc(at_default_hour(ndt.date())?)?
            } else {
                local_to_utc(ndt)?
            }
        }
    };
    Ok(render(instant))
}

/// Normalize a reminder value: straight instant conversion, no midnight
/// substitution.
pub fn normalize_reminder(input: &str) -> Result<String> {
    let instant = match parse_value(input)? {
        Parsed::Zoned(dt) => dt,
        Parsed::Naive(ndt) => local_to_utc(ndt)?,
    };
    Ok(render(instant))
}
