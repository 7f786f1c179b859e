//! Date parsing for `-a`: `[[[[CC]YY]MM]DD]hhmm[.SS]` in local time.
//!
//! Omitted leading fields are filled from the current date. When the result
//! lies in the past, the smallest omitted unit is advanced: tomorrow when
//! only the time was given, next month when the day was given, next year
//! when the month was given.

use thiserror::Error;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum DateError {
    #[error("date must be [[[[CC]YY]MM]DD]hhmm[.SS]")]
    Format,
    #[error("date field out of range")]
    OutOfRange,
}

/// Fields present in the input, most significant first.
#[derive(Debug, Clone, Copy)]
struct Fields {
    year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
    hour: u8,
    minute: u8,
    second: u8,
}

/// Converts `text` to seconds since the Unix epoch, relative to `now`.
pub(crate) fn parse_date_time(text: &str, now: OffsetDateTime) -> Result<i64, DateError> {
    let fields = split_fields(text)?;
    let time = Time::from_hms(fields.hour, fields.minute, fields.second)
        .map_err(|_| DateError::OutOfRange)?;

    let year = fields.year.unwrap_or_else(|| now.year());
    let month = match fields.month {
        Some(value) => Month::try_from(value).map_err(|_| DateError::OutOfRange)?,
        None => now.month(),
    };
    let day = fields.day.unwrap_or_else(|| now.day());

    let mut date = Date::from_calendar_date(year, month, day).map_err(|_| DateError::OutOfRange)?;
    let at = |date: Date| PrimitiveDateTime::new(date, time).assume_offset(now.offset());

    if at(date) < now && fields.year.is_none() {
        let rolled = if fields.month.is_some() {
            Date::from_calendar_date(year + 1, month, day).ok()
        } else if fields.day.is_some() {
            let (next_year, next_month) = if month == Month::December {
                (year + 1, Month::January)
            } else {
                (year, month.next())
            };
            Date::from_calendar_date(next_year, next_month, day).ok()
        } else {
            date.next_day()
        };
        date = rolled.ok_or(DateError::OutOfRange)?;
    }

    Ok(at(date).unix_timestamp())
}

fn split_fields(text: &str) -> Result<Fields, DateError> {
    let (main, seconds) = match text.split_once('.') {
        Some((main, seconds)) => (main, Some(seconds)),
        None => (text, None),
    };

    let second = match seconds {
        Some(seconds) if seconds.len() == 2 => number(seconds)?,
        Some(_) => return Err(DateError::Format),
        None => 0,
    };

    if !matches!(main.len(), 4 | 6 | 8 | 10 | 12) || !main.bytes().all(|byte| byte.is_ascii_digit())
    {
        return Err(DateError::Format);
    }

    // Consume two-digit groups from the right: mm, hh, DD, MM, YY, CC.
    let mut groups = main
        .as_bytes()
        .rchunks(2)
        .map(|pair| pair.iter().fold(0u8, |acc, byte| acc * 10 + (byte - b'0')));
    let minute = groups.next().ok_or(DateError::Format)?;
    let hour = groups.next().ok_or(DateError::Format)?;
    let day = groups.next();
    let month = groups.next();
    let short_year = groups.next();
    let century = groups.next();

    let year = match (century, short_year) {
        (Some(century), Some(short)) => Some(i32::from(century) * 100 + i32::from(short)),
        (None, Some(short)) if short < 69 => Some(2000 + i32::from(short)),
        (None, Some(short)) => Some(1900 + i32::from(short)),
        _ => None,
    };

    Ok(Fields {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

fn number(text: &str) -> Result<u8, DateError> {
    if !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(DateError::Format);
    }
    text.parse().map_err(|_| DateError::Format)
}
