//! # Slot Calculator
//!
//! Turns the weekly availability table into concrete session start times for
//! one calendar date.
//!
//! All timestamps are UTC. A window's wall-clock times are read as UTC times
//! on the requested date, and the date itself is taken at UTC midnight, so
//! the server's local timezone never influences the result.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::{
    errors::{BookingError, BookingResult},
    models::availability::AvailabilityWindow,
};

/// Length of every bookable session.
pub const SESSION_MINUTES: i64 = 60;

pub fn session_length() -> Duration {
    Duration::minutes(SESSION_MINUTES)
}

/// Weekday of `date` with 0 = Sunday through 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Half-open `[start, end)` range covering `date` in UTC.
///
/// Fails for the last date chrono can represent, whose end has no successor.
pub fn day_bounds(date: NaiveDate) -> BookingResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| BookingError::Validation(format!("Date {date} is out of range")))?;
    Ok((start, end))
}

/// Computes the open session start times for `date`.
///
/// Windows for other weekdays are ignored. Each matching window is walked
/// from its start in [`SESSION_MINUTES`] steps; a slot is kept only when the
/// whole session fits before the window ends, and only when its start is not
/// in `booked`.
///
/// Windows are processed independently and in the order given. Overlapping
/// windows produce overlapping slots, and the output is not re-sorted.
pub fn compute_available_slots(
    date: NaiveDate,
    windows: &[AvailabilityWindow],
    booked: &[DateTime<Utc>],
) -> Vec<DateTime<Utc>> {
    let weekday = day_of_week(date);
    let booked: HashSet<DateTime<Utc>> = booked.iter().copied().collect();
    let step = session_length();

    let mut slots = Vec::new();
    for window in windows.iter().filter(|w| w.day_of_week == weekday) {
        let end = date.and_time(window.end_time).and_utc();
        let mut cursor = date.and_time(window.start_time).and_utc();

        while let Some(next) = cursor.checked_add_signed(step) {
            if next > end {
                break;
            }
            if !booked.contains(&cursor) {
                slots.push(cursor);
            }
            cursor = next;
        }
    }

    slots
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// `%Y` alone would also take signed or longer years such as `+262142-12-31`,
/// so the shape is checked before chrono sees it.
pub fn parse_slot_date(raw: &str) -> BookingResult<NaiveDate> {
    let invalid =
        || BookingError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD"));
    let trimmed = raw.trim();

    let well_formed = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parses a session start time.
///
/// The timestamp must be RFC 3339 and carry an explicit offset; it is
/// normalized to UTC. Timestamps without an offset are rejected rather than
/// guessed at.
pub fn parse_session_time(raw: &str) -> BookingResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            BookingError::Validation(format!(
                "Invalid timeSlot '{raw}', expected an RFC 3339 timestamp with a UTC offset"
            ))
        })
}

/// Renders a slot the way clients receive it, e.g. `2024-01-01T09:00:00.000Z`.
pub fn format_slot(slot: DateTime<Utc>) -> String {
    slot.to_rfc3339_opts(SecondsFormat::Millis, true)
}
