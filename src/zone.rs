//! Timezone normalization: IANA lookup and civil/UTC conversions.

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;

use crate::error::ScheduleError;
use crate::model::TimeOfDay;

/// Timezone applied when a communication carries none.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Resolve an optional IANA timezone name, defaulting to [`DEFAULT_TIMEZONE`].
pub fn resolve(name: Option<&str>) -> Result<TimeZone, ScheduleError> {
    let name = name.unwrap_or(DEFAULT_TIMEZONE);
    TimeZone::get(name).map_err(|e| ScheduleError::timezone(name, e.to_string()))
}

/// The UTC wall clock of an instant.
pub fn civil_utc(ts: Timestamp) -> DateTime {
    ts.to_zoned(TimeZone::UTC).datetime()
}

/// Attach a wall clock to UTC, yielding the instant with that UTC reading.
pub fn as_utc_instant(dt: DateTime) -> Result<Timestamp, ScheduleError> {
    dt.to_zoned(TimeZone::UTC)
        .map(|z| z.timestamp())
        .map_err(|e| ScheduleError::eval(format!("cannot convert to instant: {e}")))
}

/// Resolve a wall clock in the given timezone to a UTC instant.
///
/// DST gaps and folds use jiff's compatible disambiguation, so a scheduled
/// 02:00 during spring-forward lands on the post-transition side.
pub fn to_utc(dt: DateTime, tz: &TimeZone) -> Result<Timestamp, ScheduleError> {
    dt.to_zoned(tz.clone())
        .map(|z| z.timestamp())
        .map_err(|e| ScheduleError::eval(format!("cannot resolve wall clock in zone: {e}")))
}

/// The wall-clock time of day an instant reads as in the given timezone.
pub fn local_time_of_day(ts: Timestamp, tz: &TimeZone) -> TimeOfDay {
    let local = ts.to_zoned(tz.clone()).datetime();
    // Hour and minute of a valid datetime are always in range.
    TimeOfDay {
        hour: local.hour() as u8,
        minute: local.minute() as u8,
    }
}
