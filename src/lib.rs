//! notisched computes the UTC dispatch instants for patient-communication
//! notifications.
//!
//! A [`Recurrence`] bundles four things: an [`Interval`] offsetting activity
//! relative to an anchor instant (a visit, a status change), an optional
//! [`RepeatFrequency`] carrying schedule slots, an optional [`StopCriterion`],
//! and an IANA timezone name. Evaluation takes the anchor and a clock reading
//! and returns the future fire instants, formatted as ISO-8601 UTC strings by
//! [`build_notifications_at`].
//!
//! ```
//! use notisched::{build_notifications_at, DailySlot, Interval, Recurrence,
//!     RepeatFrequency, StopCriterion, TimeOfDay};
//!
//! let recurrence = Recurrence::new(Interval::SameDay)
//!     .with_repeat(RepeatFrequency::Daily(vec![DailySlot {
//!         times: vec![TimeOfDay { hour: 9, minute: 0 }],
//!     }]))
//!     .with_stop(StopCriterion::Occurrences(3))
//!     .with_timezone("America/Chicago");
//!
//! let anchor = "2024-03-04T15:00:00Z".parse().unwrap();
//! let now = "2024-01-01T00:00:00Z".parse().unwrap();
//! assert_eq!(
//!     build_notifications_at(&recurrence, anchor, now),
//!     vec![
//!         "2024-03-04T09:00:00.000Z",
//!         "2024-03-05T09:00:00.000Z",
//!         "2024-03-06T09:00:00.000Z",
//!     ],
//! );
//! ```
//!
//! The clock is always explicit in the `_at` variants; [`build_notifications`]
//! and [`Recurrence::notification_times`] read the system clock. Evaluation
//! failures (an unknown timezone, arithmetic overflow) surface from
//! [`Recurrence::try_notification_times`]; the string-producing entry points
//! are fail-closed and return an empty batch instead.
//!
//! With the default `serde` feature, [`config::FrequencyConfig`] deserializes
//! the persisted JSON shape of a communication and lowers it into a
//! [`Recurrence`].

#[cfg(feature = "serde")]
pub mod config;
pub mod display;
pub mod error;
pub mod eval;
pub mod expand;
pub mod model;
pub mod resolve;
pub mod stop;
pub mod zone;

pub use error::ScheduleError;
pub use eval::IMMEDIATE_DELAY_MINUTES;
pub use model::{
    parse_time_of_day, parse_weekday, DailySlot, Interval, MonthlySlot, OffsetUnit, Recurrence,
    RepeatFrequency, StopCriterion, TimeOfDay, Weekday, WeeklySlot,
};
pub use stop::MAX_CYCLES;
pub use zone::DEFAULT_TIMEZONE;

use jiff::Timestamp;

impl Recurrence {
    /// The future UTC fire instants relative to an explicit clock reading.
    pub fn try_notification_times(
        &self,
        anchor: Timestamp,
        now: Timestamp,
    ) -> Result<Vec<Timestamp>, ScheduleError> {
        eval::notification_times(
            &self.interval,
            anchor,
            self.repeat.as_ref(),
            self.stop.as_ref(),
            self.timezone.as_deref(),
            now,
        )
    }

    /// Like [`try_notification_times`](Self::try_notification_times), but
    /// fail-closed: evaluation errors yield an empty batch.
    pub fn notification_times_at(&self, anchor: Timestamp, now: Timestamp) -> Vec<Timestamp> {
        self.try_notification_times(anchor, now).unwrap_or_default()
    }

    /// Fire instants relative to the system clock.
    pub fn notification_times(&self, anchor: Timestamp) -> Vec<Timestamp> {
        self.notification_times_at(anchor, Timestamp::now())
    }
}

/// Fire instants as ISO-8601 UTC strings with millisecond precision,
/// relative to an explicit clock reading. Fail-closed: any evaluation error
/// yields an empty batch.
pub fn build_notifications_at(
    recurrence: &Recurrence,
    anchor: Timestamp,
    now: Timestamp,
) -> Vec<String> {
    match recurrence.try_notification_times(anchor, now) {
        Ok(times) => times.iter().filter_map(|ts| iso_utc(*ts)).collect(),
        Err(e) => {
            log::warn!("notification build failed: {e}");
            Vec::new()
        }
    }
}

/// Fire instants as ISO-8601 UTC strings, relative to the system clock.
pub fn build_notifications(recurrence: &Recurrence, anchor: Timestamp) -> Vec<String> {
    build_notifications_at(recurrence, anchor, Timestamp::now())
}

/// `2024-06-07T15:00:00.000Z`: always exactly three fractional digits.
fn iso_utc(ts: Timestamp) -> Option<String> {
    let utc = ts.to_zoned(jiff::tz::TimeZone::UTC);
    jiff::fmt::strtime::format("%Y-%m-%dT%H:%M:%S%.3fZ", &utc).ok()
}
