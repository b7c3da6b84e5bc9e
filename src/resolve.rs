//! Interval resolution: turns the raw configuration into an immutable plan
//! for the generation loop.
//!
//! Resolution is a pure function: inputs are borrowed, never mutated, and
//! the resolved state comes back as a [`ResolvedPlan`].

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use log::debug;

use crate::error::ScheduleError;
use crate::model::{DailySlot, Interval, OffsetUnit, RepeatFrequency, StopCriterion, TimeOfDay};
use crate::zone;

/// Everything the generation loop needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    /// Reference start of cycle 0, as a UTC wall clock.
    pub start: DateTime,
    /// The same start as an instant.
    pub start_instant: Timestamp,
    /// The anchor instant the interval was computed from.
    pub anchor: Timestamp,
    /// Cadence to expand, with any synthesized one-shot schedule applied.
    pub cadence: RepeatFrequency,
    /// Normalized stop criterion.
    pub stop: Option<StopCriterion>,
    /// True when the schedule was synthesized from the start's local wall
    /// clock (hour-granular interval with no configured frequency). The
    /// accumulator then resolves candidates through the schedule timezone
    /// rather than reading them as UTC.
    pub localized_one_shot: bool,
}

impl OffsetUnit {
    fn span(self, amount: i64) -> Span {
        match self {
            OffsetUnit::Days => Span::new().days(amount),
            OffsetUnit::Hours => Span::new().hours(amount),
            OffsetUnit::Minutes => Span::new().minutes(amount),
        }
    }
}

/// Resolve the start date, fill in an implicit one-shot schedule when none
/// was configured, and normalize the stop criterion.
pub fn resolve(
    interval: &Interval,
    anchor: Timestamp,
    repeat: Option<&RepeatFrequency>,
    stop: Option<&StopCriterion>,
    tz: &TimeZone,
) -> Result<ResolvedPlan, ScheduleError> {
    let anchor_civil = zone::civil_utc(anchor);

    let start = match interval {
        Interval::SameDay => anchor_civil,
        Interval::Before { amount, unit } => anchor_civil
            .checked_sub(unit.span(*amount))
            .map_err(|e| ScheduleError::eval(format!("interval offset overflows: {e}")))?,
        Interval::After { amount, unit } => anchor_civil
            .checked_add(unit.span(*amount))
            .map_err(|e| ScheduleError::eval(format!("interval offset overflows: {e}")))?,
    };
    let start_instant = zone::as_utc_instant(start)?;

    let (cadence, localized_one_shot) = match repeat {
        Some(rf) => (rf.clone(), false),
        // No schedule was configured. For a same-day interval there is
        // nothing to derive a time from, so the plan yields nothing. For
        // before/after, the offset itself defines a one-shot slot: fire at
        // the start's time of day.
        None => match interval {
            Interval::SameDay => (RepeatFrequency::OneTime(Vec::new()), false),
            Interval::Before { unit, .. } | Interval::After { unit, .. } => {
                let localized = matches!(unit, OffsetUnit::Hours);
                let time = if localized {
                    // "N hours before/after" names a local wall-clock time,
                    // not a raw UTC reading.
                    zone::local_time_of_day(start_instant, tz)
                } else {
                    TimeOfDay {
                        hour: start.hour() as u8,
                        minute: start.minute() as u8,
                    }
                };
                let slot = DailySlot { times: vec![time] };
                (RepeatFrequency::OneTime(vec![slot]), localized)
            }
        },
    };

    let stop = normalize_stop(interval, anchor, stop)?;

    debug!(
        "resolved plan: start={start}, cadence={}, localized_one_shot={localized_one_shot}",
        cadence_name(&cadence)
    );

    Ok(ResolvedPlan {
        start,
        start_instant,
        anchor,
        cadence,
        stop,
        localized_one_shot,
    })
}

/// A "before" interval must not keep emitting past the anchor: an absent
/// criterion becomes a date bound at the anchor, and the open-ended
/// "always" policy is clamped to just past it.
fn normalize_stop(
    interval: &Interval,
    anchor: Timestamp,
    stop: Option<&StopCriterion>,
) -> Result<Option<StopCriterion>, ScheduleError> {
    match (interval, stop) {
        (Interval::Before { .. }, None) => Ok(Some(StopCriterion::Until(anchor))),
        (Interval::Before { .. }, Some(StopCriterion::Always)) => {
            let end = zone::civil_utc(anchor)
                .checked_add(Span::new().days(1))
                .map_err(|e| ScheduleError::eval(format!("anchor bound overflows: {e}")))?;
            Ok(Some(StopCriterion::Until(zone::as_utc_instant(end)?)))
        }
        (_, stop) => Ok(stop.copied()),
    }
}

fn cadence_name(cadence: &RepeatFrequency) -> &'static str {
    match cadence {
        RepeatFrequency::OneTime(_) => "one_time",
        RepeatFrequency::Daily(_) => "daily",
        RepeatFrequency::Weekly(_) => "weekly",
        RepeatFrequency::Monthly(_) => "monthly",
        RepeatFrequency::Immediate => "immediate",
    }
}
