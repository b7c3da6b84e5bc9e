//! Cycle expansion: the candidate wall clocks one cycle of a cadence
//! produces.

use jiff::civil::{Date, DateTime, Time};
use jiff::Span;
use log::trace;

use crate::model::{DailySlot, MonthlySlot, RepeatFrequency, TimeOfDay, WeeklySlot};

/// Candidate wall clocks for cycle `cycle` of the cadence, relative to the
/// resolved start. Candidates are UTC-naive here; the accumulator decides
/// how to read them as instants.
pub fn candidates(cycle: u32, start: DateTime, cadence: &RepeatFrequency) -> Vec<DateTime> {
    match cadence {
        RepeatFrequency::OneTime(slots) | RepeatFrequency::Daily(slots) => {
            daily(cycle, start, slots)
        }
        RepeatFrequency::Weekly(slots) => weekly(cycle, start, slots),
        RepeatFrequency::Monthly(slots) => monthly(cycle, start, slots),
        // Immediate dispatch never reaches expansion.
        RepeatFrequency::Immediate => Vec::new(),
    }
}

fn civil_time(t: &TimeOfDay) -> Option<Time> {
    Time::new(t.hour as i8, t.minute as i8, 0, 0).ok()
}

/// Daily (and one-time) cycles step one day at a time from the start.
fn daily(cycle: u32, start: DateTime, slots: &[DailySlot]) -> Vec<DateTime> {
    let Ok(base) = start.checked_add(Span::new().days(i64::from(cycle))) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for slot in slots {
        for time in &slot.times {
            if let Some(t) = civil_time(time) {
                out.push(base.date().to_datetime(t));
            }
        }
    }
    out
}

/// Weekly cycles cover the Sunday-based week containing `start + 7·cycle`
/// days. Each slot picks its weekday within that week; a slot whose day
/// falls before the start (in the first week) contributes nothing.
fn weekly(cycle: u32, start: DateTime, slots: &[WeeklySlot]) -> Vec<DateTime> {
    let Ok(base) = start.checked_add(Span::new().days(7 * i64::from(cycle))) else {
        return Vec::new();
    };
    let base_offset = i64::from(base.date().weekday().to_sunday_zero_offset());
    let Ok(week_start) = base.date().checked_sub(Span::new().days(base_offset)) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for slot in slots {
        let offset = i64::from(slot.weekday.to_sunday_zero());
        let Ok(day) = week_start.checked_add(Span::new().days(offset)) else {
            continue;
        };
        if day.to_datetime(start.time()) < start {
            trace!("weekly slot {} precedes start, skipped", slot.weekday.as_str());
            continue;
        }
        for time in &slot.times {
            if let Some(t) = civil_time(time) {
                out.push(day.to_datetime(t));
            }
        }
    }
    out
}

/// Monthly cycles step whole months from the start (day clamped). Each slot
/// re-pins the day of month; a day the target month does not have skips the
/// slot rather than rolling over.
fn monthly(cycle: u32, start: DateTime, slots: &[MonthlySlot]) -> Vec<DateTime> {
    let Ok(base) = start.checked_add(Span::new().months(i64::from(cycle))) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for slot in slots {
        let Ok(day) = Date::new(base.year(), base.month(), slot.day_of_month) else {
            trace!("day {} does not exist in {}-{:02}", slot.day_of_month, base.year(), base.month());
            continue;
        };
        for time in &slot.times {
            let Some(t) = civil_time(time) else { continue };
            let candidate = day.to_datetime(t);
            // A day of month already behind the start (or an earlier time on
            // the start day itself) is skipped, not deferred.
            if candidate < start {
                continue;
            }
            out.push(candidate);
        }
    }
    out
}
