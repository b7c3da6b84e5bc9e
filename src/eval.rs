//! The generation loop: resolve, expand cycle by cycle, filter and
//! accumulate fire instants.

use jiff::{Span, Timestamp};
use log::{debug, trace};

use crate::error::ScheduleError;
use crate::model::{Interval, RepeatFrequency, StopCriterion};
use crate::resolve::{self, ResolvedPlan};
use crate::stop::{self, MAX_CYCLES};
use crate::zone;

/// How long after the anchor an immediate dispatch fires.
pub const IMMEDIATE_DELAY_MINUTES: i64 = 3;

/// Compute the UTC fire instants for a recurrence, relative to the given
/// clock reading.
///
/// `now` is always passed explicitly so callers control the clock; instants
/// before it are dropped. The result is in generation order: cycles
/// ascending, slots in configuration order within each cycle.
pub fn notification_times(
    interval: &Interval,
    anchor: Timestamp,
    repeat: Option<&RepeatFrequency>,
    stop: Option<&StopCriterion>,
    timezone: Option<&str>,
    now: Timestamp,
) -> Result<Vec<Timestamp>, ScheduleError> {
    // Immediate dispatch bypasses interval, schedule and stop criteria.
    if matches!(repeat, Some(RepeatFrequency::Immediate)) {
        let fire = anchor
            .checked_add(Span::new().minutes(IMMEDIATE_DELAY_MINUTES))
            .map_err(|e| ScheduleError::eval(format!("immediate delay overflows: {e}")))?;
        return Ok(if fire >= now { vec![fire] } else { Vec::new() });
    }

    let tz = zone::resolve(timezone)?;
    let plan = resolve::resolve(interval, anchor, repeat, stop, &tz)?;

    let mut out = Vec::new();
    let mut cycle: u32 = 0;
    loop {
        for candidate in crate::expand::candidates(cycle, plan.start, &plan.cadence) {
            let fire = if plan.localized_one_shot {
                zone::to_utc(candidate, &tz)?
            } else {
                zone::as_utc_instant(candidate)?
            };
            if fire < now {
                trace!("dropping past instant {fire}");
                continue;
            }
            if accept(&plan, interval, fire) {
                out.push(fire);
            }
        }
        cycle += 1;
        if cycle >= MAX_CYCLES || !stop::should_continue(cycle, plan.start, plan.stop.as_ref()) {
            break;
        }
    }

    debug!("generated {} notification instants over {cycle} cycles", out.len());
    Ok(out)
}

/// Interval policy bound on a fire instant. Before never emits past the
/// anchor; after never emits before the resolved start; same-day is
/// unbounded (the schedule and stop criterion govern).
fn accept(plan: &ResolvedPlan, interval: &Interval, fire: Timestamp) -> bool {
    match interval {
        Interval::Before { .. } => fire <= plan.anchor,
        Interval::After { .. } => fire >= plan.start_instant,
        Interval::SameDay => true,
    }
}
