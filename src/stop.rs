//! Stop criterion evaluation.

use jiff::civil::DateTime;
use jiff::Span;

use crate::model::StopCriterion;
use crate::zone;

/// Hard cap on generated cycles, so a date bound far in the future cannot
/// spin the loop unbounded.
pub const MAX_CYCLES: u32 = 10_000;

/// Whether another cycle should be generated after `completed` cycles.
///
/// Count-based criteria compare the completed-cycle count directly; the
/// duration variants count cycles too, since a cycle already advances by the
/// cadence's own step. A date bound advances the start day-by-day and keeps
/// going while it has not passed the end. `Always` and an absent criterion
/// both stop after the first cycle.
pub fn should_continue(completed: u32, start: DateTime, stop: Option<&StopCriterion>) -> bool {
    match stop {
        Some(
            StopCriterion::Occurrences(n)
            | StopCriterion::Days(n)
            | StopCriterion::Weeks(n)
            | StopCriterion::Months(n),
        ) => completed < *n,
        Some(StopCriterion::Until(end)) => {
            match start.checked_add(Span::new().days(i64::from(completed))) {
                Ok(horizon) => horizon <= zone::civil_utc(*end),
                Err(_) => false,
            }
        }
        Some(StopCriterion::Always) | None => false,
    }
}
