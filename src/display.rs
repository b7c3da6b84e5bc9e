//! Human-readable formatting for the model types.

use std::fmt;

use crate::model::{Interval, OffsetUnit, RepeatFrequency, StopCriterion, TimeOfDay, Weekday};

impl fmt::Display for TimeOfDay {
    /// 12-hour clock with meridian, the form slot times are persisted in.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, meridian) = match self.hour {
            0 => (12, "AM"),
            1..=11 => (self.hour, "AM"),
            12 => (12, "PM"),
            _ => (self.hour - 12, "PM"),
        };
        write!(f, "{hour:02}:{:02} {meridian}", self.minute)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OffsetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameDay => f.write_str("same day"),
            Self::Before { amount, unit } => write!(f, "{amount} {unit} before"),
            Self::After { amount, unit } => write!(f, "{amount} {unit} after"),
        }
    }
}

impl fmt::Display for StopCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occurrences(n) => write!(f, "for {n} occurrences"),
            Self::Until(end) => write!(f, "until {end}"),
            Self::Days(n) => write!(f, "for {n} days"),
            Self::Weeks(n) => write!(f, "for {n} weeks"),
            Self::Months(n) => write!(f, "for {n} months"),
            Self::Always => f.write_str("always"),
        }
    }
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneTime(_) => f.write_str("one time"),
            Self::Daily(_) => f.write_str("daily"),
            Self::Weekly(_) => f.write_str("weekly"),
            Self::Monthly(_) => f.write_str("monthly"),
            Self::Immediate => f.write_str("immediate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_round_trips_through_display() {
        for (h, m, s) in [
            (0, 0, "12:00 AM"),
            (9, 5, "09:05 AM"),
            (12, 0, "12:00 PM"),
            (13, 0, "01:00 PM"),
            (23, 59, "11:59 PM"),
        ] {
            let t = TimeOfDay { hour: h, minute: m };
            assert_eq!(t.to_string(), s);
            assert_eq!(crate::model::parse_time_of_day(s), Some(t));
        }
    }

    #[test]
    fn interval_reads_naturally() {
        let i = Interval::Before {
            amount: 3,
            unit: OffsetUnit::Days,
        };
        assert_eq!(i.to_string(), "3 days before");
        assert_eq!(Interval::SameDay.to_string(), "same day");
    }
}
