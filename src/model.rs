use std::str::FromStr;

use jiff::Timestamp;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

/// A notification recurrence: interval policy plus optional repeat schedule,
/// stop criterion and timezone.
///
/// This is the bundle a communication's persisted configuration lowers into.
/// `repeat: None` means no schedule was configured at all — for before/after
/// intervals the resolver then synthesizes a one-shot schedule from the
/// offset itself. `stop: None` means no stop criterion was configured, which
/// yields exactly one cycle (except for before intervals, where it becomes a
/// date bound at the anchor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    pub interval: Interval,
    pub repeat: Option<RepeatFrequency>,
    pub stop: Option<StopCriterion>,
    pub timezone: Option<String>,
}

impl Recurrence {
    /// Create a recurrence with just an interval (no schedule, no stop bound).
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            repeat: None,
            stop: None,
            timezone: None,
        }
    }

    pub fn with_repeat(mut self, repeat: RepeatFrequency) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_stop(mut self, stop: StopCriterion) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Offset of notification activity relative to the anchor time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// Notifications are anchored to the anchor day itself.
    #[default]
    SameDay,
    /// Notifications start `amount` units before the anchor.
    Before { amount: i64, unit: OffsetUnit },
    /// Notifications start `amount` units after the anchor.
    After { amount: i64, unit: OffsetUnit },
}

/// Unit for before/after interval offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OffsetUnit {
    Days,
    Hours,
    Minutes,
}

impl OffsetUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
        }
    }
}

/// The recurrence pattern and its schedule slots.
///
/// Slot payloads are typed per cadence: a weekly slot always carries a
/// weekday, a monthly slot always carries a day of month. A slot with no
/// times contributes zero notifications for its iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatFrequency {
    /// One cycle's worth of times, then whatever the stop criterion allows.
    OneTime(Vec<DailySlot>),
    /// The same times every day.
    Daily(Vec<DailySlot>),
    /// Times on specific weekdays, cycling by whole weeks.
    Weekly(Vec<WeeklySlot>),
    /// Times on specific days of the month, cycling by whole months.
    Monthly(Vec<MonthlySlot>),
    /// A single notification shortly after the anchor, bypassing interval
    /// and stop criteria entirely.
    Immediate,
}

/// Times within a day, for one-time and daily cadences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DailySlot {
    pub times: Vec<TimeOfDay>,
}

/// A weekday plus times, for weekly cadences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySlot {
    pub weekday: Weekday,
    pub times: Vec<TimeOfDay>,
}

/// A day of month plus times, for monthly cadences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySlot {
    pub day_of_month: i8,
    pub times: Vec<TimeOfDay>,
}

/// Rule governing when cycle generation halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCriterion {
    /// Stop after this many cycles.
    Occurrences(u32),
    /// Stop once the cycle horizon passes this instant.
    Until(Timestamp),
    /// Stop after this many cycles (see DESIGN.md on duration units).
    Days(u32),
    Weeks(u32),
    Months(u32),
    /// No terminal condition of its own. For before intervals the resolver
    /// rewrites this to a date bound just past the anchor; otherwise it
    /// stops after a single cycle, since an unbounded sequence has no
    /// meaning for a one-shot dispatch batch.
    Always,
}

/// Time of day (hours and minutes), parsed from a 12-hour clock string
/// with meridian, e.g. `"05:00 PM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Create a time of day, validating ranges.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }
}

/// Parse a clock string like `"05:00 PM"`, `"10:30 am"` or `"09:00"`.
///
/// Hours above 12 are accepted with either meridian (`"17:00 PM"` is
/// 17:00) because the upstream formatter historically emitted them.
pub fn parse_time_of_day(s: &str) -> Option<TimeOfDay> {
    let s = s.trim();
    let (clock, meridian) = match s.split_once(char::is_whitespace) {
        Some((clock, meridian)) => (clock, Some(meridian.trim())),
        None => (s, None),
    };
    let (h, m) = clock.split_once(':')?;
    let mut hour: u8 = h.trim().parse().ok()?;
    let minute: u8 = m.trim().parse().ok()?;
    match meridian.map(|m| m.to_ascii_uppercase()) {
        Some(mer) if mer == "PM" => {
            if hour < 12 {
                hour += 12;
            }
        }
        Some(mer) if mer == "AM" => {
            if hour == 12 {
                hour = 0;
            }
        }
        Some(_) => return None,
        None => {}
    }
    TimeOfDay::new(hour, minute)
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_of_day(s)
            .ok_or_else(|| ScheduleError::eval(format!("invalid time of day '{s}'")))
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_time_of_day(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day '{s}'")))
    }
}

/// Weekday with custom serde (capitalized string, as persisted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Offset within a Sunday-based week: Sunday=0 .. Saturday=6.
    pub fn to_sunday_zero(self) -> i8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    pub fn to_jiff(self) -> jiff::civil::Weekday {
        match self {
            Self::Sunday => jiff::civil::Weekday::Sunday,
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
        }
    }

    pub fn from_jiff(wd: jiff::civil::Weekday) -> Self {
        match wd {
            jiff::civil::Weekday::Sunday => Self::Sunday,
            jiff::civil::Weekday::Monday => Self::Monday,
            jiff::civil::Weekday::Tuesday => Self::Tuesday,
            jiff::civil::Weekday::Wednesday => Self::Wednesday,
            jiff::civil::Weekday::Thursday => Self::Thursday,
            jiff::civil::Weekday::Friday => Self::Friday,
            jiff::civil::Weekday::Saturday => Self::Saturday,
        }
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sunday),
        "monday" | "mon" => Some(Weekday::Monday),
        "tuesday" | "tue" => Some(Weekday::Tuesday),
        "wednesday" | "wed" => Some(Weekday::Wednesday),
        "thursday" | "thu" => Some(Weekday::Thursday),
        "friday" | "fri" => Some(Weekday::Friday),
        "saturday" | "sat" => Some(Weekday::Saturday),
        _ => None,
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_weekday(s).ok_or_else(|| ScheduleError::eval(format!("unknown weekday '{s}'")))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_weekday(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {s}")))
    }
}
