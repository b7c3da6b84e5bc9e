//! Persisted configuration shapes and their lowering into [`Recurrence`].
//!
//! These mirror the JSON stored on a communication record. The shapes are
//! loose by nature (string-or-number amounts, optional everything), so
//! lowering is fail-closed: a malformed piece degrades to the neutral value
//! for its field instead of erroring the whole record.

use jiff::Timestamp;
use serde::Deserialize;

use crate::error::ScheduleError;
use crate::model::{
    parse_time_of_day, parse_weekday, DailySlot, Interval, MonthlySlot, OffsetUnit, Recurrence,
    RepeatFrequency, StopCriterion, WeeklySlot,
};
use crate::zone;

/// Top-level frequency configuration of a communication.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrequencyConfig {
    #[serde(default)]
    pub interval: Option<IntervalConfig>,
    #[serde(default)]
    pub repeat_frequency: Option<RepeatFrequencyConfig>,
    #[serde(default)]
    pub delay: Option<DelayConfig>,
    #[serde(default)]
    pub repeat_until: Option<StopConfig>,
}

/// Interval block: `{"type": "before", "interval_schedule_type": "days",
/// "no_of_days": "3"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntervalConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub interval_schedule_type: Option<OffsetUnit>,
    #[serde(default)]
    pub no_of_days: Option<Amount>,
}

/// Repeat block: a type plus schedule slots.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepeatFrequencyConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub schedule_time: Option<Vec<SlotConfig>>,
}

/// A schedule slot: weekly slots carry `day`, monthly slots carry `date`
/// (only its day of month matters), daily slots carry neither.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotConfig {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub times: Option<Vec<String>>,
}

/// Delay block, which rewrites the interval to an after offset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DelayConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<OffsetUnit>,
    #[serde(default)]
    pub duration: Option<Amount>,
}

/// Repeat-until block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub duration: Option<Amount>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A numeric amount persisted either as a number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(i64),
    Text(String),
}

impl Amount {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl FrequencyConfig {
    /// Parse a frequency configuration from its stored JSON.
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        serde_json::from_str(json)
            .map_err(|e| ScheduleError::eval(format!("invalid frequency config: {e}")))
    }

    /// Lower into a [`Recurrence`], attaching the communication's timezone.
    pub fn recurrence(&self, timezone: Option<&str>) -> Recurrence {
        let mut interval = self
            .interval
            .as_ref()
            .map(IntervalConfig::lower)
            .unwrap_or_default();
        if let Some(delay) = self.delay.as_ref().and_then(DelayConfig::lower) {
            interval = delay;
        }
        Recurrence {
            interval,
            repeat: self
                .repeat_frequency
                .as_ref()
                .and_then(RepeatFrequencyConfig::lower),
            stop: match &self.repeat_until {
                Some(stop) => stop.lower(),
                // An absent block means no terminal condition was chosen.
                None => Some(StopCriterion::Always),
            },
            timezone: timezone.map(str::to_owned),
        }
    }
}

impl IntervalConfig {
    fn lower(&self) -> Interval {
        let unit = self.interval_schedule_type.unwrap_or(OffsetUnit::Days);
        let amount = self.no_of_days.as_ref().and_then(Amount::as_i64);
        match (self.kind.as_deref(), amount) {
            (Some("before"), Some(amount)) => Interval::Before { amount, unit },
            (Some("after"), Some(amount)) => Interval::After { amount, unit },
            _ => Interval::SameDay,
        }
    }
}

impl RepeatFrequencyConfig {
    fn lower(&self) -> Option<RepeatFrequency> {
        let slots = self.schedule_time.as_deref();
        match (self.kind.as_deref(), slots) {
            (Some("immediate"), _) => Some(RepeatFrequency::Immediate),
            (Some("one_time"), Some(slots)) => Some(RepeatFrequency::OneTime(daily_slots(slots))),
            (Some("daily"), Some(slots)) => Some(RepeatFrequency::Daily(daily_slots(slots))),
            (Some("weekly"), Some(slots)) => Some(RepeatFrequency::Weekly(weekly_slots(slots))),
            (Some("monthly"), Some(slots)) => Some(RepeatFrequency::Monthly(monthly_slots(slots))),
            // Slots without a type still mean "a schedule was configured",
            // just not one we can expand.
            (None, Some(_)) => Some(RepeatFrequency::OneTime(Vec::new())),
            _ => None,
        }
    }
}

fn slot_times(slot: &SlotConfig) -> Vec<crate::model::TimeOfDay> {
    slot.times
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|s| parse_time_of_day(s))
        .collect()
}

fn daily_slots(slots: &[SlotConfig]) -> Vec<DailySlot> {
    slots
        .iter()
        .map(|s| DailySlot {
            times: slot_times(s),
        })
        .collect()
}

fn weekly_slots(slots: &[SlotConfig]) -> Vec<WeeklySlot> {
    slots
        .iter()
        .filter_map(|s| {
            let weekday = s.day.as_deref().and_then(parse_weekday)?;
            Some(WeeklySlot {
                weekday,
                times: slot_times(s),
            })
        })
        .collect()
}

fn monthly_slots(slots: &[SlotConfig]) -> Vec<MonthlySlot> {
    slots
        .iter()
        .filter_map(|s| {
            // Only the day of month of the persisted date matters.
            let instant: Timestamp = s.date.as_deref()?.parse().ok()?;
            Some(MonthlySlot {
                day_of_month: zone::civil_utc(instant).day(),
                times: slot_times(s),
            })
        })
        .collect()
}

impl DelayConfig {
    fn lower(&self) -> Option<Interval> {
        let unit = self.kind?;
        let amount = self.duration.as_ref().and_then(Amount::as_i64)?;
        Some(Interval::After { amount, unit })
    }
}

impl StopConfig {
    fn lower(&self) -> Option<StopCriterion> {
        let n = || {
            self.duration
                .as_ref()
                .and_then(Amount::as_i64)
                .and_then(|v| u32::try_from(v).ok())
        };
        match self.kind.as_deref() {
            Some("no_of_times") => n().map(StopCriterion::Occurrences),
            Some("days") => n().map(StopCriterion::Days),
            Some("weeks") => n().map(StopCriterion::Weeks),
            Some("months") => n().map(StopCriterion::Months),
            Some("date") => self
                .end_date
                .as_deref()
                .and_then(|s| s.parse().ok())
                .map(StopCriterion::Until),
            Some("always") => Some(StopCriterion::Always),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimeOfDay, Weekday};

    #[test]
    fn lowers_a_full_weekly_config() {
        let config = FrequencyConfig::from_json(
            r#"{
                "interval": {"type": "after", "interval_schedule_type": "days", "no_of_days": "2"},
                "repeat_frequency": {
                    "type": "weekly",
                    "schedule_time": [
                        {"day": "Monday", "times": ["09:00 AM", "05:00 PM"]},
                        {"day": "Thursday", "times": ["12:00 PM"]}
                    ]
                },
                "repeat_until": {"type": "no_of_times", "duration": "4"}
            }"#,
        )
        .unwrap();
        let rec = config.recurrence(Some("America/New_York"));
        assert_eq!(
            rec.interval,
            Interval::After {
                amount: 2,
                unit: OffsetUnit::Days
            }
        );
        assert_eq!(rec.stop, Some(StopCriterion::Occurrences(4)));
        assert_eq!(rec.timezone.as_deref(), Some("America/New_York"));
        match rec.repeat {
            Some(RepeatFrequency::Weekly(slots)) => {
                assert_eq!(slots.len(), 2);
                assert_eq!(slots[0].weekday, Weekday::Monday);
                assert_eq!(
                    slots[0].times,
                    vec![
                        TimeOfDay { hour: 9, minute: 0 },
                        TimeOfDay { hour: 17, minute: 0 }
                    ]
                );
                assert_eq!(slots[1].weekday, Weekday::Thursday);
            }
            other => panic!("expected weekly cadence, got {other:?}"),
        }
    }

    #[test]
    fn numeric_amounts_are_accepted() {
        let config = FrequencyConfig::from_json(
            r#"{"interval": {"type": "before", "no_of_days": 3}}"#,
        )
        .unwrap();
        let rec = config.recurrence(None);
        assert_eq!(
            rec.interval,
            Interval::Before {
                amount: 3,
                unit: OffsetUnit::Days
            }
        );
    }

    #[test]
    fn malformed_interval_degrades_to_same_day() {
        let config = FrequencyConfig::from_json(
            r#"{"interval": {"type": "before", "no_of_days": "lots"}}"#,
        )
        .unwrap();
        assert_eq!(config.recurrence(None).interval, Interval::SameDay);
    }

    #[test]
    fn delay_overrides_the_interval() {
        let config = FrequencyConfig::from_json(
            r#"{
                "interval": {"type": "same_day"},
                "delay": {"type": "hours", "duration": "6"}
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.recurrence(None).interval,
            Interval::After {
                amount: 6,
                unit: OffsetUnit::Hours
            }
        );
    }

    #[test]
    fn monthly_slots_take_the_day_of_month() {
        let config = FrequencyConfig::from_json(
            r#"{
                "repeat_frequency": {
                    "type": "monthly",
                    "schedule_time": [
                        {"date": "2024-01-31T00:00:00Z", "times": ["10:00 AM"]},
                        {"date": "not a date", "times": ["10:00 AM"]}
                    ]
                }
            }"#,
        )
        .unwrap();
        match config.recurrence(None).repeat {
            Some(RepeatFrequency::Monthly(slots)) => {
                assert_eq!(slots.len(), 1);
                assert_eq!(slots[0].day_of_month, 31);
            }
            other => panic!("expected monthly cadence, got {other:?}"),
        }
    }

    #[test]
    fn absent_blocks_choose_neutral_values() {
        let config = FrequencyConfig::from_json("{}").unwrap();
        let rec = config.recurrence(None);
        assert_eq!(rec.interval, Interval::SameDay);
        assert_eq!(rec.repeat, None);
        assert_eq!(rec.stop, Some(StopCriterion::Always));

        // A present but typeless repeat-until block means nothing chosen.
        let config = FrequencyConfig::from_json(r#"{"repeat_until": {}}"#).unwrap();
        assert_eq!(config.recurrence(None).stop, None);
    }

    #[test]
    fn stop_date_parses_end_date() {
        let config = FrequencyConfig::from_json(
            r#"{"repeat_until": {"type": "date", "end_date": "2024-06-07T15:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.recurrence(None).stop,
            Some(StopCriterion::Until("2024-06-07T15:00:00Z".parse().unwrap()))
        );
    }
}
