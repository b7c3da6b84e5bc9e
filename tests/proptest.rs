//! Property tests over randomly generated recurrences.

use jiff::Timestamp;
use proptest::prelude::*;

use notisched::{
    DailySlot, Interval, MonthlySlot, OffsetUnit, Recurrence, RepeatFrequency, StopCriterion,
    TimeOfDay, Weekday, WeeklySlot,
};

fn early() -> Timestamp {
    "2023-01-01T00:00:00Z".parse().unwrap()
}

fn anchor() -> Timestamp {
    "2024-05-01T12:00:00Z".parse().unwrap()
}

prop_compose! {
    fn arb_time()(hour in 0u8..24, minute in 0u8..60) -> TimeOfDay {
        TimeOfDay { hour, minute }
    }
}

prop_compose! {
    fn arb_daily()(times in prop::collection::vec(arb_time(), 0..4)) -> RepeatFrequency {
        RepeatFrequency::Daily(vec![DailySlot { times }])
    }
}

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    prop_oneof![
        Just(Weekday::Sunday),
        Just(Weekday::Monday),
        Just(Weekday::Tuesday),
        Just(Weekday::Wednesday),
        Just(Weekday::Thursday),
        Just(Weekday::Friday),
        Just(Weekday::Saturday),
    ]
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(
        cadence in arb_daily(),
        n in 1u32..8,
        before in proptest::bool::ANY,
        amount in 1i64..30,
    ) {
        let interval = if before {
            Interval::Before { amount, unit: OffsetUnit::Days }
        } else {
            Interval::After { amount, unit: OffsetUnit::Days }
        };
        let rec = Recurrence::new(interval)
            .with_repeat(cadence)
            .with_stop(StopCriterion::Occurrences(n));
        let first = rec.try_notification_times(anchor(), early()).unwrap();
        let second = rec.try_notification_times(anchor(), early()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn same_day_daily_emits_exactly_cycles_times_slots(
        times in prop::collection::vec(arb_time(), 1..5),
        n in 1u32..10,
    ) {
        let expected = times.len() * n as usize;
        let rec = Recurrence::new(Interval::SameDay)
            .with_repeat(RepeatFrequency::Daily(vec![DailySlot { times }]))
            .with_stop(StopCriterion::Occurrences(n));
        let out = rec.try_notification_times(anchor(), early()).unwrap();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn before_never_emits_past_the_anchor(
        cadence in arb_daily(),
        amount in 1i64..30,
        n in 1u32..10,
    ) {
        let rec = Recurrence::new(Interval::Before { amount, unit: OffsetUnit::Days })
            .with_repeat(cadence)
            .with_stop(StopCriterion::Occurrences(n));
        for ts in rec.try_notification_times(anchor(), early()).unwrap() {
            prop_assert!(ts <= anchor());
        }
    }

    #[test]
    fn after_never_emits_before_the_offset(
        cadence in arb_daily(),
        amount in 1i64..30,
        n in 1u32..10,
    ) {
        let rec = Recurrence::new(Interval::After { amount, unit: OffsetUnit::Days })
            .with_repeat(cadence)
            .with_stop(StopCriterion::Occurrences(n));
        for ts in rec.try_notification_times(anchor(), early()).unwrap() {
            prop_assert!(ts >= anchor());
        }
    }

    #[test]
    fn nothing_fires_before_the_clock(
        cadence in arb_daily(),
        n in 1u32..10,
    ) {
        let now = anchor();
        let rec = Recurrence::new(Interval::SameDay)
            .with_repeat(cadence)
            .with_stop(StopCriterion::Occurrences(n));
        for ts in rec.try_notification_times(anchor(), now).unwrap() {
            prop_assert!(ts >= now);
        }
    }

    #[test]
    fn empty_slots_yield_nothing_for_every_cadence(
        weekday in arb_weekday(),
        day_of_month in 1i8..29,
        n in 1u32..10,
    ) {
        let cadences = [
            RepeatFrequency::OneTime(vec![DailySlot { times: Vec::new() }]),
            RepeatFrequency::Daily(Vec::new()),
            RepeatFrequency::Weekly(vec![WeeklySlot { weekday, times: Vec::new() }]),
            RepeatFrequency::Monthly(vec![MonthlySlot { day_of_month, times: Vec::new() }]),
        ];
        for cadence in cadences {
            let rec = Recurrence::new(Interval::SameDay)
                .with_repeat(cadence)
                .with_stop(StopCriterion::Occurrences(n));
            prop_assert!(rec.try_notification_times(anchor(), early()).unwrap().is_empty());
        }
    }

    #[test]
    fn generation_order_is_non_decreasing_across_cycles(
        time in arb_time(),
        n in 1u32..10,
    ) {
        let rec = Recurrence::new(Interval::SameDay)
            .with_repeat(RepeatFrequency::Daily(vec![DailySlot { times: vec![time] }]))
            .with_stop(StopCriterion::Occurrences(n));
        let out = rec.try_notification_times(anchor(), early()).unwrap();
        for pair in out.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}
