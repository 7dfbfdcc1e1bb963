//! Property tests for the duration formulas.

use proptest::prelude::*;
use recess_core::calculator::{
    break_duration_minutes, fatigue, focus_duration_minutes, minutes_to_seconds, next_durations,
    progress, seconds_to_minutes, update_momentum, DurationInputs, WeightMultipliers,
};

fn weights() -> impl Strategy<Value = WeightMultipliers> {
    (prop_oneof![Just(1.0), Just(1.5)], prop_oneof![Just(1.0), Just(1.5)])
        .prop_map(|(momentum, fatigue)| WeightMultipliers { momentum, fatigue })
}

proptest! {
    #[test]
    fn momentum_stays_in_unit_interval(m in 0.0f64..=1.0, completed: bool) {
        let next = update_momentum(m, completed);
        prop_assert!((0.0..=1.0).contains(&next));
    }

    #[test]
    fn focus_never_below_floor(
        m in 0.0f64..=1.0,
        f in 0.0f64..50.0,
        p in 0.0f64..5.0,
        w in weights(),
    ) {
        prop_assert!(focus_duration_minutes(m, f, p, w) >= 5.0);
    }

    #[test]
    fn break_never_below_base(
        m in 0.0f64..=1.0,
        f in 0.0f64..50.0,
        p in 0.0f64..5.0,
        w in weights(),
    ) {
        prop_assert!(break_duration_minutes(f, p, m, w) >= 5.0);
    }

    #[test]
    fn formulas_are_pure(
        done in 0.0f64..600.0,
        target in 1.0f64..600.0,
        last in 0.0f64..120.0,
        m in 0.0f64..=1.0,
    ) {
        prop_assert_eq!(progress(done, target), progress(done, target));
        prop_assert_eq!(fatigue(done, target, last), fatigue(done, target, last));

        let inputs = DurationInputs {
            momentum: m,
            completed_minutes: done,
            target_minutes: target,
            last_session_minutes: last,
            weights: WeightMultipliers::default(),
            work_remaining_secs: 16_200,
        };
        prop_assert_eq!(next_durations(&inputs), next_durations(&inputs));
    }

    #[test]
    fn minute_conversion_round_trips(x in -1.0e9f64..1.0e9) {
        let back = minutes_to_seconds(seconds_to_minutes(x));
        prop_assert!((back - x).abs() <= x.abs() * 1e-12);
    }

    #[test]
    fn focus_never_exceeds_budget(
        m in 0.0f64..=1.0,
        done in 0.0f64..270.0,
        remaining in 0u64..20_000,
    ) {
        let inputs = DurationInputs {
            momentum: m,
            completed_minutes: done,
            target_minutes: 270.0,
            last_session_minutes: 25.0,
            weights: WeightMultipliers::default(),
            work_remaining_secs: remaining,
        };
        prop_assert!(next_durations(&inputs).focus_secs <= remaining);
    }
}

#[test]
fn test_degenerate_target_yields_zero_progress_and_fatigue() {
    assert_eq!(progress(120.0, 0.0), 0.0);
    assert_eq!(progress(120.0, -5.0), 0.0);
    assert_eq!(fatigue(120.0, 0.0, 30.0), 0.0);
}
