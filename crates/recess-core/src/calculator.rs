//! Dynamic session-duration calculator.
//!
//! Pure functions over explicit scalars: momentum (CEWMA of completion
//! outcomes), fatigue, progress toward the daily target, and the focus and
//! break length formulas derived from them. Nothing here reads state.
//!
//! ```text
//! focus = 10 + 35·Mm·M − 25·Fm·F − 10·P     (floored at 5)
//! break =  5 + 10·Fm·F +  2·P   +  4·Mm·M
//! ```

use serde::{Deserialize, Serialize};

/// Weight of the newest outcome in the momentum average.
pub const CEWMA_ALPHA: f64 = 0.5;
/// Momentum at the start of a day.
pub const CEWMA_STARTING_VALUE: f64 = 0.5;

/// Contribution of the most recent session to fatigue.
pub const SESSION_STRAIN_WEIGHT: f64 = 0.5;
/// Sessions longer than this fraction of the daily target count as "big".
pub const FATIGUE_SESSION_SIZE_THRESHOLD: f64 = 0.5;

pub const BASE_WORK_MINUTES: f64 = 10.0;
pub const MOMENTUM_WORK_WEIGHT: f64 = 35.0;
pub const FATIGUE_WORK_WEIGHT: f64 = 25.0;
pub const PROGRESS_WORK_WEIGHT: f64 = 10.0;
pub const MIN_WORK_SESSION_MINUTES: f64 = 5.0;

pub const BASE_BREAK_MINUTES: f64 = 5.0;
pub const FATIGUE_BREAK_WEIGHT: f64 = 10.0;
pub const PROGRESS_BREAK_WEIGHT: f64 = 2.0;
pub const MOMENTUM_BREAK_WEIGHT: f64 = 4.0;

/// Fraction of the daily target completed. Zero when the target is not positive.
pub fn progress(completed_minutes: f64, target_minutes: f64) -> f64 {
    if target_minutes <= 0.0 {
        return 0.0;
    }
    completed_minutes / target_minutes
}

/// Fold one focus-segment outcome into the momentum average.
pub fn update_momentum(momentum: f64, completed: bool) -> f64 {
    let c = if completed { 1.0 } else { 0.0 };
    CEWMA_ALPHA * c + (1.0 - CEWMA_ALPHA) * momentum
}

/// Fatigue from accumulated work plus the strain of the last session.
pub fn fatigue(completed_minutes: f64, target_minutes: f64, last_session_minutes: f64) -> f64 {
    if target_minutes <= 0.0 {
        return 0.0;
    }
    let base = (completed_minutes / target_minutes).powi(2);
    let threshold = FATIGUE_SESSION_SIZE_THRESHOLD * target_minutes;
    let strain = (last_session_minutes / threshold).powi(2);
    base + SESSION_STRAIN_WEIGHT * strain
}

/// User-tunable scaling of the momentum and fatigue terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightMultipliers {
    pub momentum: f64,
    pub fatigue: f64,
}

impl Default for WeightMultipliers {
    fn default() -> Self {
        Self {
            momentum: 1.0,
            fatigue: 1.0,
        }
    }
}

pub fn focus_duration_minutes(
    momentum: f64,
    fatigue: f64,
    progress: f64,
    weights: WeightMultipliers,
) -> f64 {
    let duration = BASE_WORK_MINUTES + MOMENTUM_WORK_WEIGHT * weights.momentum * momentum
        - FATIGUE_WORK_WEIGHT * weights.fatigue * fatigue
        - PROGRESS_WORK_WEIGHT * progress;
    duration.max(MIN_WORK_SESSION_MINUTES)
}

/// No clamp: the base term is the floor for valid (non-negative) inputs.
pub fn break_duration_minutes(
    fatigue: f64,
    progress: f64,
    momentum: f64,
    weights: WeightMultipliers,
) -> f64 {
    BASE_BREAK_MINUTES
        + FATIGUE_BREAK_WEIGHT * weights.fatigue * fatigue
        + PROGRESS_BREAK_WEIGHT * progress
        + MOMENTUM_BREAK_WEIGHT * weights.momentum * momentum
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

pub fn minutes_to_seconds(minutes: f64) -> f64 {
    minutes * 60.0
}

/// Everything the formulas need, gathered from the timer aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationInputs {
    pub momentum: f64,
    pub completed_minutes: f64,
    pub target_minutes: f64,
    pub last_session_minutes: f64,
    pub weights: WeightMultipliers,
    /// Remaining daily work budget in seconds.
    pub work_remaining_secs: u64,
}

/// Precomputed lengths of the upcoming focus and break segments, in seconds.
///
/// Both are floored to whole seconds when computed, because the segment
/// clock only counts whole seconds. A planned 858.3 s focus runs for 858 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDurations {
    pub focus_secs: u64,
    pub break_secs: u64,
}

/// Run the formulas and floor the results to whole seconds.
///
/// The focus length is clamped so a segment never outlasts the remaining
/// daily budget.
pub fn next_durations(inputs: &DurationInputs) -> NextDurations {
    let progress = progress(inputs.completed_minutes, inputs.target_minutes);
    let fatigue = fatigue(
        inputs.completed_minutes,
        inputs.target_minutes,
        inputs.last_session_minutes,
    );

    let focus_minutes = focus_duration_minutes(inputs.momentum, fatigue, progress, inputs.weights);
    let break_minutes = break_duration_minutes(fatigue, progress, inputs.momentum, inputs.weights);

    let focus_secs = to_whole_secs(minutes_to_seconds(focus_minutes)).min(inputs.work_remaining_secs);

    NextDurations {
        focus_secs,
        break_secs: to_whole_secs(minutes_to_seconds(break_minutes)),
    }
}

fn to_whole_secs(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(momentum: f64, completed: f64, last: f64, remaining: u64) -> DurationInputs {
        DurationInputs {
            momentum,
            completed_minutes: completed,
            target_minutes: 270.0,
            last_session_minutes: last,
            weights: WeightMultipliers::default(),
            work_remaining_secs: remaining,
        }
    }

    #[test]
    fn fresh_day_durations() {
        let w = WeightMultipliers::default();
        assert_eq!(focus_duration_minutes(0.5, 0.0, 0.0, w), 27.5);
        assert_eq!(break_duration_minutes(0.0, 0.0, 0.5, w), 7.0);
    }

    #[test]
    fn fractional_seconds_are_floored() {
        let next = next_durations(&inputs(0.123, 0.0, 0.0, u64::MAX));
        // 14.305 min focus, 5.492 min break.
        assert_eq!(next.focus_secs, 858);
        assert_eq!(next.break_secs, 329);
    }

    #[test]
    fn momentum_moves_halfway_toward_outcome() {
        assert_eq!(update_momentum(0.5, true), 0.75);
        assert_eq!(update_momentum(0.5, false), 0.25);
        assert_eq!(update_momentum(1.0, true), 1.0);
        assert_eq!(update_momentum(0.0, false), 0.0);
    }

    #[test]
    fn non_positive_target_degrades_to_zero() {
        assert_eq!(progress(30.0, 0.0), 0.0);
        assert_eq!(progress(30.0, -10.0), 0.0);
        assert_eq!(fatigue(30.0, 0.0, 25.0), 0.0);
    }

    #[test]
    fn progress_is_unbounded_above_one() {
        assert_eq!(progress(300.0, 200.0), 1.5);
    }

    #[test]
    fn fatigue_combines_base_and_strain() {
        // base = (135/270)^2 = 0.25, strain = (135/135)^2 = 1
        assert!((fatigue(135.0, 270.0, 135.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn focus_duration_is_floored() {
        let w = WeightMultipliers::default();
        assert_eq!(focus_duration_minutes(0.0, 3.0, 1.0, w), MIN_WORK_SESSION_MINUTES);
    }

    #[test]
    fn multipliers_scale_their_terms() {
        let w = WeightMultipliers {
            momentum: 1.5,
            fatigue: 1.0,
        };
        assert_eq!(focus_duration_minutes(0.5, 0.0, 0.0, w), 10.0 + 35.0 * 0.75);
        assert_eq!(break_duration_minutes(0.0, 0.0, 0.5, w), 5.0 + 4.0 * 0.75);

        let w = WeightMultipliers {
            momentum: 1.0,
            fatigue: 1.5,
        };
        assert_eq!(break_duration_minutes(0.2, 0.0, 0.0, w), 5.0 + 10.0 * 1.5 * 0.2);
    }

    #[test]
    fn next_focus_is_clamped_to_remaining_budget() {
        let next = next_durations(&inputs(0.5, 0.0, 0.0, 300));
        assert_eq!(next.focus_secs, 300);
        assert_eq!(next.break_secs, 420);
    }

    #[test]
    fn next_durations_for_fresh_day() {
        let next = next_durations(&inputs(0.5, 0.0, 0.0, 16_200));
        assert_eq!(next.focus_secs, 1650);
        assert_eq!(next.break_secs, 420);
    }
}
