//! The durable timer aggregate.
//!
//! Remaining time of a running segment is never decremented in place. It is
//! reconstructed from the entry timestamp on every read:
//!
//! ```text
//! remaining = max(0, initial − floor((now − entry) / 1000))
//! ```
//!
//! so the timer stays correct when the process sleeps, dies, or reloads.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;
use crate::calculator::{self, DurationInputs, WeightMultipliers};
use crate::reward::Reward;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    #[default]
    BeforeWorkSession,
    OngoingFocusSession,
    RewardSelection,
    OngoingBreakSession,
    FocusSessionCountdown,
    WorkSessionComplete,
}

impl SessionState {
    pub fn segment(self) -> Option<Segment> {
        match self {
            SessionState::OngoingFocusSession => Some(Segment::Focus),
            SessionState::OngoingBreakSession => Some(Segment::Break),
            SessionState::FocusSessionCountdown => Some(Segment::Countdown),
            _ => None,
        }
    }
}

/// A timed stretch of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Focus,
    Break,
    Countdown,
}

/// Live remaining seconds for a segment that started at `entry_ms` with
/// `initial_secs` on the clock. Without an entry stamp the segment is not
/// running and the initial value is returned untouched.
pub fn remaining_secs(initial_secs: u64, entry_ms: Option<i64>, now_ms: i64) -> u64 {
    let Some(entry) = entry_ms else {
        return initial_secs;
    };
    let elapsed = now_ms.saturating_sub(entry).div_euclid(1000).max(0);
    initial_secs.saturating_sub(elapsed as u64)
}

/// Whole timer aggregate, persisted as one snapshot.
///
/// Deserialization fills any missing field from [`TimerState::default`], so
/// snapshots written by older builds load without migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerState {
    pub session_state: SessionState,
    pub is_paused: bool,

    /// Daily work budget and what is left of it (seconds).
    pub initial_work_session_duration: u64,
    pub work_session_duration_remaining: u64,

    pub initial_focus_session_duration: u64,
    pub focus_session_duration_remaining: u64,
    pub focus_session_entry_time_stamp: Option<i64>,
    /// Focus seconds worked in the current segment before its last pause.
    pub focus_seconds_banked: u64,

    pub initial_break_session_duration: u64,
    pub break_session_duration_remaining: u64,
    pub break_session_entry_time_stamp: Option<i64>,

    pub initial_focus_session_countdown_duration: u64,
    pub focus_session_countdown_time_remaining: u64,
    pub focus_session_countdown_entry_time_stamp: Option<i64>,

    pub rerolls: u32,
    pub selected_reward: Option<Reward>,
    pub generated_rewards: Vec<Reward>,
    pub shown_reward_combinations: BTreeSet<String>,

    pub next_focus_duration: u64,
    pub next_break_duration: u64,
    pub last_focus_session_completed: bool,

    pub momentum: f64,
    pub completed_work_minutes_today: f64,
    pub target_work_minutes_today: f64,
    pub last_completed_session_minutes: f64,
    pub fatigue_weight_multiplier: f64,
    pub momentum_weight_multiplier: f64,

    /// Bumped whenever a new focus, break or countdown segment is entered.
    pub segment_serial: u64,
    /// Serial of the segment that already got its "ending soon" notice.
    pub ending_soon_notified_serial: Option<u64>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::fresh(&TimerSettings::default())
    }
}

impl TimerState {
    /// Start-of-day snapshot: neutral momentum, full budget, no rewards.
    pub fn fresh(settings: &TimerSettings) -> Self {
        let mut state = Self {
            session_state: SessionState::BeforeWorkSession,
            is_paused: false,
            initial_work_session_duration: settings.daily_work_secs,
            work_session_duration_remaining: settings.daily_work_secs,
            initial_focus_session_duration: 0,
            focus_session_duration_remaining: 0,
            focus_session_entry_time_stamp: None,
            focus_seconds_banked: 0,
            initial_break_session_duration: 0,
            break_session_duration_remaining: 0,
            break_session_entry_time_stamp: None,
            initial_focus_session_countdown_duration: settings.countdown_secs,
            focus_session_countdown_time_remaining: settings.countdown_secs,
            focus_session_countdown_entry_time_stamp: None,
            rerolls: settings.rerolls,
            selected_reward: None,
            generated_rewards: Vec::new(),
            shown_reward_combinations: BTreeSet::new(),
            next_focus_duration: 0,
            next_break_duration: 0,
            last_focus_session_completed: false,
            momentum: calculator::CEWMA_STARTING_VALUE,
            completed_work_minutes_today: 0.0,
            target_work_minutes_today: calculator::seconds_to_minutes(
                settings.daily_work_secs as f64,
            ),
            last_completed_session_minutes: 0.0,
            fatigue_weight_multiplier: 1.0,
            momentum_weight_multiplier: 1.0,
            segment_serial: 0,
            ending_soon_notified_serial: None,
        };
        state.recompute_next_durations();
        state.initial_break_session_duration = state.next_break_duration;
        state.break_session_duration_remaining = state.next_break_duration;
        state
    }

    pub fn weights(&self) -> WeightMultipliers {
        WeightMultipliers {
            momentum: self.momentum_weight_multiplier,
            fatigue: self.fatigue_weight_multiplier,
        }
    }

    pub fn duration_inputs(&self) -> DurationInputs {
        DurationInputs {
            momentum: self.momentum,
            completed_minutes: self.completed_work_minutes_today,
            target_minutes: self.target_work_minutes_today,
            last_session_minutes: self.last_completed_session_minutes,
            weights: self.weights(),
            work_remaining_secs: self.work_session_duration_remaining,
        }
    }

    pub fn progress(&self) -> f64 {
        calculator::progress(self.completed_work_minutes_today, self.target_work_minutes_today)
    }

    pub fn fatigue(&self) -> f64 {
        calculator::fatigue(
            self.completed_work_minutes_today,
            self.target_work_minutes_today,
            self.last_completed_session_minutes,
        )
    }

    /// Refresh `next_focus_duration`/`next_break_duration` from the current
    /// inputs. Outside a focus segment the displayed focus fields follow.
    pub fn recompute_next_durations(&mut self) {
        let next = calculator::next_durations(&self.duration_inputs());
        self.next_focus_duration = next.focus_secs;
        self.next_break_duration = next.break_secs;
        if self.session_state != SessionState::OngoingFocusSession {
            self.initial_focus_session_duration = next.focus_secs;
            self.focus_session_duration_remaining = next.focus_secs;
        }
    }

    /// The segment currently accruing time, if any.
    pub fn active_segment(&self) -> Option<Segment> {
        if self.is_paused {
            return None;
        }
        self.session_state.segment()
    }

    pub fn is_ticking(&self) -> bool {
        self.active_segment().is_some()
    }

    pub fn live_focus_remaining(&self, now_ms: i64) -> u64 {
        remaining_secs(
            self.initial_focus_session_duration,
            self.focus_session_entry_time_stamp,
            now_ms,
        )
    }

    pub fn live_break_remaining(&self, now_ms: i64) -> u64 {
        remaining_secs(
            self.initial_break_session_duration,
            self.break_session_entry_time_stamp,
            now_ms,
        )
    }

    pub fn live_countdown_remaining(&self, now_ms: i64) -> u64 {
        remaining_secs(
            self.initial_focus_session_countdown_duration,
            self.focus_session_countdown_entry_time_stamp,
            now_ms,
        )
    }

    /// Remaining seconds of the current state's segment. Paused segments
    /// report their frozen value.
    pub fn segment_remaining(&self, now_ms: i64) -> Option<u64> {
        let segment = self.session_state.segment()?;
        Some(match (segment, self.is_paused) {
            (Segment::Focus, false) => self.live_focus_remaining(now_ms),
            (Segment::Focus, true) => self.focus_session_duration_remaining,
            (Segment::Break, _) => self.live_break_remaining(now_ms),
            (Segment::Countdown, false) => self.live_countdown_remaining(now_ms),
            (Segment::Countdown, true) => self.focus_session_countdown_time_remaining,
        })
    }

    /// Focus seconds worked so far in the current segment, across pauses.
    pub fn focus_worked_secs(&self, now_ms: i64) -> u64 {
        let running = if self.is_paused || self.focus_session_entry_time_stamp.is_none() {
            0
        } else {
            self.initial_focus_session_duration
                .saturating_sub(self.live_focus_remaining(now_ms))
        };
        self.focus_seconds_banked + running
    }

    pub(crate) fn clear_entry_stamps(&mut self) {
        self.focus_session_entry_time_stamp = None;
        self.break_session_entry_time_stamp = None;
        self.focus_session_countdown_entry_time_stamp = None;
    }
}
