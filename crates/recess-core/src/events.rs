use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::EnergyLevel;
use crate::reward::Reward;
use crate::timer::{Segment, SessionState};

/// Every applied transition produces an Event.
/// Ignored (out-of-order) actions produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FocusStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        segment: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        segment: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A focus segment ended, naturally (`completed`) or cut short.
    FocusEnded {
        completed: bool,
        worked_secs: u64,
        momentum: f64,
        next_state: SessionState,
        at: DateTime<Utc>,
    },
    RewardsOffered {
        rewards: Vec<Reward>,
        at: DateTime<Utc>,
    },
    RewardRerolled {
        index: usize,
        reward: Reward,
        rerolls_left: u32,
        at: DateTime<Utc>,
    },
    BreakStarted {
        duration_secs: u64,
        reward: Option<Reward>,
        at: DateTime<Utc>,
    },
    /// Break is over and the countdown to the next focus segment began.
    BreakEnded {
        early: bool,
        countdown_secs: u64,
        at: DateTime<Utc>,
    },
    EnergyCheckedIn {
        level: EnergyLevel,
        next_focus_secs: u64,
        next_break_secs: u64,
        at: DateTime<Utc>,
    },
    TargetChanged {
        minutes: u64,
        next_focus_secs: u64,
        at: DateTime<Utc>,
    },
    WorkSessionCompleted {
        completed_work_minutes: f64,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    Snapshot {
        state: SessionState,
        is_paused: bool,
        remaining_secs: Option<u64>,
        work_remaining_secs: u64,
        next_focus_secs: u64,
        next_break_secs: u64,
        momentum: f64,
        fatigue: f64,
        progress: f64,
        rerolls: u32,
        rewards: Vec<Reward>,
        selected_reward: Option<Reward>,
        at: DateTime<Utc>,
    },
}
