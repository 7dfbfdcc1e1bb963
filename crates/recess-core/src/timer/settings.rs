use crate::reward::{RewardGenerator, MAX_REWARD_TIME, REWARD_OFFER_COUNT, REWARD_TIME_INTERVAL};

/// Daily work budget: 4.5 hours.
pub const DEFAULT_WORK_SESSION_DURATION: u64 = 4 * 60 * 60 + 30 * 60;
/// Pause between a break ending and the next focus segment.
pub const DEFAULT_FOCUS_SESSION_COUNTDOWN_TIME: u64 = 10;
pub const DEFAULT_REROLLS: u32 = 3;
/// Remaining time at which the "ending soon" notification fires.
pub const NOTIFY_TIME_LEFT_SECONDS: u64 = 120;

/// Immutable knobs for the state machine, projected from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub daily_work_secs: u64,
    pub countdown_secs: u64,
    pub rerolls: u32,
    pub ending_soon_secs: u64,
    pub reward_interval_minutes: u32,
    pub reward_max_minutes: u32,
    pub reward_offer_count: usize,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            daily_work_secs: DEFAULT_WORK_SESSION_DURATION,
            countdown_secs: DEFAULT_FOCUS_SESSION_COUNTDOWN_TIME,
            rerolls: DEFAULT_REROLLS,
            ending_soon_secs: NOTIFY_TIME_LEFT_SECONDS,
            reward_interval_minutes: REWARD_TIME_INTERVAL,
            reward_max_minutes: MAX_REWARD_TIME,
            reward_offer_count: REWARD_OFFER_COUNT,
        }
    }
}

impl TimerSettings {
    pub fn reward_generator(&self) -> RewardGenerator {
        RewardGenerator::new(self.reward_interval_minutes, self.reward_max_minutes)
    }
}
