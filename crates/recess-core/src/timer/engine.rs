//! Timer engine implementation.
//!
//! The engine is a wall-clock-based state machine over an explicitly passed
//! [`TimerState`]. It owns no state of its own beyond its settings and never
//! reads the clock: every command takes `now_ms`.
//!
//! ## State Transitions
//!
//! ```text
//! BeforeWorkSession -> OngoingFocusSession <-> (paused)
//!   -> RewardSelection -> OngoingBreakSession -> FocusSessionCountdown
//!   -> OngoingFocusSession -> ... -> WorkSessionComplete
//! ```
//!
//! Every command is total. It returns `Some(Event)` when it applied and
//! `None` when the current state does not accept it.

use rand::Rng;
use tracing::debug;

use super::settings::TimerSettings;
use super::state::{Segment, SessionState, TimerState};
use crate::calculator::{self, WeightMultipliers};
use crate::clock::to_datetime;
use crate::energy::EnergyLevel;
use crate::events::Event;
use crate::reward::{Reward, RewardGenerator, REWARD_OFFER_COUNT};

#[derive(Debug, Clone, Copy)]
pub struct TimerEngine {
    settings: TimerSettings,
    rewards: RewardGenerator,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerEngine {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            rewards: settings.reward_generator(),
            settings,
        }
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Start-of-day snapshot for these settings.
    pub fn fresh_state(&self) -> TimerState {
        TimerState::fresh(&self.settings)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self, state: &TimerState, now_ms: i64) -> Event {
        Event::Snapshot {
            state: state.session_state,
            is_paused: state.is_paused,
            remaining_secs: state.segment_remaining(now_ms),
            work_remaining_secs: state.work_session_duration_remaining,
            next_focus_secs: state.next_focus_duration,
            next_break_secs: state.next_break_duration,
            momentum: state.momentum,
            fatigue: state.fatigue(),
            progress: state.progress(),
            rerolls: state.rerolls,
            rewards: state.generated_rewards.clone(),
            selected_reward: state.selected_reward.clone(),
            at: to_datetime(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a focus segment of `next_focus_duration`, from the start of the
    /// day or by skipping the countdown.
    pub fn start_focus(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        match state.session_state {
            SessionState::BeforeWorkSession | SessionState::FocusSessionCountdown => {
                if state.next_focus_duration == 0 {
                    return None;
                }
                Some(self.enter_focus(state, now_ms))
            }
            _ => None,
        }
    }

    /// Freeze the running focus segment or countdown.
    pub fn pause(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        if state.is_paused {
            return None;
        }
        match state.session_state {
            SessionState::OngoingFocusSession => {
                let remaining = state.live_focus_remaining(now_ms);
                if remaining == 0 {
                    return self.complete_segment(state, now_ms);
                }
                state.focus_seconds_banked += state
                    .initial_focus_session_duration
                    .saturating_sub(remaining);
                state.focus_session_duration_remaining = remaining;
                state.focus_session_entry_time_stamp = None;
                state.is_paused = true;
                debug!(remaining, "focus paused");
                Some(Event::Paused {
                    segment: Segment::Focus,
                    remaining_secs: remaining,
                    at: to_datetime(now_ms),
                })
            }
            SessionState::FocusSessionCountdown => {
                let remaining = state.live_countdown_remaining(now_ms);
                if remaining == 0 {
                    return self.complete_segment(state, now_ms);
                }
                state.focus_session_countdown_time_remaining = remaining;
                state.focus_session_countdown_entry_time_stamp = None;
                state.is_paused = true;
                Some(Event::Paused {
                    segment: Segment::Countdown,
                    remaining_secs: remaining,
                    at: to_datetime(now_ms),
                })
            }
            _ => None,
        }
    }

    /// Continue a paused segment from its frozen remaining time.
    pub fn resume(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        if !state.is_paused {
            return None;
        }
        let (segment, remaining) = match state.session_state {
            SessionState::OngoingFocusSession => {
                state.initial_focus_session_duration = state.focus_session_duration_remaining;
                state.focus_session_entry_time_stamp = Some(now_ms);
                (Segment::Focus, state.focus_session_duration_remaining)
            }
            SessionState::FocusSessionCountdown => {
                state.initial_focus_session_countdown_duration =
                    state.focus_session_countdown_time_remaining;
                state.focus_session_countdown_entry_time_stamp = Some(now_ms);
                (Segment::Countdown, state.focus_session_countdown_time_remaining)
            }
            _ => {
                // A pause flag outside a pausable state carries no meaning.
                state.is_paused = false;
                return None;
            }
        };
        state.is_paused = false;
        debug!(?segment, remaining, "resumed");
        Some(Event::Resumed {
            segment,
            remaining_secs: remaining,
            at: to_datetime(now_ms),
        })
    }

    /// Cut the current segment short.
    ///
    /// During focus (running or paused) this accounts the worked time as an
    /// abandoned session. During a break it skips straight to the countdown.
    pub fn end_early(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        match state.session_state {
            SessionState::OngoingFocusSession => {
                let worked = state.focus_worked_secs(now_ms);
                Some(self.finish_focus(state, false, worked, now_ms))
            }
            SessionState::OngoingBreakSession => {
                state.break_session_duration_remaining = state.live_break_remaining(now_ms);
                state.break_session_entry_time_stamp = None;
                Some(self.enter_countdown(state, true, now_ms))
            }
            _ => None,
        }
    }

    /// Perform the natural completion of the active segment, regardless of
    /// the time left. The tick driver calls this once remaining hits zero.
    pub fn complete_segment(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        match state.session_state.segment()? {
            Segment::Focus => {
                let worked = if state.is_paused {
                    state.focus_seconds_banked
                } else {
                    state.focus_seconds_banked + state.initial_focus_session_duration
                };
                Some(self.finish_focus(state, true, worked, now_ms))
            }
            Segment::Break => {
                state.break_session_duration_remaining = state.next_break_duration;
                state.initial_break_session_duration = state.next_break_duration;
                state.break_session_entry_time_stamp = None;
                Some(self.enter_countdown(state, false, now_ms))
            }
            Segment::Countdown => Some(self.enter_focus(state, now_ms)),
        }
    }

    /// Fill the reward offer on entering reward selection.
    pub fn offer_rewards<R: Rng + ?Sized>(
        &self,
        state: &mut TimerState,
        sites: &[String],
        rng: &mut R,
        now_ms: i64,
    ) -> Option<Event> {
        if state.session_state != SessionState::RewardSelection
            || !state.generated_rewards.is_empty()
        {
            return None;
        }
        let rewards = self.rewards.generate(
            sites,
            self.settings.reward_offer_count.min(REWARD_OFFER_COUNT),
            &mut state.shown_reward_combinations,
            rng,
            now_ms,
        );
        if rewards.is_empty() {
            return None;
        }
        state.generated_rewards = rewards.clone();
        Some(Event::RewardsOffered {
            rewards,
            at: to_datetime(now_ms),
        })
    }

    /// Replace one offered reward, spending a reroll.
    pub fn reroll<R: Rng + ?Sized>(
        &self,
        state: &mut TimerState,
        index: usize,
        sites: &[String],
        rng: &mut R,
        now_ms: i64,
    ) -> Option<Event> {
        if state.session_state != SessionState::RewardSelection
            || state.rerolls == 0
            || index >= state.generated_rewards.len()
        {
            return None;
        }
        let reward =
            self.rewards
                .generate_one(sites, &state.shown_reward_combinations, rng, now_ms)?;
        state
            .shown_reward_combinations
            .insert(reward.combination_key());
        state.generated_rewards[index] = reward.clone();
        state.rerolls -= 1;
        Some(Event::RewardRerolled {
            index,
            reward,
            rerolls_left: state.rerolls,
            at: to_datetime(now_ms),
        })
    }

    /// Take the offered reward at `index` as the break.
    pub fn select_reward(&self, state: &mut TimerState, index: usize, now_ms: i64) -> Option<Event> {
        if state.session_state != SessionState::RewardSelection {
            return None;
        }
        let reward = state.generated_rewards.get(index)?.clone();
        state.next_break_duration = reward.seconds;
        Some(self.enter_break(state, reward.seconds, Some(reward), now_ms))
    }

    /// Start a break of the computed length without picking a reward.
    pub fn take_default_break(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        if state.session_state != SessionState::RewardSelection {
            return None;
        }
        let secs = state.next_break_duration;
        Some(self.enter_break(state, secs, None, now_ms))
    }

    /// Record an energy check-in and re-run the duration formulas.
    pub fn check_in(&self, state: &mut TimerState, level: EnergyLevel, now_ms: i64) -> Option<Event> {
        if state.session_state == SessionState::WorkSessionComplete {
            return None;
        }
        let WeightMultipliers { momentum, fatigue } = level.multipliers();
        state.momentum_weight_multiplier = momentum;
        state.fatigue_weight_multiplier = fatigue;
        state.recompute_next_durations();
        Some(Event::EnergyCheckedIn {
            level,
            next_focus_secs: state.next_focus_duration,
            next_break_secs: state.next_break_duration,
            at: to_datetime(now_ms),
        })
    }

    /// Change the daily work target. Only before the day has started.
    pub fn set_work_session_duration(
        &self,
        state: &mut TimerState,
        minutes: u64,
        now_ms: i64,
    ) -> Option<Event> {
        if state.session_state != SessionState::BeforeWorkSession || minutes == 0 {
            return None;
        }
        let secs = minutes.saturating_mul(60);
        state.initial_work_session_duration = secs;
        state.work_session_duration_remaining = secs;
        state.target_work_minutes_today = minutes as f64;
        state.recompute_next_durations();
        Some(Event::TargetChanged {
            minutes,
            next_focus_secs: state.next_focus_duration,
            at: to_datetime(now_ms),
        })
    }

    /// End the day now. Focus time in progress is credited as an early end.
    pub fn complete_work_session(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        match state.session_state {
            SessionState::BeforeWorkSession | SessionState::WorkSessionComplete => return None,
            SessionState::OngoingFocusSession => {
                let worked = state.focus_worked_secs(now_ms);
                self.finish_focus(state, false, worked, now_ms);
            }
            _ => {}
        }
        state.session_state = SessionState::WorkSessionComplete;
        state.is_paused = false;
        state.clear_entry_stamps();
        state.generated_rewards.clear();
        debug!("work session completed early");
        Some(Event::WorkSessionCompleted {
            completed_work_minutes: state.completed_work_minutes_today,
            at: to_datetime(now_ms),
        })
    }

    /// Reinitialize the whole aggregate. Reward history is not kept.
    pub fn reset(&self, state: &mut TimerState, now_ms: i64) -> Option<Event> {
        *state = self.fresh_state();
        Some(Event::Reset {
            at: to_datetime(now_ms),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_focus(&self, state: &mut TimerState, now_ms: i64) -> Event {
        state.session_state = SessionState::OngoingFocusSession;
        state.is_paused = false;
        state.clear_entry_stamps();
        state.initial_focus_session_duration = state.next_focus_duration;
        state.focus_session_duration_remaining = state.next_focus_duration;
        state.focus_session_entry_time_stamp = Some(now_ms);
        state.focus_seconds_banked = 0;
        state.initial_focus_session_countdown_duration = self.settings.countdown_secs;
        state.focus_session_countdown_time_remaining = self.settings.countdown_secs;
        state.segment_serial += 1;
        debug!(duration = state.next_focus_duration, "focus started");
        Event::FocusStarted {
            duration_secs: state.next_focus_duration,
            at: to_datetime(now_ms),
        }
    }

    fn enter_break(
        &self,
        state: &mut TimerState,
        secs: u64,
        reward: Option<Reward>,
        now_ms: i64,
    ) -> Event {
        state.session_state = SessionState::OngoingBreakSession;
        state.is_paused = false;
        state.clear_entry_stamps();
        state.selected_reward = reward.clone();
        state.generated_rewards.clear();
        state.initial_break_session_duration = secs;
        state.break_session_duration_remaining = secs;
        state.break_session_entry_time_stamp = Some(now_ms);
        state.segment_serial += 1;
        debug!(duration = secs, "break started");
        Event::BreakStarted {
            duration_secs: secs,
            reward,
            at: to_datetime(now_ms),
        }
    }

    fn enter_countdown(&self, state: &mut TimerState, early: bool, now_ms: i64) -> Event {
        let secs = self.settings.countdown_secs;
        state.session_state = SessionState::FocusSessionCountdown;
        state.is_paused = false;
        state.clear_entry_stamps();
        state.initial_focus_session_countdown_duration = secs;
        state.focus_session_countdown_time_remaining = secs;
        state.focus_session_countdown_entry_time_stamp = Some(now_ms);
        state.segment_serial += 1;
        Event::BreakEnded {
            early,
            countdown_secs: secs,
            at: to_datetime(now_ms),
        }
    }

    /// Shared accounting for natural and early focus termination.
    fn finish_focus(
        &self,
        state: &mut TimerState,
        completed: bool,
        worked_secs: u64,
        now_ms: i64,
    ) -> Event {
        let worked_minutes = calculator::seconds_to_minutes(worked_secs as f64);

        state.momentum = calculator::update_momentum(state.momentum, completed);
        state.completed_work_minutes_today += worked_minutes;
        state.last_completed_session_minutes = worked_minutes;
        state.last_focus_session_completed = completed;
        state.work_session_duration_remaining =
            state.work_session_duration_remaining.saturating_sub(worked_secs);

        state.session_state = if state.work_session_duration_remaining == 0 {
            SessionState::WorkSessionComplete
        } else {
            SessionState::RewardSelection
        };
        state.is_paused = false;
        state.clear_entry_stamps();
        state.focus_seconds_banked = 0;
        state.selected_reward = None;
        state.generated_rewards.clear();
        state.recompute_next_durations();

        debug!(
            completed,
            worked_secs,
            momentum = state.momentum,
            next_focus = state.next_focus_duration,
            "focus ended"
        );
        Event::FocusEnded {
            completed,
            worked_secs,
            momentum: state.momentum,
            next_state: state.session_state,
            at: to_datetime(now_ms),
        }
    }
}
