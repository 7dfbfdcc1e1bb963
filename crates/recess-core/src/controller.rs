//! Session controller: binds the engine to a store, a clock, a notifier and
//! a reward site source.
//!
//! Every action first catches up on natural completions that are already
//! due, then applies the command, fills the reward offer when reward
//! selection was just entered, and writes the whole aggregate back.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::energy::EnergyLevel;
use crate::events::Event;
use crate::notify::Notifier;
use crate::reward::SiteSource;
use crate::storage::{self, KvStore, TIMER_STATE_KEY, WORK_TARGET_KEY};
use crate::timer::{SessionState, Tick, TickDriver, TimerEngine, TimerSettings, TimerState, TICK_INTERVAL};

/// Upper bound on catch-up ticks applied in one go.
const MAX_CATCH_UP_STEPS: usize = 4;

pub struct SessionController<S, N, C> {
    engine: TimerEngine,
    state: TimerState,
    driver: TickDriver,
    store: S,
    sites: Box<dyn SiteSource>,
    notifier: N,
    clock: C,
    rng: StdRng,
}

impl<S: KvStore, N: Notifier, C: Clock> SessionController<S, N, C> {
    /// Restore the aggregate from `store`, or start a fresh day.
    ///
    /// Missing snapshot fields fall back to their defaults. An unreadable
    /// snapshot is discarded with a warning.
    pub fn load(
        settings: TimerSettings,
        store: S,
        sites: Box<dyn SiteSource>,
        notifier: N,
        clock: C,
    ) -> Self {
        let engine = TimerEngine::new(settings);
        let state = match storage::load_json::<TimerState, S>(&store, TIMER_STATE_KEY) {
            Ok(Some(state)) => Some(state),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "discarding unreadable timer snapshot");
                None
            }
        };
        let restored = state.is_some();

        let mut controller = Self {
            state: state.unwrap_or_else(|| engine.fresh_state()),
            engine,
            driver: TickDriver::new(),
            store,
            sites,
            notifier,
            clock,
            rng: StdRng::from_entropy(),
        };
        if !restored {
            controller.apply_stored_target();
        }
        let now = controller.clock.now_ms();
        controller.catch_up(now);
        controller.settle(now);
        debug!(state = ?controller.state.session_state, restored, "timer loaded");
        controller
    }

    /// Replace the random source. Used to make reward offers reproducible.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&mut self) -> Event {
        let now = self.clock.now_ms();
        let mark = self.state.ending_soon_notified_serial;
        let completed = self.catch_up(now);
        if !completed.is_empty() || self.state.ending_soon_notified_serial != mark {
            self.settle(now);
        }
        self.engine.snapshot(&self.state, now)
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub fn start_focus(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.start_focus(state, now))
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.pause(state, now))
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.resume(state, now))
    }

    pub fn end_early(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.end_early(state, now))
    }

    pub fn select_reward(&mut self, index: usize) -> Option<Event> {
        self.act(|engine, state, now| engine.select_reward(state, index, now))
    }

    pub fn take_default_break(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.take_default_break(state, now))
    }

    pub fn reroll(&mut self, index: usize) -> Option<Event> {
        let now = self.clock.now_ms();
        self.catch_up(now);
        let sites = self.sites.sites();
        let event = self
            .engine
            .reroll(&mut self.state, index, &sites, &mut self.rng, now);
        self.settle(now);
        event
    }

    pub fn check_in(&mut self, level: EnergyLevel) -> Option<Event> {
        self.act(|engine, state, now| engine.check_in(state, level, now))
    }

    /// Change the daily target and remember it for future days.
    pub fn set_work_session_duration(&mut self, minutes: u64) -> Option<Event> {
        let event = self.act(|engine, state, now| engine.set_work_session_duration(state, minutes, now));
        if event.is_some() {
            if let Err(e) = storage::save_json(&self.store, WORK_TARGET_KEY, &minutes) {
                warn!(error = %e, "failed to persist work target");
            }
        }
        event
    }

    pub fn complete_work_session(&mut self) -> Option<Event> {
        self.act(|engine, state, now| engine.complete_work_session(state, now))
    }

    /// Start over. The stored daily target survives the reset.
    pub fn reset(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        let event = self.engine.reset(&mut self.state, now);
        self.apply_stored_target();
        info!("timer reset");
        self.settle(now);
        event
    }

    /// One driver step at the current time.
    pub fn tick(&mut self) -> Tick {
        let now = self.clock.now_ms();
        let mark = self.state.ending_soon_notified_serial;
        let tick = self
            .driver
            .tick(&self.engine, &mut self.state, &self.notifier, now);
        match &tick {
            Tick::Transitioned(event) => {
                debug!(?event, "segment completed");
                self.settle(now);
            }
            _ if self.state.ending_soon_notified_serial != mark => self.persist(),
            _ => {}
        }
        tick
    }

    /// Drive the timer at 1 Hz until no segment is running.
    ///
    /// `on_tick` sees every tick, including the final [`Tick::Idle`].
    pub async fn run_until_idle<F>(&mut self, mut on_tick: F)
    where
        F: FnMut(&Tick, &TimerState),
    {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let tick = self.tick();
            on_tick(&tick, &self.state);
            if tick == Tick::Idle {
                break;
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn act<F>(&mut self, command: F) -> Option<Event>
    where
        F: FnOnce(&TimerEngine, &mut TimerState, i64) -> Option<Event>,
    {
        let now = self.clock.now_ms();
        self.catch_up(now);
        let event = command(&self.engine, &mut self.state, now);
        if event.is_none() {
            debug!(state = ?self.state.session_state, "action ignored");
        }
        self.settle(now);
        event
    }

    /// Apply completions that came due while nobody was ticking.
    fn catch_up(&mut self, now_ms: i64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..MAX_CATCH_UP_STEPS {
            match self
                .driver
                .tick(&self.engine, &mut self.state, &self.notifier, now_ms)
            {
                Tick::Transitioned(event) => events.push(event),
                _ => break,
            }
        }
        events
    }

    /// Fill a pending reward offer and persist.
    fn settle(&mut self, now_ms: i64) {
        if self.state.session_state == SessionState::RewardSelection
            && self.state.generated_rewards.is_empty()
        {
            let sites = self.sites.sites();
            if sites.is_empty() {
                debug!("no reward sites configured");
            }
            self.engine
                .offer_rewards(&mut self.state, &sites, &mut self.rng, now_ms);
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = storage::save_json(&self.store, TIMER_STATE_KEY, &self.state) {
            warn!(error = %e, "failed to persist timer state");
        }
    }

    fn apply_stored_target(&mut self) {
        match storage::load_json::<u64, S>(&self.store, WORK_TARGET_KEY) {
            Ok(Some(minutes)) => {
                let now = self.clock.now_ms();
                self.engine
                    .set_work_session_duration(&mut self.state, minutes, now);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable work target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::NullNotifier;
    use crate::storage::{MemoryStore, SITES_KEY};
    use std::rc::Rc;

    const T0: i64 = 1_700_000_000_000;

    type TestController = SessionController<Rc<MemoryStore>, NullNotifier, Rc<ManualClock>>;

    fn controller(store: &Rc<MemoryStore>, clock: &Rc<ManualClock>) -> TestController {
        SessionController::load(
            TimerSettings::default(),
            Rc::clone(store),
            Box::new(vec!["news.example".to_string(), "video.example".to_string()]),
            NullNotifier,
            Rc::clone(clock),
        )
        .with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn load_writes_initial_snapshot() {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(T0));
        let c = controller(&store, &clock);
        assert_eq!(c.state().session_state, SessionState::BeforeWorkSession);
        assert!(store.kv_get(TIMER_STATE_KEY).unwrap().is_some());
    }

    #[test]
    fn every_action_writes_the_snapshot() {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(T0));
        let mut c = controller(&store, &clock);
        c.start_focus().unwrap();

        let saved: TimerState = storage::load_json(&*store, TIMER_STATE_KEY).unwrap().unwrap();
        assert_eq!(saved.session_state, SessionState::OngoingFocusSession);
        assert_eq!(saved.focus_session_entry_time_stamp, Some(T0));
    }

    #[test]
    fn completion_offers_rewards() {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(T0));
        let mut c = controller(&store, &clock);
        c.start_focus().unwrap();
        clock.advance_secs(c.state().next_focus_duration as i64);

        assert!(matches!(c.tick(), Tick::Transitioned(Event::FocusEnded { .. })));
        assert_eq!(c.state().session_state, SessionState::RewardSelection);
        assert_eq!(c.state().generated_rewards.len(), 3);
    }

    #[test]
    fn empty_site_list_leaves_offer_empty() {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(T0));
        let mut c = SessionController::load(
            TimerSettings::default(),
            Rc::clone(&store),
            Box::new(Vec::<String>::new()),
            NullNotifier,
            Rc::clone(&clock),
        );
        c.start_focus().unwrap();
        c.end_early().unwrap();
        assert!(c.state().generated_rewards.is_empty());
        assert!(c.take_default_break().is_some());
    }

    #[test]
    fn stored_target_applies_to_new_days() {
        let store = Rc::new(MemoryStore::new());
        store.kv_set(SITES_KEY, "[]").unwrap();
        let clock = Rc::new(ManualClock::new(T0));
        let mut c = controller(&store, &clock);
        c.set_work_session_duration(120).unwrap();
        c.start_focus().unwrap();
        c.reset().unwrap();
        assert_eq!(c.state().initial_work_session_duration, 7200);
        assert_eq!(c.state().target_work_minutes_today, 120.0);
    }
}
