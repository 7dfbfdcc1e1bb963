//! 1 Hz tick driver.
//!
//! The driver is a display/trigger mechanism only: each tick re-derives the
//! remaining time from timestamps, emits "ending soon" and completion
//! notifications, and asks the engine for the natural completion once the
//! segment runs out. Apart from that transition it only records which
//! segment has had its "ending soon" notice, in the aggregate itself so the
//! mark survives a reload.

use std::time::Duration;

use tracing::debug;

use super::engine::TimerEngine;
use super::state::{Segment, TimerState};
use crate::events::Event;
use crate::notify::{self, Notifier};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// No timed segment is running; the driver should stop polling.
    Idle,
    /// Segment still running; the UI should redraw with this value.
    Render { segment: Segment, remaining_secs: u64 },
    /// The segment ran out and the engine moved on.
    Transitioned(Event),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TickDriver;

impl TickDriver {
    pub fn new() -> Self {
        Self
    }

    pub fn tick<N: Notifier + ?Sized>(
        &self,
        engine: &TimerEngine,
        state: &mut TimerState,
        notifier: &N,
        now_ms: i64,
    ) -> Tick {
        let Some(segment) = state.active_segment() else {
            return Tick::Idle;
        };
        let remaining = state.segment_remaining(now_ms).unwrap_or(0);

        if remaining == 0 {
            announce_completion(segment, notifier);
            return match engine.complete_segment(state, now_ms) {
                Some(event) => Tick::Transitioned(event),
                None => Tick::Idle,
            };
        }

        let threshold = engine.settings().ending_soon_secs;
        if segment != Segment::Countdown
            && remaining <= threshold
            && state.ending_soon_notified_serial != Some(state.segment_serial)
        {
            state.ending_soon_notified_serial = Some(state.segment_serial);
            let minutes = threshold.div_ceil(60);
            debug!(?segment, remaining, "segment ending soon");
            match segment {
                Segment::Focus => notifier.notify(
                    notify::FOCUS_ENDING_TITLE,
                    &notify::focus_ending_message(minutes),
                ),
                Segment::Break => notifier.notify(
                    notify::BREAK_ENDING_TITLE,
                    &notify::break_ending_message(minutes),
                ),
                Segment::Countdown => {}
            }
        }

        Tick::Render {
            segment,
            remaining_secs: remaining,
        }
    }
}

fn announce_completion<N: Notifier + ?Sized>(segment: Segment, notifier: &N) {
    match segment {
        Segment::Focus => {
            notifier.notify(notify::FOCUS_COMPLETE_TITLE, notify::FOCUS_COMPLETE_MESSAGE)
        }
        Segment::Break => {
            notifier.notify(notify::BREAK_COMPLETE_TITLE, notify::BREAK_COMPLETE_MESSAGE)
        }
        Segment::Countdown => {
            notifier.notify(notify::BACK_TO_IT_TITLE, notify::BACK_TO_IT_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::SessionState;
    use std::cell::RefCell;

    const T0: i64 = 1_000_000;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notifier for Recorder {
        fn notify(&self, title: &str, _message: &str) {
            self.0.borrow_mut().push(title.to_string());
        }
    }

    fn at(s: i64) -> i64 {
        T0 + s * 1000
    }

    fn running(focus_secs: u64) -> (TimerEngine, TimerState) {
        let engine = TimerEngine::default();
        let mut state = engine.fresh_state();
        state.next_focus_duration = focus_secs;
        engine.start_focus(&mut state, T0).unwrap();
        (engine, state)
    }

    #[test]
    fn idle_when_nothing_runs() {
        let engine = TimerEngine::default();
        let mut state = engine.fresh_state();
        let driver = TickDriver::new();
        let tick = driver.tick(&engine, &mut state, &Recorder::default(), T0);
        assert_eq!(tick, Tick::Idle);
    }

    #[test]
    fn render_does_not_mutate_state() {
        let (engine, mut state) = running(1500);
        let before = state.clone();
        let driver = TickDriver::new();
        let tick = driver.tick(&engine, &mut state, &Recorder::default(), at(10));
        assert_eq!(
            tick,
            Tick::Render {
                segment: Segment::Focus,
                remaining_secs: 1490
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn ending_soon_fires_once_per_segment() {
        let (engine, mut state) = running(1500);
        let notifier = Recorder::default();
        let driver = TickDriver::new();

        for s in 1370..1390 {
            driver.tick(&engine, &mut state, &notifier, at(s));
        }
        assert_eq!(notifier.0.borrow().as_slice(), [notify::FOCUS_ENDING_TITLE]);
    }

    #[test]
    fn ending_soon_mark_lives_in_the_state() {
        let (engine, mut state) = running(1500);
        let notifier = Recorder::default();

        TickDriver::new().tick(&engine, &mut state, &notifier, at(1400));
        assert_eq!(state.ending_soon_notified_serial, Some(state.segment_serial));

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: TimerState = serde_json::from_str(&json).unwrap();
        TickDriver::new().tick(&engine, &mut restored, &notifier, at(1410));
        assert_eq!(notifier.0.borrow().as_slice(), [notify::FOCUS_ENDING_TITLE]);
    }

    #[test]
    fn pause_resume_does_not_rearm_ending_soon() {
        let (engine, mut state) = running(1500);
        let notifier = Recorder::default();
        let driver = TickDriver::new();

        driver.tick(&engine, &mut state, &notifier, at(1400));
        engine.pause(&mut state, at(1401)).unwrap();
        assert_eq!(driver.tick(&engine, &mut state, &notifier, at(1402)), Tick::Idle);
        engine.resume(&mut state, at(2000)).unwrap();
        driver.tick(&engine, &mut state, &notifier, at(2001));

        assert_eq!(notifier.0.borrow().len(), 1);
    }

    #[test]
    fn expiry_notifies_and_transitions_once() {
        let (engine, mut state) = running(1500);
        let notifier = Recorder::default();
        let driver = TickDriver::new();

        let tick = driver.tick(&engine, &mut state, &notifier, at(1500) + 1);
        assert!(matches!(tick, Tick::Transitioned(Event::FocusEnded { completed: true, .. })));
        assert_eq!(state.session_state, SessionState::RewardSelection);

        assert_eq!(driver.tick(&engine, &mut state, &notifier, at(1502)), Tick::Idle);
        assert_eq!(notifier.0.borrow().as_slice(), [notify::FOCUS_COMPLETE_TITLE]);
    }

    #[test]
    fn countdown_hands_over_to_focus() {
        let (engine, mut state) = running(1500);
        engine.complete_segment(&mut state, at(1500)).unwrap();
        engine.take_default_break(&mut state, at(1500)).unwrap();
        engine.end_early(&mut state, at(1510)).unwrap();

        let notifier = Recorder::default();
        let driver = TickDriver::new();
        let tick = driver.tick(&engine, &mut state, &notifier, at(1520));
        assert!(matches!(tick, Tick::Transitioned(Event::FocusStarted { .. })));
        assert_eq!(notifier.0.borrow().as_slice(), [notify::BACK_TO_IT_TITLE]);
    }
}
