mod driver;
mod engine;
mod format;
mod settings;
mod state;

pub use driver::{Tick, TickDriver, TICK_INTERVAL};
pub use engine::TimerEngine;
pub use format::{format_clock, format_work_time};
pub use settings::{
    TimerSettings, DEFAULT_FOCUS_SESSION_COUNTDOWN_TIME, DEFAULT_REROLLS,
    DEFAULT_WORK_SESSION_DURATION, NOTIFY_TIME_LEFT_SECONDS,
};
pub use state::{remaining_secs, Segment, SessionState, TimerState};
