//! # Recess Core Library
//!
//! This library provides the core logic for Recess, an adaptive focus/break
//! timer. Focus and break lengths are recomputed after every focus session
//! from momentum, fatigue and progress toward a daily work target, and each
//! break is offered as a "reward" drawn from a user-supplied site list.
//!
//! ## Architecture
//!
//! - **Calculator**: Pure duration formulas (momentum CEWMA, fatigue, progress)
//! - **Timer Engine**: A wall-clock-based state machine over an explicit
//!   [`TimerState`]; remaining time is always reconstructed from timestamps
//! - **Tick Driver**: 1 Hz display/notification trigger
//! - **Storage**: SQLite key-value snapshots and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionController`]: Engine bound to a store, clock and notifier
//! - [`Database`]: Snapshot persistence
//! - [`Config`]: Application configuration management

pub mod calculator;
pub mod clock;
pub mod controller;
pub mod energy;
pub mod error;
pub mod events;
pub mod notify;
pub mod reward;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::SessionController;
pub use energy::EnergyLevel;
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use reward::{Reward, RewardGenerator, SiteSource};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use timer::{Segment, SessionState, Tick, TickDriver, TimerEngine, TimerSettings, TimerState};
