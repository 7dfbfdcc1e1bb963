//! Integration tests for snapshot persistence and recovery on load.

use std::rc::Rc;

use recess_core::storage::{self, KvStore, SITES_KEY, TIMER_STATE_KEY, WORK_TARGET_KEY};
use recess_core::{
    Database, ManualClock, MemoryStore, NullNotifier, SessionController, SessionState,
    StorageError, TimerSettings, TimerState,
};

const T0: i64 = 1_700_000_000_000;

fn load<S: KvStore>(store: S, clock: &Rc<ManualClock>) -> SessionController<S, NullNotifier, Rc<ManualClock>> {
    SessionController::load(
        TimerSettings::default(),
        store,
        Box::new(vec!["news.example".to_string()]),
        NullNotifier,
        Rc::clone(clock),
    )
}

/// A store whose every read and write fails.
struct BrokenStore;

impl KvStore for BrokenStore {
    fn kv_get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Locked)
    }

    fn kv_set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Locked)
    }
}

#[test]
fn test_reload_resumes_running_focus() {
    let store = Rc::new(MemoryStore::new());
    let clock = Rc::new(ManualClock::new(T0));
    {
        let mut c = load(Rc::clone(&store), &clock);
        c.start_focus().unwrap();
    }

    clock.advance_secs(600);
    let c = load(Rc::clone(&store), &clock);
    assert_eq!(c.state().session_state, SessionState::OngoingFocusSession);
    assert_eq!(c.state().segment_remaining(c.now_ms()), Some(1650 - 600));
}

#[test]
fn test_expired_segment_completes_on_load() {
    let store = Rc::new(MemoryStore::new());
    let clock = Rc::new(ManualClock::new(T0));
    {
        let mut c = load(Rc::clone(&store), &clock);
        c.start_focus().unwrap();
    }

    // The process was gone for longer than the whole focus segment.
    clock.advance_secs(2 * 3600);
    let c = load(Rc::clone(&store), &clock);
    assert_eq!(c.state().session_state, SessionState::RewardSelection);
    assert!(c.state().last_focus_session_completed);
    assert_eq!(c.state().generated_rewards.len(), 3);

    let saved: TimerState = storage::load_json(&*store, TIMER_STATE_KEY).unwrap().unwrap();
    assert_eq!(saved.session_state, SessionState::RewardSelection);
}

#[test]
fn test_corrupt_snapshot_falls_back_to_defaults() {
    let store = MemoryStore::new();
    store.kv_set(TIMER_STATE_KEY, "{\"sessionState\": 42").unwrap();
    let clock = Rc::new(ManualClock::new(T0));

    let c = load(store, &clock);
    assert_eq!(c.state(), &TimerState::default());
}

#[test]
fn test_partial_snapshot_is_backfilled() {
    let store = MemoryStore::new();
    store
        .kv_set(
            TIMER_STATE_KEY,
            r#"{"sessionState":"REWARD_SELECTION","momentum":0.75,"generatedRewards":[]}"#,
        )
        .unwrap();
    let clock = Rc::new(ManualClock::new(T0));

    let c = load(store, &clock);
    let state = c.state();
    assert_eq!(state.session_state, SessionState::RewardSelection);
    assert_eq!(state.momentum, 0.75);
    assert_eq!(state.rerolls, 3);
    assert_eq!(state.initial_work_session_duration, 16200);
    // The empty offer is refilled from the site list.
    assert!(!state.generated_rewards.is_empty());
}

#[test]
fn test_stored_target_seeds_a_fresh_day() {
    let store = MemoryStore::new();
    store.kv_set(WORK_TARGET_KEY, "90").unwrap();
    let clock = Rc::new(ManualClock::new(T0));

    let c = load(store, &clock);
    assert_eq!(c.state().work_session_duration_remaining, 90 * 60);
    assert_eq!(c.state().target_work_minutes_today, 90.0);
}

#[test]
fn test_broken_store_never_blocks_transitions() {
    let clock = Rc::new(ManualClock::new(T0));
    let mut c = load(BrokenStore, &clock);
    assert!(c.start_focus().is_some());
    clock.advance_secs(60);
    assert!(c.pause().is_some());
    assert!(c.resume().is_some());
    assert!(c.end_early().is_some());
}

#[test]
fn test_database_snapshot_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("recess.db");
    let clock = Rc::new(ManualClock::new(T0));
    {
        let db = Database::open_at(&path).unwrap();
        storage::save_json(&db, SITES_KEY, &["news.example"]).unwrap();
        let mut c = load(db, &clock);
        c.set_work_session_duration(120).unwrap();
        c.start_focus().unwrap();
    }

    clock.advance_secs(30);
    let db = Database::open_at(&path).unwrap();
    let c = load(db, &clock);
    assert_eq!(c.state().session_state, SessionState::OngoingFocusSession);
    assert_eq!(c.state().initial_work_session_duration, 7200);
}
