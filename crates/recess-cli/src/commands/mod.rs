pub mod config;
pub mod energy;
pub mod reward;
pub mod sites;
pub mod target;
pub mod timer;

use serde::Serialize;

use recess_core::{
    Config, Database, Event, LogNotifier, Notifier, NullNotifier, SessionController,
    SystemClock,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Timer session as seen from the command line.
pub type Session = SessionController<Database, Box<dyn Notifier>, SystemClock>;

/// Prints notifications on stderr so they never mix with JSON output.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }
}

/// Load config, open the database and restore the timer.
///
/// Foreground sessions print notifications; one-shot commands only log them.
pub fn open_session(foreground: bool) -> Result<Session, recess_core::CoreError> {
    let config = Config::load_or_default();
    let notifier: Box<dyn Notifier> = match (config.notifications.enabled, foreground) {
        (false, _) => Box::new(NullNotifier),
        (true, true) => Box::new(TerminalNotifier),
        (true, false) => Box::new(LogNotifier),
    };
    let store = Database::open()?;
    let sites = Database::open()?;
    Ok(SessionController::load(
        config.timer_settings(),
        store,
        Box::new(sites),
        notifier,
        SystemClock,
    ))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the event an action produced, or the current snapshot if the
/// action did not apply.
pub fn print_outcome(session: &mut Session, event: Option<Event>) -> CliResult {
    match event {
        Some(event) => print_json(&event),
        None => {
            tracing::warn!(
                state = ?session.state().session_state,
                "action does not apply in the current state"
            );
            print_json(&session.snapshot())
        }
    }
}
