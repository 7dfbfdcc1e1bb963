//! Fire-and-forget notification sink.
//!
//! A dropped notification is never a correctness problem for the timer, so
//! the trait has no return value.

use tracing::info;

pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(title, message, "notification");
    }
}

/// Discards everything. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, title: &str, message: &str) {
        (**self).notify(title, message)
    }
}

impl<N: Notifier + ?Sized> Notifier for std::rc::Rc<N> {
    fn notify(&self, title: &str, message: &str) {
        (**self).notify(title, message)
    }
}

pub const FOCUS_ENDING_TITLE: &str = "Focus Ending Soon";
pub const FOCUS_COMPLETE_TITLE: &str = "Focus Complete";
pub const BREAK_ENDING_TITLE: &str = "Break Ending Soon";
pub const BREAK_COMPLETE_TITLE: &str = "Break Complete";
pub const BACK_TO_IT_TITLE: &str = "Back To It";

pub fn focus_ending_message(minutes_left: u64) -> String {
    format!("{minutes_left} minutes left in your focus session!")
}

pub fn break_ending_message(minutes_left: u64) -> String {
    format!("{minutes_left} minutes left in your break!")
}

pub const FOCUS_COMPLETE_MESSAGE: &str = "Your focus session has ended!";
pub const BREAK_COMPLETE_MESSAGE: &str = "Your break has ended!";
pub const BACK_TO_IT_MESSAGE: &str = "Your next focus session is starting!";
