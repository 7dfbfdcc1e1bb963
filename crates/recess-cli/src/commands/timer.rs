use clap::Subcommand;
use recess_core::timer::{format_clock, format_work_time};
use recess_core::{Event, Tick};

use super::{open_session, print_json, print_outcome, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the next focus session (also skips the countdown)
    Start,
    /// Pause the running focus session or countdown
    Pause,
    /// Resume a paused focus session or countdown
    Resume,
    /// End the current focus session or break early
    End,
    /// End the whole work day now
    Finish,
    /// Reset to the start of the day
    Reset,
    /// Print current timer state
    Status {
        /// One human-readable line instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Run the timer in the foreground until it needs input
    Watch,
}

pub fn run(action: TimerAction) -> CliResult {
    let mut session = open_session(matches!(action, TimerAction::Watch))?;

    match action {
        TimerAction::Start => {
            let event = session.start_focus();
            print_outcome(&mut session, event)?;
        }
        TimerAction::Pause => {
            let event = session.pause();
            print_outcome(&mut session, event)?;
        }
        TimerAction::Resume => {
            let event = session.resume();
            print_outcome(&mut session, event)?;
        }
        TimerAction::End => {
            let event = session.end_early();
            print_outcome(&mut session, event)?;
        }
        TimerAction::Finish => {
            let event = session.complete_work_session();
            print_outcome(&mut session, event)?;
        }
        TimerAction::Reset => {
            let event = session.reset();
            print_outcome(&mut session, event)?;
        }
        TimerAction::Status { plain } => {
            let snapshot = session.snapshot();
            if plain {
                println!("{}", status_line(&snapshot));
            } else {
                print_json(&snapshot)?;
            }
        }
        TimerAction::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(session.run_until_idle(|tick, _| match tick {
                Tick::Render {
                    segment,
                    remaining_secs,
                } => {
                    eprint!("\r{segment:?} {}   ", format_clock(*remaining_secs));
                }
                Tick::Transitioned(event) => {
                    eprintln!();
                    match serde_json::to_string(event) {
                        Ok(json) => println!("{json}"),
                        Err(e) => tracing::warn!(error = %e, "failed to encode event"),
                    }
                }
                Tick::Idle => {}
            }));
            print_json(&session.snapshot())?;
        }
    }

    Ok(())
}

fn status_line(snapshot: &Event) -> String {
    let Event::Snapshot {
        state,
        is_paused,
        remaining_secs,
        work_remaining_secs,
        next_focus_secs,
        next_break_secs,
        ..
    } = snapshot
    else {
        return String::new();
    };

    let clock = remaining_secs.map(format_clock).unwrap_or_else(|| "--:--".into());
    let paused = if *is_paused { " (paused)" } else { "" };
    format!(
        "{state:?}{paused} {clock} | next focus {} / break {} | left today {}",
        format_clock(*next_focus_secs),
        format_clock(*next_break_secs),
        format_work_time(*work_remaining_secs),
    )
}
