use clap::Subcommand;
use recess_core::timer::format_work_time;

use super::{open_session, print_outcome, CliResult};

#[derive(Subcommand)]
pub enum TargetAction {
    /// Set today's work target; only before the first focus session
    Set {
        /// Target in minutes
        minutes: u64,
    },
    /// Show today's target and what is left of it
    Show,
}

pub fn run(action: TargetAction) -> CliResult {
    let mut session = open_session(false)?;

    match action {
        TargetAction::Set { minutes } => {
            let event = session.set_work_session_duration(minutes);
            print_outcome(&mut session, event)?;
        }
        TargetAction::Show => {
            session.snapshot();
            let state = session.state();
            println!(
                "target {} | left {}",
                format_work_time(state.initial_work_session_duration),
                format_work_time(state.work_session_duration_remaining),
            );
        }
    }

    Ok(())
}
