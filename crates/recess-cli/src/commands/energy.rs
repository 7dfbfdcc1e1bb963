//! Energy check-in command.

use clap::Subcommand;
use recess_core::EnergyLevel;

use super::{open_session, print_outcome, CliResult};

#[derive(Subcommand)]
pub enum EnergyAction {
    /// Report how you feel; reshapes the next focus and break lengths
    CheckIn {
        /// drained, neutral or energized
        level: EnergyLevel,
    },
}

pub fn run(action: EnergyAction) -> CliResult {
    let mut session = open_session(false)?;

    match action {
        EnergyAction::CheckIn { level } => {
            let event = session.check_in(level);
            print_outcome(&mut session, event)?;
        }
    }

    Ok(())
}
