use clap::Subcommand;

use super::{open_session, print_json, print_outcome, CliResult};

#[derive(Subcommand)]
pub enum RewardAction {
    /// List the current offer
    List,
    /// Take the offered reward at INDEX as the break
    Select {
        /// Position in the offer, starting at 0
        index: usize,
    },
    /// Replace the offered reward at INDEX with a new one
    Reroll {
        /// Position in the offer, starting at 0
        index: usize,
    },
    /// Take a plain break of the computed length
    Skip,
}

pub fn run(action: RewardAction) -> CliResult {
    let mut session = open_session(false)?;

    match action {
        RewardAction::List => {
            session.snapshot();
            let state = session.state();
            print_json(&serde_json::json!({
                "rewards": state.generated_rewards,
                "rerolls": state.rerolls,
            }))?;
        }
        RewardAction::Select { index } => {
            let event = session.select_reward(index);
            print_outcome(&mut session, event)?;
        }
        RewardAction::Reroll { index } => {
            let event = session.reroll(index);
            print_outcome(&mut session, event)?;
        }
        RewardAction::Skip => {
            let event = session.take_default_break();
            print_outcome(&mut session, event)?;
        }
    }

    Ok(())
}
