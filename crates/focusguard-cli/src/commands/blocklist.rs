use clap::Subcommand;
use focusguard_core::dispatcher::Command;
use focusguard_core::storage::Config;

use crate::common::{open_dispatcher, print_json};

#[derive(Subcommand)]
pub enum BlocklistAction {
    /// Print the blocklist
    List,
    /// Normalize and insert a domain
    Add { domain: String },
    /// Remove an exact entry
    Remove { domain: String },
}

pub fn run(action: BlocklistAction) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = open_dispatcher(&Config::load_or_default())?;
    let response = match action {
        BlocklistAction::List => dispatcher.dispatch(Command::GetBlocklist),
        BlocklistAction::Add { domain } => dispatcher.dispatch(Command::AddDomain { domain }),
        BlocklistAction::Remove { domain } => {
            dispatcher.dispatch(Command::RemoveDomain { domain })
        }
    };
    print_json(&response)
}
