use clap::Subcommand;
use focusguard_core::dispatcher::Command;
use focusguard_core::records::SettingsPatch;
use focusguard_core::storage::Config;

use crate::common::{open_dispatcher, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print stored settings as JSON
    Get,
    /// Update stored settings; unset fields keep their values
    Set {
        #[arg(long)]
        focus_minutes: Option<u32>,
        #[arg(long)]
        break_minutes: Option<u32>,
        #[arg(long)]
        auto_start_break: Option<bool>,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = open_dispatcher(&Config::load_or_default())?;
    if let SettingsAction::Set {
        focus_minutes,
        break_minutes,
        auto_start_break,
    } = action
    {
        dispatcher.dispatch(Command::SaveSettings {
            settings: SettingsPatch {
                focus_minutes,
                break_minutes,
                auto_start_break,
            },
        });
    }
    print_json(&dispatcher.dispatch(Command::GetSettings))
}
