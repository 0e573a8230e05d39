use clap::Args;
use focusguard_core::dispatcher::Command;
use focusguard_core::storage::Config;

use crate::common::{open_dispatcher, print_json};

#[derive(Args)]
pub struct NavigateArgs {
    /// Destination URL of the navigation
    pub url: String,
    /// Navigating tab id
    #[arg(long, default_value_t = 0)]
    pub tab: u32,
    /// Frame id; only the top frame (0) is gated
    #[arg(long, default_value_t = 0)]
    pub frame: u32,
}

pub fn run_navigate(args: NavigateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let dispatcher = open_dispatcher(&config)?;
    let outcome = dispatcher.on_navigation(
        args.tab,
        args.frame,
        &args.url,
        &config.blocking.interstitial_base,
    );
    match outcome {
        Some(to) => print_json(&serde_json::json!({ "action": "redirect", "to": to })),
        None => print_json(&serde_json::json!({ "action": "allow" })),
    }
}

#[derive(Args)]
pub struct SnoozeArgs {
    /// Hostname to exempt
    pub hostname: String,
    /// Exemption length; defaults to the configured snooze minutes
    #[arg(long)]
    pub minutes: Option<u32>,
}

pub fn run_snooze(args: SnoozeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let dispatcher = open_dispatcher(&config)?;
    let minutes = args
        .minutes
        .unwrap_or(config.blocking.default_snooze_minutes);
    print_json(&dispatcher.dispatch(Command::Snooze {
        hostname: args.hostname,
        minutes,
    }))
}
