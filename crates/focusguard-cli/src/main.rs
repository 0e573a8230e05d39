use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "focusguard", version, about = "FocusGuard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Stored timer settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Blocked-domain management
    Blocklist {
        #[command(subcommand)]
        action: commands::blocklist::BlocklistAction,
    },
    /// Evaluate the blocking gate for a navigation event
    Navigate(commands::navigate::NavigateArgs),
    /// Temporarily exempt a hostname from blocking
    Snooze(commands::navigate::SnoozeArgs),
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("focusguard_core=info,focusguard_cli=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Blocklist { action } => commands::blocklist::run(action),
        Commands::Navigate(args) => commands::navigate::run_navigate(args),
        Commands::Snooze(args) => commands::navigate::run_snooze(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "focusguard", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
