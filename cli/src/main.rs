mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, check, find, info};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();
    logging::init(commands.verbose, commands.quiet);

    let cfg = commands.config();

    match commands.command {
        Commands::Find { saved, .. } => {
            print::header("getting ready for discovery", cfg.quiet);
            find::find(&cfg, saved.as_deref()).await
        }
        Commands::Check { url, .. } => check::check(&url, &cfg).await,
        Commands::Info => {
            info::info(&cfg);
            Ok(ExitCode::SUCCESS)
        }
    }
}
