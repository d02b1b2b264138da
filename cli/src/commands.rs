pub mod check;
pub mod find;
pub mod info;

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use lanseek_common::config::{Config, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "lanseek")]
#[command(about = "Find a service on the local network by its port.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output, repeat for even less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// More log output, repeat for trace level
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find a service listening on a port
    #[command(alias = "f")]
    Find {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Per-probe timeout in milliseconds
        #[arg(short, long, value_name = "MS")]
        timeout: Option<u64>,
        /// Hosts probed concurrently
        #[arg(short, long)]
        batch_width: Option<usize>,
        /// Previously found URL, tried before scanning
        #[arg(short, long, value_name = "URL")]
        saved: Option<String>,
        /// Fetch the page title and server banner of the find
        #[arg(short, long)]
        metadata: bool,
    },
    /// Check whether a saved address is still online
    #[command(alias = "c")]
    Check {
        url: String,
        #[arg(short, long)]
        metadata: bool,
    },
    /// Show the interface and settings a scan would use
    #[command(alias = "i")]
    Info,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config {
            quiet: self.quiet,
            ..Config::default()
        };

        match &self.command {
            Commands::Find {
                port,
                timeout,
                batch_width,
                metadata,
                ..
            } => {
                cfg.port = *port;
                cfg.probe_timeout = timeout.map(Duration::from_millis);
                cfg.batch_width = *batch_width;
                cfg.metadata = *metadata;
            }
            Commands::Check { metadata, .. } => cfg.metadata = *metadata,
            Commands::Info => {}
        }
        cfg
    }
}
