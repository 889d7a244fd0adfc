use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cyberscan")]
#[command(about = "Model-generated threat reports for URLs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Show informational logs")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Show debug logs")]
    pub debug: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Config file (default: ./cyberscan.toml, ./config/cyberscan.toml, user config dir)"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan one or more URLs
    Scan {
        #[arg(required = true, help = "Targets to scan, e.g. https://example.com")]
        urls: Vec<String>,

        #[arg(long, help = "Print raw JSON instead of the report")]
        json: bool,
    },
    /// List the simulated scan engines
    Engines,
}
