// CLI-specific lint overrides
#![allow(clippy::print_stdout, reason = "CLI tools print to stdout")]
#![allow(clippy::print_stderr, reason = "CLI tools print to stderr")]
#![allow(clippy::unwrap_used, reason = "CLI can unwrap for user-facing errors")]
#![allow(clippy::expect_used, reason = "CLI can expect for user-facing errors")]

mod cli;
mod commands;
mod output;
mod wallet;

use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_filter)?)
        .with_writer(std::io::stderr)
        .init();

    let settings = commands::load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Predict(args) => commands::predict::run(args, settings, cli.json).await,
        Commands::Deploy(args) => commands::deploy::run(args, settings, cli.json).await,
        Commands::Decode(args) => commands::decode::run(args, settings, cli.json).await,
        Commands::Clone(args) => commands::clone::run(args, settings, cli.json).await,
    }
}
