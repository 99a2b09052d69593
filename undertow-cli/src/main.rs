//! Undertow CLI - add torrents from the command line
//!
//! Parses torrent files and magnet links, asks for confirmation, and queues
//! them on an in-process session.

mod commands;
#[cfg(feature = "native-dialogs")]
mod native;
#[cfg(any(test, not(feature = "native-dialogs")))]
mod terminal;

use std::path::PathBuf;

use clap::Parser;
use undertow_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "undertow")]
#[command(about = "Add torrent files and magnet links to a download session")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Download directory for every added torrent
    #[arg(long, global = true)]
    save_path: Option<PathBuf>,

    /// Add without asking for confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full trace log of this run
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = match commands::load_config(cli.save_path, cli.yes) {
        Ok(config) => commands::handle_command(cli.command, config, cli.json).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        anyhow::bail!(e.user_message());
    }

    Ok(())
}
