//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use undertow_core::{Result, UndertowError};
use undertow_core::config::UndertowConfig;
use undertow_core::controller::{AddReport, AddTorrentController, SkipReason};
use undertow_core::dialogs::Dialogs;
use undertow_core::session::{SessionAlert, spawn_session};
use undertow_core::torrent::{BencodeTorrentParser, InfoHash};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Add torrent files and magnet links, in any mix
    Add {
        /// Paths to .torrent files or magnet links
        #[arg(required = true)]
        sources: Vec<String>,
    },
    /// Pick torrent files interactively
    Open,
    /// Add magnet links
    Magnet {
        /// Magnet URIs
        #[arg(required = true)]
        uris: Vec<String>,
    },
}

/// Everything one command produced.
#[derive(Debug, serde::Serialize)]
pub struct CommandOutcome {
    pub report: AddReport,
    /// Session alerts for the submitted torrents
    pub alerts: Vec<SessionAlert>,
}

/// Loads configuration from the environment and applies CLI overrides.
///
/// # Errors
/// - `UndertowError::Configuration` - `--save-path` was given but empty
pub fn load_config(save_path: Option<PathBuf>, skip_confirmation: bool) -> Result<UndertowConfig> {
    let mut config = UndertowConfig::from_env();
    if let Some(save_path) = save_path {
        if save_path.as_os_str().is_empty() {
            return Err(UndertowError::Configuration {
                reason: "--save-path must not be empty".to_string(),
            });
        }
        config.downloads.default_save_path = save_path;
    }
    if skip_confirmation {
        config.ui.show_add_torrent_dialog = false;
    }
    Ok(config)
}

/// Handle the CLI command and print its outcome
///
/// # Errors
/// - `UndertowError::Torrent` - The session stopped mid-run
/// - `UndertowError::Io` - The report could not be written
pub async fn handle_command(command: Commands, config: UndertowConfig, json: bool) -> Result<()> {
    #[cfg(feature = "native-dialogs")]
    let dialogs = crate::native::NativeDialogs::new();
    #[cfg(not(feature = "native-dialogs"))]
    let dialogs = crate::terminal::TerminalDialogs::stdio();

    let outcome = run_command(command, Arc::new(config), dialogs).await?;

    if json {
        let text = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{text}");
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

/// Runs one command against a fresh session and collects its alerts.
///
/// # Errors
/// - `UndertowError::Torrent` - The session stopped mid-run
pub async fn run_command<D: Dialogs>(
    command: Commands,
    config: Arc<UndertowConfig>,
    dialogs: D,
) -> Result<CommandOutcome> {
    let session = spawn_session(&config.session);
    let mut alerts = session.subscribe();
    let mut controller =
        AddTorrentController::new(session.clone(), BencodeTorrentParser::new(), dialogs, config);

    let report = match command {
        Commands::Add { sources } => controller.execute_sources(&sources).await?,
        Commands::Open => controller.execute().await?,
        Commands::Magnet { uris } => controller.execute_magnets(&uris).await?,
    };

    // Shutdown is queued behind every add, so all their alerts are out once it returns.
    session.shutdown().await?;

    Ok(CommandOutcome {
        alerts: drain_alerts(&mut alerts, &report.submitted),
        report,
    })
}

/// Collects the queued alerts that belong to `submitted`.
fn drain_alerts(
    alerts: &mut Receiver<SessionAlert>,
    submitted: &[InfoHash],
) -> Vec<SessionAlert> {
    let mut collected = Vec::new();
    loop {
        match alerts.try_recv() {
            Ok(alert) if submitted.contains(&alert.info_hash()) => collected.push(alert),
            Ok(alert) => tracing::debug!("Ignoring alert for {}", alert.info_hash()),
            Err(TryRecvError::Lagged(missed)) => {
                tracing::warn!("Missed {missed} session alerts");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    collected
}

fn describe_skip(reason: &SkipReason) -> String {
    match reason {
        SkipReason::Unreadable { reason } => format!("cannot read file: {reason}"),
        SkipReason::InvalidTorrent { reason } => reason.clone(),
        SkipReason::InvalidMagnet { reason } => reason.clone(),
        SkipReason::AlreadyInSession { name } => format!("{name} is already in the session"),
        SkipReason::DuplicateInSelection { name } => format!("{name} was selected twice"),
    }
}

fn print_outcome(outcome: &CommandOutcome) {
    for alert in &outcome.alerts {
        match alert {
            SessionAlert::TorrentAdded {
                info_hash,
                name,
                save_path,
                ..
            } => println!("Added {name} ({info_hash})\n  Saving to: {}", save_path.display()),
            SessionAlert::AddTorrentFailed { name, reason, .. } => {
                println!("Failed to add {name}: {reason}");
            }
        }
    }

    for skipped in &outcome.report.skipped {
        println!("Skipped {}: {}", skipped.source, describe_skip(&skipped.reason));
    }

    if outcome.report.cancelled {
        println!("Cancelled, nothing was added.");
    } else if outcome.report.is_empty() && outcome.report.skipped.is_empty() {
        println!("Nothing to add.");
    }
}
