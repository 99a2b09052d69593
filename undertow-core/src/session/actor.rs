//! Actor implementation for the torrent session.

use tokio::sync::{broadcast, mpsc};

use super::commands::SessionCommand;
use super::core::SessionCore;
use super::handle::SessionHandle;
use crate::config::SessionConfig;

/// Spawns the session actor and returns its handle.
///
/// The actor processes commands one at a time in arrival order, so an add
/// queued before a lookup is always visible to that lookup.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// use undertow_core::config::SessionConfig;
/// use undertow_core::session::spawn_session;
///
/// let handle = spawn_session(&SessionConfig::default());
/// handle.shutdown().await.unwrap();
/// # }
/// ```
pub fn spawn_session(config: &SessionConfig) -> SessionHandle {
    let (sender, receiver) = mpsc::channel(config.command_queue_size.max(1));
    let (alerts, _) = broadcast::channel(config.alert_queue_size.max(1));
    let core = SessionCore::new(alerts.clone());

    tokio::spawn(async move {
        run_actor_loop(core, receiver).await;
    });

    SessionHandle::new(sender, alerts)
}

async fn run_actor_loop(mut core: SessionCore, mut receiver: mpsc::Receiver<SessionCommand>) {
    tracing::debug!("Torrent session actor started");

    while let Some(command) = receiver.recv().await {
        if !handle_command(&mut core, command) {
            break;
        }
    }

    tracing::debug!("Torrent session actor stopped");
}

/// Handles a single command. Returns false to stop the actor.
fn handle_command(core: &mut SessionCore, command: SessionCommand) -> bool {
    match command {
        SessionCommand::FindTorrent {
            info_hash,
            responder,
        } => {
            let _ = responder.send(core.find_torrent(info_hash));
        }

        SessionCommand::AddTorrent { params } => {
            core.add_torrent(params);
        }

        SessionCommand::ListTorrents { responder } => {
            let _ = responder.send(core.torrents());
        }

        SessionCommand::Shutdown { responder } => {
            tracing::debug!("Torrent session actor shutting down");
            let _ = responder.send(());
            return false;
        }
    }
    true
}
