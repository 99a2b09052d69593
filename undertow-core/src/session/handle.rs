//! Handle for communicating with the session actor.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::TorrentSession;
use super::commands::{SessionAlert, SessionCommand, TorrentStatus};
use crate::torrent::{AddTorrentParams, InfoHash, TorrentError};

/// Cloneable handle to a running session actor.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
    alerts: broadcast::Sender<SessionAlert>,
}

impl SessionHandle {
    /// Creates a new handle with the given command sender and alert channel.
    pub fn new(
        sender: mpsc::Sender<SessionCommand>,
        alerts: broadcast::Sender<SessionAlert>,
    ) -> Self {
        Self { sender, alerts }
    }

    /// Subscribes to alerts emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionAlert> {
        self.alerts.subscribe()
    }

    /// Gets every torrent currently in the session.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Actor is no longer running
    pub async fn torrents(&self) -> Result<Vec<TorrentStatus>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.send(SessionCommand::ListTorrents { responder }).await?;

        rx.await.map_err(|_| TorrentError::SessionShutdown)
    }

    /// Shuts down the session actor gracefully.
    ///
    /// Commands queued before the shutdown are still processed.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Actor was already gone
    pub async fn shutdown(&self) -> Result<(), TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.send(SessionCommand::Shutdown { responder }).await?;

        rx.await.map_err(|_| TorrentError::SessionShutdown)
    }

    /// Checks if the session actor is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send(&self, command: SessionCommand) -> Result<(), TorrentError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| TorrentError::SessionShutdown)
    }
}

#[async_trait]
impl TorrentSession for SessionHandle {
    async fn find_torrent(
        &self,
        info_hash: InfoHash,
    ) -> Result<Option<TorrentStatus>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.send(SessionCommand::FindTorrent {
            info_hash,
            responder,
        })
        .await?;

        rx.await.map_err(|_| TorrentError::SessionShutdown)
    }

    async fn add_torrent_async(&self, params: AddTorrentParams) -> Result<(), TorrentError> {
        self.send(SessionCommand::AddTorrent { params }).await
    }
}
