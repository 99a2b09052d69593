//! Torrent session: duplicate lookup and asynchronous add.
//!
//! The session is the engine instance that owns active downloads. The add
//! flow only needs two things from it, captured by `TorrentSession`.

pub mod actor;
pub mod commands;
pub mod core;
pub mod handle;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks;

use async_trait::async_trait;

pub use actor::spawn_session;
pub use commands::{SessionAlert, SessionCommand, TorrentStatus};
pub use handle::SessionHandle;
#[cfg(any(test, feature = "test-utils"))]
pub use test_mocks::RecordingSession;

use crate::torrent::{AddTorrentParams, InfoHash, TorrentError};

/// Session operations used by the add flow.
#[async_trait]
pub trait TorrentSession: Send + Sync {
    /// Looks up a torrent already in the session.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session is no longer running
    async fn find_torrent(&self, info_hash: InfoHash)
    -> Result<Option<TorrentStatus>, TorrentError>;

    /// Queues a torrent for addition and returns without waiting for it.
    ///
    /// The outcome is reported through session alerts, not through the
    /// return value.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session is no longer running
    async fn add_torrent_async(&self, params: AddTorrentParams) -> Result<(), TorrentError>;
}
