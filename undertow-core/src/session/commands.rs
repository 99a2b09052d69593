//! Messages exchanged with the session actor.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::torrent::{AddTorrentParams, InfoHash};

/// Commands that can be sent to the session actor.
///
/// Queries carry a oneshot responder. `AddTorrent` carries none: its
/// outcome is reported later as a `SessionAlert`.
pub enum SessionCommand {
    /// Look up a torrent by info hash.
    FindTorrent {
        info_hash: InfoHash,
        responder: oneshot::Sender<Option<TorrentStatus>>,
    },
    /// Queue a torrent for addition.
    AddTorrent { params: AddTorrentParams },
    /// Snapshot every torrent in the session.
    ListTorrents {
        responder: oneshot::Sender<Vec<TorrentStatus>>,
    },
    /// Stop the actor.
    Shutdown { responder: oneshot::Sender<()> },
}

/// Snapshot of one torrent known to the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorrentStatus {
    pub info_hash: InfoHash,
    pub name: String,
    pub save_path: PathBuf,
    pub url: Option<String>,
    /// False for magnets until the engine has fetched metadata
    pub has_metadata: bool,
    pub total_length: Option<u64>,
    pub added_at: DateTime<Utc>,
}

/// Asynchronous notification about a queued session operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAlert {
    TorrentAdded {
        info_hash: InfoHash,
        name: String,
        save_path: PathBuf,
        added_at: DateTime<Utc>,
    },
    AddTorrentFailed {
        info_hash: InfoHash,
        name: String,
        reason: String,
    },
}

impl SessionAlert {
    pub fn info_hash(&self) -> InfoHash {
        match self {
            SessionAlert::TorrentAdded { info_hash, .. }
            | SessionAlert::AddTorrentFailed { info_hash, .. } => *info_hash,
        }
    }
}
