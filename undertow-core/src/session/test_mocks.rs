//! Mock session for testing the add flow.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{TorrentSession, TorrentStatus};
use crate::torrent::{AddTorrentParams, InfoHash, TorrentError};

#[derive(Debug, Default)]
struct Recorded {
    existing: Vec<TorrentStatus>,
    lookups: Vec<InfoHash>,
    submitted: Vec<AddTorrentParams>,
}

/// Session that records every call and never adds anything for real.
///
/// Submitted torrents do not become visible to `find_torrent`; seed
/// existing torrents with `with_existing`.
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    inner: Arc<Mutex<Recorded>>,
    shut_down: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose every call fails with `SessionShutdown`.
    pub fn new_shut_down() -> Self {
        Self {
            shut_down: true,
            ..Self::default()
        }
    }

    /// Pretends `info_hash` is already downloading under `name`.
    pub fn with_existing(self, info_hash: InfoHash, name: &str) -> Self {
        self.inner.lock().existing.push(TorrentStatus {
            info_hash,
            name: name.to_string(),
            save_path: std::env::temp_dir(),
            url: None,
            has_metadata: true,
            total_length: None,
            added_at: Utc::now(),
        });
        self
    }

    pub fn submitted(&self) -> Vec<AddTorrentParams> {
        self.inner.lock().submitted.clone()
    }

    pub fn lookups(&self) -> Vec<InfoHash> {
        self.inner.lock().lookups.clone()
    }

    /// Total number of calls of any kind.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.lookups.len() + inner.submitted.len()
    }
}

#[async_trait]
impl TorrentSession for RecordingSession {
    async fn find_torrent(
        &self,
        info_hash: InfoHash,
    ) -> Result<Option<TorrentStatus>, TorrentError> {
        if self.shut_down {
            return Err(TorrentError::SessionShutdown);
        }

        let mut inner = self.inner.lock();
        inner.lookups.push(info_hash);
        Ok(inner
            .existing
            .iter()
            .find(|status| status.info_hash == info_hash)
            .cloned())
    }

    async fn add_torrent_async(&self, params: AddTorrentParams) -> Result<(), TorrentError> {
        if self.shut_down {
            return Err(TorrentError::SessionShutdown);
        }

        self.inner.lock().submitted.push(params);
        Ok(())
    }
}
