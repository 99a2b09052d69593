//! Session state owned by the actor.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::broadcast;

use super::commands::{SessionAlert, TorrentStatus};
use crate::torrent::{AddTorrentParams, InfoHash, TorrentError, TorrentSource};

/// Registry of torrents in the session.
///
/// Lives inside the actor task and is only touched by one command at a
/// time, so it needs no locking.
pub struct SessionCore {
    torrents: HashMap<InfoHash, TorrentStatus>,
    alerts: broadcast::Sender<SessionAlert>,
}

impl SessionCore {
    pub fn new(alerts: broadcast::Sender<SessionAlert>) -> Self {
        Self {
            torrents: HashMap::new(),
            alerts,
        }
    }

    pub fn find_torrent(&self, info_hash: InfoHash) -> Option<TorrentStatus> {
        self.torrents.get(&info_hash).cloned()
    }

    /// Torrents ordered by the time they were added.
    pub fn torrents(&self) -> Vec<TorrentStatus> {
        let mut torrents: Vec<TorrentStatus> = self.torrents.values().cloned().collect();
        torrents.sort_by(|a, b| a.added_at.cmp(&b.added_at).then(a.name.cmp(&b.name)));
        torrents
    }

    /// Registers a torrent and reports the outcome as an alert.
    pub fn add_torrent(&mut self, params: AddTorrentParams) {
        let info_hash = params.info_hash();
        let name = params.name();

        let alert = match self.register(params) {
            Ok(status) => {
                tracing::info!("Added torrent {} ({})", status.name, info_hash);
                SessionAlert::TorrentAdded {
                    info_hash,
                    name,
                    save_path: status.save_path,
                    added_at: status.added_at,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to add torrent {name} ({info_hash}): {e}");
                SessionAlert::AddTorrentFailed {
                    info_hash,
                    name,
                    reason: e.to_string(),
                }
            }
        };

        // No subscribers is fine; alerts are advisory.
        let _ = self.alerts.send(alert);
    }

    fn register(&mut self, params: AddTorrentParams) -> Result<TorrentStatus, TorrentError> {
        let info_hash = params.info_hash();

        if self.torrents.contains_key(&info_hash) {
            return Err(TorrentError::DuplicateTorrent { info_hash });
        }

        if params.save_path.as_os_str().is_empty() {
            return Err(TorrentError::InvalidSavePath {
                reason: "save path is empty".to_string(),
            });
        }

        let total_length = match &params.source {
            TorrentSource::Metadata(metadata) => Some(metadata.total_length),
            TorrentSource::Magnet(_) => None,
        };

        let status = TorrentStatus {
            info_hash,
            name: params.name(),
            has_metadata: params.has_metadata(),
            save_path: params.save_path,
            url: params.url,
            total_length,
            added_at: Utc::now(),
        };

        self.torrents.insert(info_hash, status.clone());
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::torrent::MagnetLink;

    fn magnet_params(byte: u8, save_path: &str) -> AddTorrentParams {
        AddTorrentParams::from_magnet(
            MagnetLink {
                info_hash: InfoHash::new([byte; 20]),
                display_name: Some(format!("torrent-{byte}")),
                trackers: vec![],
            },
            "magnet:?xt=urn:btih:test",
            PathBuf::from(save_path),
        )
    }

    #[test]
    fn test_add_then_find() {
        let (alerts, mut receiver) = broadcast::channel(8);
        let mut core = SessionCore::new(alerts);

        core.add_torrent(magnet_params(1, "/downloads"));

        let status = core.find_torrent(InfoHash::new([1u8; 20])).unwrap();
        assert_eq!(status.name, "torrent-1");
        assert!(!status.has_metadata);
        assert_eq!(status.total_length, None);
        assert!(matches!(
            receiver.try_recv().unwrap(),
            SessionAlert::TorrentAdded { .. }
        ));
    }

    #[test]
    fn test_duplicate_add_reports_failure_and_keeps_original() {
        let (alerts, mut receiver) = broadcast::channel(8);
        let mut core = SessionCore::new(alerts);

        core.add_torrent(magnet_params(1, "/first"));
        core.add_torrent(magnet_params(1, "/second"));

        let _added = receiver.try_recv().unwrap();
        match receiver.try_recv().unwrap() {
            SessionAlert::AddTorrentFailed { reason, .. } => {
                assert!(reason.contains("already in session"));
            }
            other => panic!("expected failure alert, got {other:?}"),
        }

        let status = core.find_torrent(InfoHash::new([1u8; 20])).unwrap();
        assert_eq!(status.save_path, PathBuf::from("/first"));
        assert_eq!(core.torrents().len(), 1);
    }

    #[test]
    fn test_empty_save_path_is_rejected() {
        let (alerts, mut receiver) = broadcast::channel(8);
        let mut core = SessionCore::new(alerts);

        core.add_torrent(magnet_params(2, ""));

        assert!(core.torrents().is_empty());
        assert!(matches!(
            receiver.try_recv().unwrap(),
            SessionAlert::AddTorrentFailed { .. }
        ));
    }
}
