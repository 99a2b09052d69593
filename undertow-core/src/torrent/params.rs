//! Per-torrent add parameters handed to the session

use std::path::PathBuf;
use std::sync::Arc;

use super::{InfoHash, MagnetLink, TorrentMetadata};

/// Where the session gets the torrent's identity from.
#[derive(Debug, Clone, PartialEq)]
pub enum TorrentSource {
    /// Full metadata parsed from a `.torrent` file.
    Metadata(Arc<TorrentMetadata>),
    /// A magnet link; metadata still has to be fetched by the engine.
    Magnet(MagnetLink),
}

/// Parameters for a single session add.
///
/// Built when a selection is processed and consumed by exactly one
/// `add_torrent_async` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTorrentParams {
    pub save_path: PathBuf,
    pub source: TorrentSource,
    /// Original magnet URI, if the torrent came from one.
    pub url: Option<String>,
}

impl AddTorrentParams {
    /// Parameters for a parsed `.torrent` file.
    pub fn from_metadata(metadata: TorrentMetadata, save_path: PathBuf) -> Self {
        Self {
            save_path,
            source: TorrentSource::Metadata(Arc::new(metadata)),
            url: None,
        }
    }

    /// Parameters for a magnet link, remembering the link it came from.
    pub fn from_magnet(magnet: MagnetLink, url: impl Into<String>, save_path: PathBuf) -> Self {
        Self {
            save_path,
            source: TorrentSource::Magnet(magnet),
            url: Some(url.into()),
        }
    }

    pub fn info_hash(&self) -> InfoHash {
        match &self.source {
            TorrentSource::Metadata(metadata) => metadata.info_hash,
            TorrentSource::Magnet(magnet) => magnet.info_hash,
        }
    }

    /// Human-readable torrent name.
    ///
    /// Magnet display names are percent-decoded with `+` read as a space.
    /// A magnet without one falls back to `Torrent_` plus the leading 16
    /// hex digits of its info hash.
    pub fn name(&self) -> String {
        match &self.source {
            TorrentSource::Metadata(metadata) => metadata.name.clone(),
            TorrentSource::Magnet(magnet) => match &magnet.display_name {
                Some(display_name) => {
                    let spaced = display_name.replace('+', " ");
                    urlencoding::decode(&spaced)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or(spaced)
                }
                None => format!("Torrent_{}", &magnet.info_hash.to_string()[..16]),
            },
        }
    }

    /// True when the session already has full metadata for this torrent.
    pub fn has_metadata(&self) -> bool {
        matches!(self.source, TorrentSource::Metadata(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnet(display_name: Option<&str>) -> MagnetLink {
        MagnetLink {
            info_hash: "fedcba9876543210fedcba9876543210fedcba98".parse().unwrap(),
            display_name: display_name.map(str::to_string),
            trackers: vec![],
        }
    }

    #[test]
    fn test_magnet_name_is_decoded() {
        let params = AddTorrentParams::from_magnet(
            magnet(Some("Wallace+And+Gromit%3A+Vengeance")),
            "magnet:?xt=urn:btih:fedcba9876543210fedcba9876543210fedcba98",
            PathBuf::from("/downloads"),
        );

        assert_eq!(params.name(), "Wallace And Gromit: Vengeance");
        assert!(!params.has_metadata());
        assert!(params.url.is_some());
    }

    #[test]
    fn test_magnet_name_fallback_uses_hash_prefix() {
        let params = AddTorrentParams::from_magnet(magnet(None), "magnet:?", PathBuf::new());
        assert_eq!(params.name(), "Torrent_fedcba9876543210");
    }

    #[test]
    fn test_metadata_params_have_no_url() {
        let metadata = TorrentMetadata {
            info_hash: InfoHash::new([7u8; 20]),
            name: "debian.iso".to_string(),
            piece_length: 16384,
            piece_hashes: vec![[0u8; 20]],
            total_length: 100,
            files: vec![],
            announce_urls: vec![],
        };
        let params = AddTorrentParams::from_metadata(metadata, PathBuf::from("/downloads"));

        assert_eq!(params.info_hash(), InfoHash::new([7u8; 20]));
        assert_eq!(params.name(), "debian.iso");
        assert_eq!(params.url, None);
        assert!(params.has_metadata());
    }
}
