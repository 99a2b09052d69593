//! Parsed torrent descriptors and the parser interface

use std::path::Path;

use async_trait::async_trait;

use super::super::{InfoHash, TorrentError};

/// Complete metadata extracted from a torrent file.
///
/// Produced from a `.torrent` byte buffer and handed to the session
/// unchanged inside `AddTorrentParams`.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentMetadata {
    pub info_hash: InfoHash,
    pub name: String,
    pub piece_length: u32,
    pub piece_hashes: Vec<[u8; 20]>,
    pub total_length: u64,
    pub files: Vec<TorrentFile>,
    pub announce_urls: Vec<String>,
}

/// Individual file within a torrent.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentFile {
    pub path: Vec<String>,
    pub length: u64,
}

/// Magnet link components.
///
/// Carries only what the URI encodes: the info hash plus an optional
/// display name and tracker list. `display_name` is kept percent-encoded
/// as it appeared in the link.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetLink {
    pub info_hash: InfoHash,
    pub display_name: Option<String>,
    pub trackers: Vec<String>,
}

/// Torrent engine parsing entry points.
///
/// Every call is independent; a failure for one input says nothing about
/// any other input.
#[async_trait]
pub trait TorrentParser: Send + Sync {
    /// Parses torrent metadata from raw bencode bytes.
    ///
    /// # Errors
    /// - `TorrentError::InvalidTorrentFile` - Malformed bencode or missing fields
    async fn parse_torrent_data(&self, data: &[u8]) -> Result<TorrentMetadata, TorrentError>;

    /// Reads a `.torrent` file from disk and parses it.
    ///
    /// # Errors
    /// - `TorrentError::Io` - File could not be read
    /// - `TorrentError::InvalidTorrentFile` - Parsing failure
    async fn parse_torrent_file(&self, path: &Path) -> Result<TorrentMetadata, TorrentError>;

    /// Parses a magnet URI.
    ///
    /// # Errors
    /// - `TorrentError::InvalidMagnetLink` - Malformed magnet URI
    /// - `TorrentError::InvalidInfoHash` - Missing or undecodable `btih` topic
    async fn parse_magnet_link(&self, magnet_url: &str) -> Result<MagnetLink, TorrentError>;
}
