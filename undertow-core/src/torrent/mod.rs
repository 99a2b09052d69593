//! Torrent identity, add parameters and engine parsing entry points

pub mod params;
pub mod parsing;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_data;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub use params::{AddTorrentParams, TorrentSource};
pub use parsing::{BencodeTorrentParser, MagnetLink, TorrentFile, TorrentMetadata, TorrentParser};

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 hash of the info dictionary from a torrent file.
/// Used as the duplicate key when adding torrents to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Parses the 40-character hexadecimal form.
    ///
    /// # Errors
    /// - `TorrentError::InvalidInfoHash` - Wrong length or non-hex characters
    pub fn from_hex(text: &str) -> Result<Self, TorrentError> {
        if text.len() != 40 {
            return Err(TorrentError::InvalidInfoHash {
                reason: format!("Invalid hash length: {} (expected 40)", text.len()),
            });
        }

        let mut hash = [0u8; 20];
        hex::decode_to_slice(text, &mut hash).map_err(|e| TorrentError::InvalidInfoHash {
            reason: format!("Invalid hex character in hash {text}: {e}"),
        })?;
        Ok(Self(hash))
    }

    /// Parses the 32-character base32 form used by older magnet links.
    ///
    /// # Errors
    /// - `TorrentError::InvalidInfoHash` - Wrong length or invalid base32
    pub fn from_base32(text: &str) -> Result<Self, TorrentError> {
        if text.len() != 32 {
            return Err(TorrentError::InvalidInfoHash {
                reason: format!("Invalid hash length: {} (expected 32)", text.len()),
            });
        }

        let decoded = data_encoding::BASE32
            .decode(text.to_ascii_uppercase().as_bytes())
            .map_err(|e| TorrentError::InvalidInfoHash {
                reason: format!("Invalid base32 hash {text}: {e}"),
            })?;

        let hash: [u8; 20] = decoded
            .try_into()
            .map_err(|_| TorrentError::InvalidInfoHash {
                reason: format!("Base32 hash {text} does not decode to 20 bytes"),
            })?;
        Ok(Self(hash))
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for InfoHash {
    type Err = TorrentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            32 => Self::from_base32(s),
            _ => Self::from_hex(s),
        }
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors that can occur while parsing or submitting torrents.
#[derive(Debug, thiserror::Error)]
pub enum TorrentError {
    #[error("Failed to parse torrent file: {reason}")]
    InvalidTorrentFile { reason: String },

    #[error("Invalid magnet link: {reason}")]
    InvalidMagnetLink { reason: String },

    #[error("Invalid info hash: {reason}")]
    InvalidInfoHash { reason: String },

    #[error("Torrent {info_hash} already in session")]
    DuplicateTorrent { info_hash: InfoHash },

    #[error("Invalid save path: {reason}")]
    InvalidSavePath { reason: String },

    #[error("Torrent session has shut down")]
    SessionShutdown,

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_info_hash_display() {
        let hash = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab,
            0xcd, 0xef, 0x01, 0x23, 0x45, 0x67,
        ];
        let info_hash = InfoHash::new(hash);
        assert_eq!(
            info_hash.to_string(),
            "0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn test_info_hash_accepts_uppercase_hex() {
        let info_hash: InfoHash = "0123456789ABCDEF0123456789ABCDEF01234567".parse().unwrap();
        assert_eq!(
            info_hash.to_string(),
            "0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn test_info_hash_rejects_bad_input() {
        assert!(InfoHash::from_hex("tooshort").is_err());
        assert!(InfoHash::from_hex("zz23456789abcdef0123456789abcdef01234567").is_err());
        assert!(InfoHash::from_base32("1111111111111111111111111111111!").is_err());
    }

    #[test]
    fn test_info_hash_serializes_as_hex() {
        let info_hash = InfoHash::new([0xab; 20]);
        let json = serde_json::to_string(&info_hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(20)));
    }

    proptest! {
        #[test]
        fn test_base32_and_hex_forms_agree(bytes in proptest::array::uniform20(any::<u8>())) {
            let info_hash = InfoHash::new(bytes);
            let base32 = data_encoding::BASE32.encode(&bytes);

            prop_assert_eq!(InfoHash::from_base32(&base32.to_lowercase()).unwrap(), info_hash);
            prop_assert_eq!(info_hash.to_string().parse::<InfoHash>().unwrap(), info_hash);
        }
    }
}
