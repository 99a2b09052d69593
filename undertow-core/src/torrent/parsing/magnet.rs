//! Magnet URI handling on top of magnet-url

use std::borrow::Cow;

use super::types::MagnetLink;
use crate::torrent::{InfoHash, TorrentError};

const SCHEME: &str = "magnet:";
const BTIH_PREFIX: &str = "urn:btih:";

/// Magnet link parsing utilities.
pub struct MagnetParser;

impl MagnetParser {
    /// Parses magnet link to extract torrent information.
    ///
    /// # Errors
    /// - `TorrentError::InvalidMagnetLink` - Malformed magnet URI or no `btih` topic
    /// - `TorrentError::InvalidInfoHash` - Topic hash is neither hex nor base32
    pub fn parse_magnet_link(magnet_url: &str) -> Result<MagnetLink, TorrentError> {
        let normalized = Self::normalize_scheme(magnet_url);
        let magnet =
            magnet_url::Magnet::new(&normalized).map_err(|e| TorrentError::InvalidMagnetLink {
                reason: format!("{e:?}"),
            })?;

        let hash = Self::btih_topic(&normalized).ok_or_else(|| TorrentError::InvalidMagnetLink {
            reason: format!("Missing or invalid info hash in magnet link: {magnet_url}"),
        })?;

        let info_hash: InfoHash = hash.parse()?;

        Ok(MagnetLink {
            info_hash,
            display_name: magnet.display_name().map(|s| s.to_string()),
            trackers: magnet.trackers().to_vec(),
        })
    }

    /// magnet-url only accepts a lowercase scheme.
    fn normalize_scheme(uri: &str) -> Cow<'_, str> {
        match uri.get(..SCHEME.len()) {
            Some(scheme) if scheme != SCHEME && scheme.eq_ignore_ascii_case(SCHEME) => {
                Cow::Owned(format!("{SCHEME}{}", &uri[SCHEME.len()..]))
            }
            _ => Cow::Borrowed(uri),
        }
    }

    /// Hash of the first `urn:btih:` exact topic.
    ///
    /// Hybrid links also carry a `urn:btmh:` topic, in either order, so every
    /// `xt` (and `xt.N`) parameter is checked.
    fn btih_topic(uri: &str) -> Option<String> {
        let (_, query) = uri.split_once('?')?;

        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == "xt" || key.starts_with("xt."))
            .find_map(|(_, value)| {
                let topic = urlencoding::decode(value).ok()?;
                let prefix = topic.get(..BTIH_PREFIX.len())?;
                prefix
                    .eq_ignore_ascii_case(BTIH_PREFIX)
                    .then(|| topic[BTIH_PREFIX.len()..].to_string())
            })
    }
}
