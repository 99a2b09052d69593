//! Torrent metadata extraction from bencode-rs values and info hash calculation

use std::collections::HashSet;

use sha1::{Digest, Sha1};

use super::types::{TorrentFile, TorrentMetadata};
use crate::torrent::{InfoHash, TorrentError};

// Type aliases for complex bencode types
pub(super) type BencodeDict<'a> = std::collections::HashMap<&'a [u8], bencode_rs::Value<'a>>;
pub(super) type ParseResult<T> = Result<T, TorrentError>;
pub(super) type BytesResult<'a> = Result<&'a [u8], TorrentError>;
pub(super) type FilesResult = ParseResult<(Vec<TorrentFile>, u64)>;

fn invalid(reason: impl Into<String>) -> TorrentError {
    TorrentError::InvalidTorrentFile {
        reason: reason.into(),
    }
}

/// Bencode-backed torrent metadata extraction.
pub struct BencodeParser;

impl BencodeParser {
    /// Decodes a `.torrent` buffer and extracts its metadata.
    ///
    /// # Errors
    ///
    /// - `TorrentError::InvalidTorrentFile` - If bencode decoding or metadata extraction failed
    pub fn parse_bencode_data(torrent_bytes: &[u8]) -> Result<TorrentMetadata, TorrentError> {
        let parsed = bencode_rs::Value::parse(torrent_bytes)
            .map_err(|e| invalid(format!("Bencode parsing failed: {e:?}")))?;

        let Some(root) = parsed.first() else {
            return Err(invalid("Empty bencode data"));
        };

        if let bencode_rs::Value::Dictionary(dict) = root {
            Self::extract_metadata_from_dict(dict, torrent_bytes)
        } else {
            Err(invalid("Root element must be dictionary"))
        }
    }

    fn extract_metadata_from_dict(
        dict: &BencodeDict<'_>,
        original_data: &[u8],
    ) -> ParseResult<TorrentMetadata> {
        let info_value = dict
            .get(b"info".as_slice())
            .ok_or_else(|| invalid("Missing 'info' field"))?;

        let bencode_rs::Value::Dictionary(info_dict) = info_value else {
            return Err(invalid("Info field must be dictionary"));
        };

        let info_hash = Self::calculate_info_hash(original_data)?;

        let name = Self::extract_bytes_as_string(info_dict, b"name")?;
        let piece_length = u32::try_from(Self::extract_integer(info_dict, b"piece length")?)
            .ok()
            .filter(|length| *length > 0)
            .ok_or_else(|| invalid("Invalid piece length"))?;

        let pieces_bytes = Self::extract_bytes(info_dict, b"pieces")?;
        if !pieces_bytes.len().is_multiple_of(20) {
            return Err(invalid("Invalid pieces length"));
        }

        let piece_hashes: Vec<[u8; 20]> = pieces_bytes
            .chunks_exact(20)
            .map(|chunk| {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(chunk);
                hash
            })
            .collect();

        let (files, total_length) = if let Ok(length) = Self::extract_integer(info_dict, b"length")
        {
            let length = Self::non_negative(length)?;
            let files = vec![TorrentFile {
                path: vec![name.clone()],
                length,
            }];
            (files, length)
        } else {
            match info_dict.get(b"files".as_slice()) {
                Some(bencode_rs::Value::List(files_list)) => Self::extract_files_info(files_list)?,
                Some(_) => return Err(invalid("Invalid files structure")),
                None => return Err(invalid("Missing 'files' or 'length' field")),
            }
        };

        if total_length == 0 {
            return Err(invalid("Torrent has no content"));
        }
        let expected_pieces = total_length.div_ceil(u64::from(piece_length));
        if piece_hashes.len() as u64 != expected_pieces {
            return Err(invalid(format!(
                "Piece count mismatch: {} hashes for {expected_pieces} pieces",
                piece_hashes.len()
            )));
        }

        let announce_urls = Self::extract_announce_urls(dict);

        Ok(TorrentMetadata {
            info_hash,
            name,
            piece_length,
            piece_hashes,
            total_length,
            files,
            announce_urls,
        })
    }

    /// SHA-1 over the exact bytes of the top-level `info` value.
    fn calculate_info_hash(original_data: &[u8]) -> Result<InfoHash, TorrentError> {
        let info_bytes = Self::find_info_span(original_data)?;

        let mut hasher = Sha1::new();
        hasher.update(info_bytes);
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&hasher.finalize());

        Ok(InfoHash::new(hash))
    }

    /// Walks the root dictionary key by key and returns the raw `info` value.
    ///
    /// Only top-level keys are compared, so an `info` string nested in some
    /// other value cannot be mistaken for the real one. Repeated top-level
    /// keys are rejected: the decoded dictionary keeps only one of them.
    fn find_info_span(data: &[u8]) -> BytesResult<'_> {
        if data.first() != Some(&b'd') {
            return Err(invalid("Expected dictionary start"));
        }

        let mut seen = HashSet::new();
        let mut info = None;
        let mut pos = 1;
        loop {
            match data.get(pos) {
                Some(b'e') => break,
                Some(byte) if byte.is_ascii_digit() => {}
                Some(_) => return Err(invalid("Dictionary key must be a string")),
                None => return Err(invalid("Incomplete bencode value")),
            }

            let key_end = Self::find_value_end(data, pos)?;
            let key = Self::string_payload(&data[pos..key_end])?;
            let value_end = Self::find_value_end(data, key_end)?;

            if !seen.insert(key) {
                return Err(invalid(format!(
                    "Duplicate dictionary key: {:?}",
                    String::from_utf8_lossy(key)
                )));
            }
            if key == b"info" {
                info = Some(&data[key_end..value_end]);
            }
            pos = value_end;
        }

        info.ok_or_else(|| invalid("Could not find info dictionary in data"))
    }

    /// Returns the payload of an encoded byte string such as `4:info`.
    fn string_payload(encoded: &[u8]) -> BytesResult<'_> {
        let colon = encoded
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| invalid("Dictionary key must be a string"))?;
        Ok(&encoded[colon + 1..])
    }

    /// Returns the offset one past the value starting at `start`.
    fn find_value_end(data: &[u8], start: usize) -> Result<usize, TorrentError> {
        let mut pos = start;
        let mut depth = 0usize;

        loop {
            let Some(&byte) = data.get(pos) else {
                return Err(invalid("Incomplete bencode value"));
            };

            match byte {
                b'd' | b'l' => {
                    depth += 1;
                    pos += 1;
                }
                b'e' if depth > 0 => {
                    depth -= 1;
                    pos += 1;
                }
                b'i' => {
                    let end = data[pos..]
                        .iter()
                        .position(|b| *b == b'e')
                        .ok_or_else(|| invalid("Unterminated integer"))?;
                    pos += end + 1;
                }
                b'0'..=b'9' => {
                    let colon = data[pos..]
                        .iter()
                        .position(|b| *b == b':')
                        .ok_or_else(|| invalid("Invalid string format"))?;
                    let length: usize = std::str::from_utf8(&data[pos..pos + colon])
                        .ok()
                        .and_then(|digits| digits.parse().ok())
                        .ok_or_else(|| invalid("Invalid string length"))?;

                    pos += colon + 1 + length;
                    if pos > data.len() {
                        return Err(invalid("String runs past end of data"));
                    }
                }
                _ => return Err(invalid("Invalid bencode character")),
            }

            if depth == 0 {
                return Ok(pos);
            }
        }
    }

    fn extract_bytes_as_string(dict: &BencodeDict<'_>, key: &[u8]) -> ParseResult<String> {
        let bytes = Self::extract_bytes(dict, key)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            invalid(format!(
                "Invalid UTF-8 in field: {:?}",
                String::from_utf8_lossy(key)
            ))
        })
    }

    fn extract_bytes<'a>(dict: &'a BencodeDict<'_>, key: &[u8]) -> BytesResult<'a> {
        match dict.get(key) {
            Some(bencode_rs::Value::Bytes(bytes)) => Ok(bytes),
            _ => Err(invalid(format!(
                "Missing or invalid field: {:?}",
                String::from_utf8_lossy(key)
            ))),
        }
    }

    fn extract_integer(dict: &BencodeDict<'_>, key: &[u8]) -> ParseResult<i64> {
        match dict.get(key) {
            Some(bencode_rs::Value::Integer(value)) => Ok(*value),
            _ => Err(invalid(format!(
                "Missing or invalid integer field: {:?}",
                String::from_utf8_lossy(key)
            ))),
        }
    }

    fn non_negative(value: i64) -> ParseResult<u64> {
        u64::try_from(value).map_err(|_| invalid(format!("Negative file length: {value}")))
    }

    fn extract_files_info(files_list: &[bencode_rs::Value<'_>]) -> FilesResult {
        let mut files = Vec::with_capacity(files_list.len());
        let mut total_length = 0u64;

        for file_value in files_list {
            let bencode_rs::Value::Dictionary(file_dict) = file_value else {
                return Err(invalid("Invalid file entry type"));
            };

            let length = Self::non_negative(Self::extract_integer(file_dict, b"length")?)?;
            total_length += length;

            let Some(bencode_rs::Value::List(path_list)) = file_dict.get(b"path".as_slice())
            else {
                return Err(invalid("Missing or invalid path in file"));
            };

            let path = path_list
                .iter()
                .map(|component| match component {
                    bencode_rs::Value::Bytes(bytes) => String::from_utf8(bytes.to_vec())
                        .map_err(|_| invalid("Invalid UTF-8 in file path")),
                    _ => Err(invalid("Invalid path component type")),
                })
                .collect::<ParseResult<Vec<String>>>()?;

            files.push(TorrentFile { path, length });
        }

        Ok((files, total_length))
    }

    /// Collects `announce` followed by every `announce-list` tier, without repeats.
    fn extract_announce_urls(dict: &BencodeDict<'_>) -> Vec<String> {
        let mut announce_urls = Vec::new();

        if let Ok(announce) = Self::extract_bytes_as_string(dict, b"announce") {
            announce_urls.push(announce);
        }

        if let Some(bencode_rs::Value::List(announce_list)) = dict.get(b"announce-list".as_slice())
        {
            for tier in announce_list {
                let bencode_rs::Value::List(tier_urls) = tier else {
                    continue;
                };
                for url_value in tier_urls {
                    if let bencode_rs::Value::Bytes(url_bytes) = url_value {
                        if let Ok(url) = String::from_utf8(url_bytes.to_vec()) {
                            if !announce_urls.contains(&url) {
                                announce_urls.push(url);
                            }
                        }
                    }
                }
            }
        }

        announce_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_root_is_rejected() {
        assert!(BencodeParser::find_info_span(b"d4:infod4:name4:te").is_err());
        assert!(BencodeParser::find_info_span(b"d4:sizei10").is_err());
        assert!(BencodeParser::find_info_span(b"d4:infod4:name1:xe").is_err());
        assert!(BencodeParser::find_info_span(b"l4:teste").is_err());
    }

    #[test]
    fn test_repeated_top_level_key_is_rejected() {
        let data = b"d4:infod4:name1:xe4:infod4:name1:yee";
        let err = BencodeParser::find_info_span(data).unwrap_err();
        assert!(err.to_string().contains("Duplicate dictionary key"));
    }

    #[test]
    fn test_piece_count_must_cover_total_length() {
        // 100000 bytes at 16 KiB per piece needs 7 hashes, not 1.
        let data = b"d4:infod6:lengthi100000e4:name1:a12:piece lengthi16384e6:pieces20:12345678901234567890ee";
        let err = BencodeParser::parse_bencode_data(data).unwrap_err();
        assert!(err.to_string().contains("Piece count mismatch"));

        let mut exact = Vec::new();
        exact.extend_from_slice(b"d4:infod6:lengthi100000e4:name1:a");
        exact.extend_from_slice(b"12:piece lengthi16384e6:pieces140:");
        exact.extend_from_slice(&[0x11; 140]);
        exact.extend_from_slice(b"ee");
        let metadata = BencodeParser::parse_bencode_data(&exact).unwrap();
        assert_eq!(metadata.piece_hashes.len(), 7);
    }

    #[test]
    fn test_empty_torrent_is_rejected() {
        let data = b"d4:infod6:lengthi0e4:name1:a12:piece lengthi16384e6:pieces0:ee";
        let result = BencodeParser::parse_bencode_data(data);
        assert!(matches!(result, Err(TorrentError::InvalidTorrentFile { .. })));
    }

    #[test]
    fn test_info_span_ignores_nested_info_strings() {
        let data = b"d7:comment4:info4:infod4:name1:xee";
        let span = BencodeParser::find_info_span(data).unwrap();
        assert_eq!(span, b"d4:name1:xe");
    }

    #[test]
    fn test_info_hash_matches_sha1_of_info_bytes() {
        let data = b"d8:announce9:test:80804:infod6:lengthi1000e4:name8:test.txt12:piece lengthi32768e6:pieces20:12345678901234567890ee";
        let metadata = BencodeParser::parse_bencode_data(data).unwrap();
        assert_eq!(
            metadata.info_hash.to_string(),
            "11aea63f00a8ea5d18de733f4c4c753fa2af995c"
        );
    }
}
