//! Torrent file and magnet link parsing.
//!
//! Decoding is delegated to bencode-rs and magnet-url; this module only
//! maps their output onto `TorrentMetadata` and `MagnetLink`.

pub mod bencode;
pub mod magnet;
pub mod parser;
pub mod types;

// Re-export public API
pub use parser::BencodeTorrentParser;
pub use types::{MagnetLink, TorrentFile, TorrentMetadata, TorrentParser};

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::parser::BencodeTorrentParser;
    use super::types::TorrentParser;
    use crate::torrent::TorrentError;
    use crate::torrent::test_data::{multi_file_torrent, single_file_torrent, write_torrent_file};

    #[tokio::test]
    async fn test_magnet_link_parsing() {
        let parser = BencodeTorrentParser::new();

        let magnet_url = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=Test%20Torrent&tr=http://tracker.example.com/announce";
        let magnet = parser.parse_magnet_link(magnet_url).await.unwrap();

        assert_eq!(
            magnet.info_hash.to_string(),
            "0123456789abcdef0123456789abcdef01234567"
        );
        assert_eq!(magnet.display_name, Some("Test%20Torrent".to_string()));
        assert_eq!(magnet.trackers, vec!["http://tracker.example.com/announce"]);
    }

    #[tokio::test]
    async fn test_invalid_magnet_link() {
        let parser = BencodeTorrentParser::new();

        let result = parser.parse_magnet_link("invalid://not-a-magnet").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_magnet_link_without_info_hash() {
        let parser = BencodeTorrentParser::new();
        let magnet_url = "magnet:?dn=Test%20Torrent&tr=http://tracker.example.com/announce";
        let result = parser.parse_magnet_link(magnet_url).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_magnet_link_invalid_hash_length() {
        let parser = BencodeTorrentParser::new();
        let result = parser
            .parse_magnet_link("magnet:?xt=urn:btih:tooshort&dn=Test")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_torrent_data_parsing() {
        let parser = BencodeTorrentParser::new();
        let torrent_data = b"d8:announce9:test:80804:infod6:lengthi1000e4:name8:test.txt12:piece lengthi32768e6:pieces20:12345678901234567890ee";

        let metadata = parser.parse_torrent_data(torrent_data).await.unwrap();
        assert_eq!(metadata.name, "test.txt");
        assert_eq!(metadata.piece_length, 32768);
        assert_eq!(metadata.total_length, 1000);
        assert_eq!(metadata.piece_hashes.len(), 1);
        assert_eq!(metadata.announce_urls, vec!["test:8080"]);
    }

    #[tokio::test]
    async fn test_multi_file_torrent_without_trackers() {
        let parser = BencodeTorrentParser::new();
        let metadata = parser
            .parse_torrent_data(&multi_file_torrent("album"))
            .await
            .unwrap();

        assert_eq!(metadata.name, "album");
        assert_eq!(metadata.total_length, 800);
        assert_eq!(metadata.files.len(), 2);
        assert_eq!(metadata.files[1].path, vec!["sub", "file2"]);
        assert!(metadata.announce_urls.is_empty());
    }

    #[tokio::test]
    async fn test_announce_list_is_merged_without_repeats() {
        let parser = BencodeTorrentParser::new();
        let torrent_data = b"d8:announce5:udp:113:announce-listll5:udp:1el5:udp:2ee4:infod6:lengthi1e4:name1:a12:piece lengthi16384e6:pieces20:12345678901234567890ee";

        let metadata = parser.parse_torrent_data(torrent_data).await.unwrap();
        assert_eq!(metadata.announce_urls, vec!["udp:1", "udp:2"]);
    }

    #[tokio::test]
    async fn test_invalid_torrent_data() {
        let parser = BencodeTorrentParser::new();

        let result = parser.parse_torrent_data(b"invalid torrent data").await;
        assert!(result.is_err());

        let result = parser.parse_torrent_data(b"l4:teste").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_info_field() {
        let parser = BencodeTorrentParser::new();
        let result = parser.parse_torrent_data(b"d8:announce9:test:8080e").await;

        match result {
            Err(TorrentError::InvalidTorrentFile { reason }) => {
                assert!(reason.contains("Missing 'info' field"));
            }
            other => panic!("expected InvalidTorrentFile, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_pieces_length() {
        let parser = BencodeTorrentParser::new();
        let torrent_data = b"d8:announce9:test:80804:infod6:lengthi1000e4:name8:test.txt12:piece lengthi32768e6:pieces19:1234567890123456789ee";
        let result = parser.parse_torrent_data(torrent_data).await;

        assert!(result.unwrap_err().to_string().contains("Invalid pieces length"));
    }

    #[tokio::test]
    async fn test_zero_piece_length_is_rejected() {
        let parser = BencodeTorrentParser::new();
        let torrent_data = b"d4:infod6:lengthi1000e4:name1:a12:piece lengthi0e6:pieces20:12345678901234567890ee";
        let result = parser.parse_torrent_data(torrent_data).await;

        assert!(result.unwrap_err().to_string().contains("Invalid piece length"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_in_path() {
        let parser = BencodeTorrentParser::new();
        let mut torrent_data =
            Vec::from(&b"d4:infod5:filesld6:lengthi500e4:pathl4:"[..]);
        torrent_data.extend_from_slice(&[0xFF, 0xFE, 0xFD, 0xFC]);
        torrent_data.extend_from_slice(
            b"eee4:name1:a12:piece lengthi16384e6:pieces20:12345678901234567890ee",
        );

        let result = parser.parse_torrent_data(&torrent_data).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_info_hash_differs_between_torrents() {
        let parser = BencodeTorrentParser::new();

        let first = parser
            .parse_torrent_data(&single_file_torrent("one.bin", 10))
            .await
            .unwrap();
        let again = parser
            .parse_torrent_data(&single_file_torrent("one.bin", 10))
            .await
            .unwrap();
        let second = parser
            .parse_torrent_data(&single_file_torrent("two.bin", 10))
            .await
            .unwrap();

        assert_eq!(first.info_hash, again.info_hash);
        assert_ne!(first.info_hash, second.info_hash);
    }

    #[tokio::test]
    async fn test_torrent_file_parsing() {
        let parser = BencodeTorrentParser::new();
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = write_torrent_file(
            temp_dir.path(),
            "test.torrent",
            &single_file_torrent("test.txt", 1000),
        );

        let metadata = parser.parse_torrent_file(&file_path).await.unwrap();
        assert_eq!(metadata.name, "test.txt");
        assert_eq!(metadata.total_length, 1000);
        assert_eq!(
            metadata.announce_urls,
            vec!["http://tracker.example.com/announce"]
        );
    }

    #[tokio::test]
    async fn test_nonexistent_file() {
        let parser = BencodeTorrentParser::new();

        let result = parser
            .parse_torrent_file(Path::new("/nonexistent/file.torrent"))
            .await;
        assert!(matches!(result, Err(TorrentError::Io(_))));
    }
}
