//! Torrent fixtures shared by unit and integration tests.

use std::path::{Path, PathBuf};

const PIECE_LENGTH: u64 = 32768;

/// Builds a minimal single-file `.torrent` buffer with one hash per piece.
///
/// Different `name`/`length` pairs yield different info hashes.
pub fn single_file_torrent(name: &str, length: u64) -> Vec<u8> {
    let pieces = vec![0xAB; 20 * length.div_ceil(PIECE_LENGTH) as usize];

    let mut data = Vec::new();
    data.extend_from_slice(b"d8:announce35:http://tracker.example.com/announce4:infod");
    data.extend_from_slice(format!("6:lengthi{length}e").as_bytes());
    data.extend_from_slice(format!("4:name{}:{name}", name.len()).as_bytes());
    data.extend_from_slice(format!("12:piece lengthi{PIECE_LENGTH}e").as_bytes());
    data.extend_from_slice(format!("6:pieces{}:", pieces.len()).as_bytes());
    data.extend_from_slice(&pieces);
    data.extend_from_slice(b"ee");
    data
}

/// Builds a two-file `.torrent` buffer without any tracker.
pub fn multi_file_torrent(name: &str) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"d4:infod5:filesl");
    data.extend_from_slice(b"d6:lengthi500e4:pathl5:file1ee");
    data.extend_from_slice(b"d6:lengthi300e4:pathl3:sub5:file2ee");
    data.extend_from_slice(format!("e4:name{}:{name}", name.len()).as_bytes());
    data.extend_from_slice(b"12:piece lengthi16384e6:pieces20:");
    data.extend_from_slice(&[0xCD; 20]);
    data.extend_from_slice(b"ee");
    data
}

/// Writes `contents` to `dir/file_name` and returns the path.
///
/// # Panics
/// Panics if the file cannot be written; fixtures only run in tests.
pub fn write_torrent_file(dir: &Path, file_name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).expect("failed to write torrent fixture");
    path
}
