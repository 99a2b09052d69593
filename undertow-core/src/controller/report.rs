//! Outcome of one add run.

use serde::Serialize;

use crate::torrent::InfoHash;

/// Why an input did not reach the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The file could not be read.
    Unreadable { reason: String },
    /// The file was read but is not valid torrent metadata.
    InvalidTorrent { reason: String },
    /// The magnet URI could not be parsed.
    InvalidMagnet { reason: String },
    /// The session is already downloading this torrent.
    AlreadyInSession { name: String },
    /// An earlier item of the same selection has this info hash.
    DuplicateInSelection { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    /// File path or magnet URI as given
    pub source: String,
    pub reason: SkipReason,
}

/// What happened to every input of a controller call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddReport {
    /// Info hashes handed to the session, in submission order
    pub submitted: Vec<InfoHash>,
    pub skipped: Vec<SkippedSource>,
    /// The user declined the confirmation dialog
    pub cancelled: bool,
}

impl AddReport {
    pub fn skip(&mut self, source: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedSource {
            source: source.into(),
            reason,
        });
    }

    /// True when nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }
}
