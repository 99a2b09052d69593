//! Undertow Core - the "add torrent" flow of a desktop torrent client
//!
//! Parses `.torrent` files and magnet links, drops anything the session is
//! already downloading, asks the user to confirm, and queues the rest on
//! the session.

pub mod config;
pub mod controller;
pub mod dialogs;
pub mod session;
pub mod torrent;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::UndertowConfig;
pub use controller::{AddReport, AddTorrentController, SkipReason};
pub use dialogs::{ConfirmOutcome, Dialogs, FileDialogOptions};
pub use session::{SessionAlert, SessionHandle, TorrentSession, spawn_session};
pub use torrent::{AddTorrentParams, BencodeTorrentParser, InfoHash, TorrentError};

/// Top-level errors surfaced to front-ends.
#[derive(Debug, thiserror::Error)]
pub enum UndertowError {
    #[error("Torrent error: {0}")]
    Torrent(#[from] TorrentError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UndertowError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            UndertowError::Torrent(e) => match e {
                TorrentError::InvalidTorrentFile { reason } => {
                    format!("Invalid torrent file: {reason}")
                }
                TorrentError::InvalidMagnetLink { reason } => {
                    format!("Invalid magnet link: {reason}")
                }
                TorrentError::DuplicateTorrent { info_hash } => {
                    format!("Torrent {info_hash} is already being downloaded")
                }
                TorrentError::SessionShutdown => "The download session has stopped".to_string(),
                _ => "Could not add torrent".to_string(),
            },
            UndertowError::Configuration { reason } => format!("Configuration problem: {reason}"),
            UndertowError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            UndertowError::Configuration { .. }
                | UndertowError::Torrent(
                    TorrentError::InvalidTorrentFile { .. }
                        | TorrentError::InvalidMagnetLink { .. }
                        | TorrentError::InvalidInfoHash { .. }
                )
        )
    }
}

pub type Result<T> = std::result::Result<T, UndertowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = UndertowError::from(TorrentError::SessionShutdown);
        assert_eq!(err.user_message(), "The download session has stopped");
        assert!(!err.is_user_error());

        let err = UndertowError::from(TorrentError::InvalidMagnetLink {
            reason: "no xt".to_string(),
        });
        assert_eq!(err.user_message(), "Invalid magnet link: no xt");
        assert!(err.is_user_error());
    }
}
