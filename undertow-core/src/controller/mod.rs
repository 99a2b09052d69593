//! The "add torrent" controller.
//!
//! Turns a selection of `.torrent` files or magnet URIs into session adds:
//! parse every item on its own, drop whatever fails or is already being
//! downloaded, optionally let the user confirm, then hand the rest to the
//! session without waiting for it.

pub mod report;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use report::{AddReport, SkipReason, SkippedSource};

use crate::config::UndertowConfig;
use crate::dialogs::{ConfirmOutcome, Dialogs, FileDialogOptions};
use crate::session::TorrentSession;
use crate::torrent::{AddTorrentParams, TorrentError, TorrentMetadata, TorrentParser};

/// A parsed item waiting for deduplication, labelled with where it came from.
struct Candidate {
    source: String,
    params: AddTorrentParams,
}

/// Returns true if `source` is a magnet URI rather than a file path.
pub fn is_magnet_uri(source: &str) -> bool {
    source
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
}

/// Drives one add interaction against a session.
///
/// Per-item failures never abort a run; they end up in the returned
/// `AddReport`. The only error surfaced to the caller is a session that
/// has stopped accepting commands.
pub struct AddTorrentController<S, P, D> {
    session: S,
    parser: P,
    dialogs: D,
    config: Arc<UndertowConfig>,
}

impl<S, P, D> AddTorrentController<S, P, D>
where
    S: TorrentSession,
    P: TorrentParser,
    D: Dialogs,
{
    pub fn new(session: S, parser: P, dialogs: D, config: Arc<UndertowConfig>) -> Self {
        Self {
            session,
            parser,
            dialogs,
            config,
        }
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    /// Shows the file dialog and adds whatever the user picked.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session stopped mid-run
    pub async fn execute(&mut self) -> Result<AddReport, TorrentError> {
        let paths = self
            .dialogs
            .pick_torrent_files(&FileDialogOptions::torrent_files());

        if paths.is_empty() {
            tracing::debug!("File dialog closed without a selection");
            return Ok(AddReport::default());
        }

        self.execute_files(&paths).await
    }

    /// Adds `.torrent` files by path.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session stopped mid-run
    pub async fn execute_files(&mut self, paths: &[PathBuf]) -> Result<AddReport, TorrentError> {
        let mut report = AddReport::default();
        let candidates = self.parse_files(paths, &mut report).await;
        self.submit(candidates, &mut report).await?;
        Ok(report)
    }

    /// Adds torrents whose metadata is already parsed.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session stopped mid-run
    pub async fn execute_torrents(
        &mut self,
        torrents: Vec<TorrentMetadata>,
    ) -> Result<AddReport, TorrentError> {
        let save_path = self.default_save_path();
        let candidates = torrents
            .into_iter()
            .map(|metadata| Candidate {
                source: metadata.name.clone(),
                params: AddTorrentParams::from_metadata(metadata, save_path.clone()),
            })
            .collect();

        let mut report = AddReport::default();
        self.submit(candidates, &mut report).await?;
        Ok(report)
    }

    /// Adds magnet URIs.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session stopped mid-run
    pub async fn execute_magnets(&mut self, links: &[String]) -> Result<AddReport, TorrentError> {
        let mut report = AddReport::default();
        let candidates = self.parse_magnets(links, &mut report).await;
        self.submit(candidates, &mut report).await?;
        Ok(report)
    }

    /// Adds a mixed list of file paths and magnet URIs, as given on a
    /// command line. Items keep their order and go through a single
    /// confirmation.
    ///
    /// # Errors
    /// - `TorrentError::SessionShutdown` - Session stopped mid-run
    pub async fn execute_sources(&mut self, sources: &[String]) -> Result<AddReport, TorrentError> {
        let mut report = AddReport::default();
        let mut candidates = Vec::with_capacity(sources.len());

        for source in sources {
            let candidate = if is_magnet_uri(source) {
                self.parse_magnet(source, &mut report).await
            } else {
                self.parse_file(Path::new(source), &mut report).await
            };
            candidates.extend(candidate);
        }

        self.submit(candidates, &mut report).await?;
        Ok(report)
    }

    fn default_save_path(&self) -> PathBuf {
        self.config.downloads.default_save_path.clone()
    }

    async fn parse_files(&self, paths: &[PathBuf], report: &mut AddReport) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            candidates.extend(self.parse_file(path, report).await);
        }
        candidates
    }

    async fn parse_magnets(&self, links: &[String], report: &mut AddReport) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(links.len());
        for link in links {
            candidates.extend(self.parse_magnet(link, report).await);
        }
        candidates
    }

    async fn parse_file(&self, path: &Path, report: &mut AddReport) -> Option<Candidate> {
        let source = path.display().to_string();

        match self.parser.parse_torrent_file(path).await {
            Ok(metadata) => {
                tracing::debug!("Parsed {source}: {} ({})", metadata.name, metadata.info_hash);
                Some(Candidate {
                    source,
                    params: AddTorrentParams::from_metadata(metadata, self.default_save_path()),
                })
            }
            Err(TorrentError::Io(e)) => {
                tracing::warn!("Skipping {source}: cannot read file: {e}");
                report.skip(
                    source,
                    SkipReason::Unreadable {
                        reason: e.to_string(),
                    },
                );
                None
            }
            Err(e) => {
                tracing::warn!("Skipping {source}: {e}");
                report.skip(
                    source,
                    SkipReason::InvalidTorrent {
                        reason: e.to_string(),
                    },
                );
                None
            }
        }
    }

    async fn parse_magnet(&self, link: &str, report: &mut AddReport) -> Option<Candidate> {
        match self.parser.parse_magnet_link(link).await {
            Ok(magnet) => {
                tracing::debug!("Parsed magnet link for {}", magnet.info_hash);
                Some(Candidate {
                    source: link.to_string(),
                    params: AddTorrentParams::from_magnet(magnet, link, self.default_save_path()),
                })
            }
            Err(e) => {
                tracing::warn!("Skipping magnet link {link}: {e}");
                report.skip(
                    link,
                    SkipReason::InvalidMagnet {
                        reason: e.to_string(),
                    },
                );
                None
            }
        }
    }

    /// Deduplicates, confirms and submits one batch.
    async fn submit(
        &mut self,
        candidates: Vec<Candidate>,
        report: &mut AddReport,
    ) -> Result<(), TorrentError> {
        let mut seen = HashSet::new();
        let mut batch = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let info_hash = candidate.params.info_hash();
            let name = candidate.params.name();

            if !seen.insert(info_hash) {
                tracing::debug!("Skipping {}: selected twice", candidate.source);
                report.skip(candidate.source, SkipReason::DuplicateInSelection { name });
                continue;
            }

            if self.session.find_torrent(info_hash).await?.is_some() {
                tracing::warn!("Torrent {name} already in session.");
                self.dialogs.warn_already_in_session(&name);
                report.skip(candidate.source, SkipReason::AlreadyInSession { name });
                continue;
            }

            batch.push(candidate.params);
        }

        if batch.is_empty() {
            return Ok(());
        }

        let batch = if self.config.ui.show_add_torrent_dialog {
            match self.dialogs.confirm_add(batch) {
                ConfirmOutcome::Accepted(params) => params,
                ConfirmOutcome::Cancelled => {
                    tracing::info!("Add torrent dialog cancelled");
                    report.cancelled = true;
                    return Ok(());
                }
            }
        } else {
            batch
        };

        for params in batch {
            let info_hash = params.info_hash();
            tracing::info!(
                "Submitting {} ({info_hash}) to {}",
                params.name(),
                params.save_path.display()
            );
            self.session.add_torrent_async(params).await?;
            report.submitted.push(info_hash);
        }

        Ok(())
    }
}
