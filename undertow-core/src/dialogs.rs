//! Dialog seams used by the add flow.
//!
//! The controller never talks to a windowing system directly. Front-ends
//! implement `Dialogs`: the CLI ships a terminal version and, behind a
//! feature flag, native message boxes.

use std::path::PathBuf;

use crate::torrent::AddTorrentParams;

/// One entry in a file dialog's type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    /// Extensions without the leading dot; `*` matches everything
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// True if `path` passes this filter.
    pub fn matches(&self, path: &std::path::Path) -> bool {
        self.extensions.iter().any(|ext| {
            ext == "*"
                || path
                    .extension()
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(ext.as_str()))
        })
    }
}

/// Options for the "open torrent files" dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogOptions {
    pub title: String,
    pub filters: Vec<FileFilter>,
    pub allow_multiselect: bool,
    pub file_must_exist: bool,
}

impl FileDialogOptions {
    /// Multi-select picker for `.torrent` files with an "All files" escape hatch.
    pub fn torrent_files() -> Self {
        Self {
            title: "Add torrent".to_string(),
            filters: vec![
                FileFilter::new("Torrent files", &["torrent"]),
                FileFilter::new("All files", &["*"]),
            ],
            allow_multiselect: true,
            file_must_exist: true,
        }
    }
}

/// Result of the add-torrent confirmation dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Submit these parameters, possibly edited by the user.
    Accepted(Vec<AddTorrentParams>),
    /// Submit nothing.
    Cancelled,
}

/// Modal dialogs shown by the add flow.
///
/// Every method blocks until the user has answered.
pub trait Dialogs {
    /// Shows the file picker. An empty vector means the user cancelled.
    fn pick_torrent_files(&mut self, options: &FileDialogOptions) -> Vec<PathBuf>;

    /// Warns that a torrent named `name` is already in the session.
    fn warn_already_in_session(&mut self, name: &str);

    /// Lets the user confirm or edit a non-empty batch before submission.
    fn confirm_add(&mut self, params: Vec<AddTorrentParams>) -> ConfirmOutcome;
}

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedDialogs;

#[cfg(any(test, feature = "test-utils"))]
mod scripted {
    use std::path::PathBuf;

    use super::{ConfirmOutcome, Dialogs, FileDialogOptions};
    use crate::torrent::AddTorrentParams;

    /// Dialogs that answer from a script and record what was shown.
    #[derive(Debug, Default)]
    pub struct ScriptedDialogs {
        picked_files: Vec<PathBuf>,
        cancel_confirmation: bool,
        edited_save_path: Option<PathBuf>,
        pub file_dialog_shown: usize,
        pub warnings: Vec<String>,
        pub confirmations: Vec<Vec<AddTorrentParams>>,
    }

    impl ScriptedDialogs {
        pub fn new() -> Self {
            Self::default()
        }

        /// The file picker returns these paths.
        pub fn picking(mut self, files: Vec<PathBuf>) -> Self {
            self.picked_files = files;
            self
        }

        /// The confirmation dialog is declined.
        pub fn cancelling(mut self) -> Self {
            self.cancel_confirmation = true;
            self
        }

        /// The confirmation dialog moves every torrent to `save_path`.
        pub fn editing_save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
            self.edited_save_path = Some(save_path.into());
            self
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn pick_torrent_files(&mut self, _options: &FileDialogOptions) -> Vec<PathBuf> {
            self.file_dialog_shown += 1;
            self.picked_files.clone()
        }

        fn warn_already_in_session(&mut self, name: &str) {
            self.warnings.push(name.to_string());
        }

        fn confirm_add(&mut self, mut params: Vec<AddTorrentParams>) -> ConfirmOutcome {
            self.confirmations.push(params.clone());
            if self.cancel_confirmation {
                return ConfirmOutcome::Cancelled;
            }
            if let Some(save_path) = &self.edited_save_path {
                for param in &mut params {
                    param.save_path = save_path.clone();
                }
            }
            ConfirmOutcome::Accepted(params)
        }
    }
}
