//! Native file pickers and message boxes through rfd.

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use undertow_core::dialogs::{ConfirmOutcome, Dialogs, FileDialogOptions};
use undertow_core::torrent::AddTorrentParams;

const TITLE: &str = "Undertow";

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl NativeDialogs {
    pub fn new() -> Self {
        Self
    }
}

fn describe_batch(params: &[AddTorrentParams]) -> String {
    let mut text = String::new();
    for param in params {
        text.push_str(&format!("{} -> {}\n", param.name(), param.save_path.display()));
    }
    text.push_str("\nYes adds the torrents, No picks another folder first.");
    text
}

impl Dialogs for NativeDialogs {
    fn pick_torrent_files(&mut self, options: &FileDialogOptions) -> Vec<PathBuf> {
        let mut dialog = FileDialog::new().set_title(options.title.as_str());
        for filter in &options.filters {
            dialog = dialog.add_filter(filter.name.as_str(), &filter.extensions);
        }

        if options.allow_multiselect {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        }
    }

    fn warn_already_in_session(&mut self, name: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(TITLE)
            .set_description(format!("Torrent {name} already in session."))
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn confirm_add(&mut self, mut params: Vec<AddTorrentParams>) -> ConfirmOutcome {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Add torrents")
            .set_description(describe_batch(&params))
            .set_buttons(MessageButtons::YesNoCancel)
            .show();

        match answer {
            MessageDialogResult::Yes => ConfirmOutcome::Accepted(params),
            MessageDialogResult::No => match FileDialog::new().set_title("Save to").pick_folder() {
                Some(folder) => {
                    for param in &mut params {
                        param.save_path = folder.clone();
                    }
                    ConfirmOutcome::Accepted(params)
                }
                None => ConfirmOutcome::Cancelled,
            },
            _ => ConfirmOutcome::Cancelled,
        }
    }
}
