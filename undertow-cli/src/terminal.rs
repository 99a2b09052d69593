//! Line-based dialogs for terminals.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use undertow_core::dialogs::{ConfirmOutcome, Dialogs, FileDialogOptions};
use undertow_core::torrent::AddTorrentParams;

/// Dialogs that prompt on `output` and read answers from `input`.
///
/// End of input answers every prompt negatively: no files picked, batch
/// cancelled.
pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
}

impl TerminalDialogs<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr so stdout stays clean for reports.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `message` and reads one trimmed line, `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_paths(&mut self, options: &FileDialogOptions) -> io::Result<Vec<PathBuf>> {
        writeln!(self.output, "{}", options.title)?;
        if options.allow_multiselect {
            writeln!(self.output, "Enter one path per line, empty line to finish.")?;
        }

        let mut paths = Vec::new();
        while let Some(line) = self.prompt("> ")? {
            if line.is_empty() {
                break;
            }

            let path = PathBuf::from(&line);
            if options.file_must_exist && !path.is_file() {
                writeln!(self.output, "No such file: {line}")?;
                continue;
            }
            if !options.filters.iter().any(|filter| filter.matches(&path)) {
                writeln!(self.output, "Not a torrent file: {line}")?;
                continue;
            }

            paths.push(path);
            if !options.allow_multiselect {
                break;
            }
        }

        Ok(paths)
    }

    fn list_batch(&mut self, params: &[AddTorrentParams]) -> io::Result<()> {
        writeln!(self.output, "About to add {} torrent(s):", params.len())?;
        for param in params {
            writeln!(
                self.output,
                "  {} ({}) -> {}",
                param.name(),
                param.info_hash(),
                param.save_path.display()
            )?;
        }
        Ok(())
    }

    fn ask_confirmation(
        &mut self,
        mut params: Vec<AddTorrentParams>,
    ) -> io::Result<ConfirmOutcome> {
        self.list_batch(&params)?;

        loop {
            let Some(answer) = self.prompt("Add? [Y]es / [n]o / change [s]ave path: ")? else {
                return Ok(ConfirmOutcome::Cancelled);
            };

            match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(ConfirmOutcome::Accepted(params)),
                "n" | "no" => return Ok(ConfirmOutcome::Cancelled),
                "s" | "save" => {
                    let Some(save_path) = self.prompt("Save path: ")? else {
                        return Ok(ConfirmOutcome::Cancelled);
                    };
                    if save_path.is_empty() {
                        continue;
                    }
                    for param in &mut params {
                        param.save_path = PathBuf::from(&save_path);
                    }
                    self.list_batch(&params)?;
                }
                _ => writeln!(self.output, "Please answer y, n or s.")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn pick_torrent_files(&mut self, options: &FileDialogOptions) -> Vec<PathBuf> {
        self.read_paths(options).unwrap_or_else(|e| {
            tracing::warn!("Terminal file prompt failed: {e}");
            Vec::new()
        })
    }

    fn warn_already_in_session(&mut self, name: &str) {
        if let Err(e) = writeln!(self.output, "Torrent {name} already in session.") {
            tracing::warn!("Failed to print warning: {e}");
        }
    }

    fn confirm_add(&mut self, params: Vec<AddTorrentParams>) -> ConfirmOutcome {
        self.ask_confirmation(params).unwrap_or_else(|e| {
            tracing::warn!("Terminal confirmation failed: {e}");
            ConfirmOutcome::Cancelled
        })
    }
}
