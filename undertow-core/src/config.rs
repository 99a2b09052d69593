//! Centralized configuration for Undertow.
//!
//! Loaded once at startup and shared read-only; nothing mutates it after
//! the controller and session have been built.

use std::path::PathBuf;

use directories::UserDirs;

const SAVE_PATH_VAR: &str = "UNDERTOW_SAVE_PATH";
const SHOW_ADD_DIALOG_VAR: &str = "UNDERTOW_SHOW_ADD_DIALOG";
const SESSION_QUEUE_VAR: &str = "UNDERTOW_SESSION_QUEUE";

/// Central configuration for all Undertow components.
#[derive(Debug, Clone, Default)]
pub struct UndertowConfig {
    pub downloads: DownloadConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
}

/// Where new downloads go.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Save path given to every torrent unless the user edits it
    pub default_save_path: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_save_path: default_save_path(),
        }
    }
}

/// User-interface behaviour of the add flow.
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Ask for confirmation before submitting a batch
    pub show_add_torrent_dialog: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_add_torrent_dialog: true,
        }
    }
}

/// Session actor tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of the session command queue
    pub command_queue_size: usize,
    /// Capacity of the alert broadcast channel
    pub alert_queue_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_queue_size: 100,
            alert_queue_size: 256,
        }
    }
}

/// The user's download directory plus `Undertow`, or a temp dir fallback.
fn default_save_path() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|dir| dir.join("Undertow")))
        .unwrap_or_else(|| std::env::temp_dir().join("undertow"))
}

impl UndertowConfig {
    /// Creates configuration with environment variable overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` on top of the defaults.
    ///
    /// Unparsable values are ignored and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(SAVE_PATH_VAR) {
            if !path.trim().is_empty() {
                config.downloads.default_save_path = PathBuf::from(path);
            }
        }

        if let Some(show) = lookup(SHOW_ADD_DIALOG_VAR) {
            match parse_flag(&show) {
                Some(value) => config.ui.show_add_torrent_dialog = value,
                None => tracing::warn!("Ignoring {SHOW_ADD_DIALOG_VAR}={show}: not a boolean"),
            }
        }

        if let Some(size) = lookup(SESSION_QUEUE_VAR) {
            match size.parse::<usize>() {
                Ok(size) if size > 0 => config.session.command_queue_size = size,
                _ => tracing::warn!("Ignoring {SESSION_QUEUE_VAR}={size}: not a positive integer"),
            }
        }

        config
    }

    /// Creates a configuration for tests: fixed save path, no confirmation.
    pub fn for_testing(save_path: impl Into<PathBuf>) -> Self {
        Self {
            downloads: DownloadConfig {
                default_save_path: save_path.into(),
            },
            ui: UiConfig {
                show_add_torrent_dialog: false,
            },
            session: SessionConfig::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = UndertowConfig::default();

        assert!(config.ui.show_add_torrent_dialog);
        assert_eq!(config.session.command_queue_size, 100);
        assert!(!config.downloads.default_save_path.as_os_str().is_empty());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("UNDERTOW_SAVE_PATH", "/srv/torrents"),
            ("UNDERTOW_SHOW_ADD_DIALOG", "no"),
            ("UNDERTOW_SESSION_QUEUE", "8"),
        ]);

        let config = UndertowConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.downloads.default_save_path,
            PathBuf::from("/srv/torrents")
        );
        assert!(!config.ui.show_add_torrent_dialog);
        assert_eq!(config.session.command_queue_size, 8);
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("UNDERTOW_SAVE_PATH", "   "),
            ("UNDERTOW_SHOW_ADD_DIALOG", "maybe"),
            ("UNDERTOW_SESSION_QUEUE", "0"),
        ]);

        let config = UndertowConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        let defaults = UndertowConfig::default();

        assert_eq!(
            config.downloads.default_save_path,
            defaults.downloads.default_save_path
        );
        assert!(config.ui.show_add_torrent_dialog);
        assert_eq!(config.session.command_queue_size, 100);
    }
}
