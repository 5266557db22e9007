use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use autosnap_engine::{ClientSettings, DEFAULT_API_BASE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cli::Args;
use super::logging::LogDestination;

pub(crate) const SETTINGS_FILENAME: &str = "autosnap.ron";

/// User-editable settings, read from `autosnap.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppSettings {
    pub api_base: String,
    pub download_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            download_dir: PathBuf::from("downloads"),
            request_timeout_secs: client.request_timeout.as_secs(),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("autosnap.log"),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl AppSettings {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&content).map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Command-line values win over the file.
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(base) = &args.api_base {
            self.api_base = base.clone();
        }
        if let Some(dir) = &args.download_dir {
            self.download_dir = dir.clone();
        }
        if let Some(destination) = args.log {
            self.log_destination = destination;
        }
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..ClientSettings::default()
        }
    }
}

/// Settings path: the explicit one, or `./autosnap.ron`.
pub(crate) fn settings_path(args: &Args) -> PathBuf {
    args.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME))
}
