use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::friendly_names::FRIENDLY_NAMES_FILE_NAME;

pub const FRIENDLY_NAMES_PATH_ENV: &str = "SC_LOG_FRIENDLY_NAMES";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What to do with a line whose event tag we know but whose body we cannot
/// parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the offending line and keep rendering.
    #[default]
    SkipLine,
    /// Stop the whole run at the first unparseable line.
    Abort,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub failure_policy: FailurePolicy,
    pub friendly_names_path: Option<PathBuf>,
}

impl RenderSettings {
    /// Reads settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw_json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str::<RenderSettings>(&raw_json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path first, then the environment override, then the file
    /// next to the executable. The flag tells whether the path was asked for
    /// explicitly.
    pub fn resolve_friendly_names_path(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = normalized_path(self.friendly_names_path.as_deref()) {
            return Some((path, true));
        }

        if let Some(path) = std::env::var_os(FRIENDLY_NAMES_PATH_ENV)
            .map(PathBuf::from)
            .and_then(|path| normalized_path(Some(path.as_path())))
        {
            return Some((path, true));
        }

        default_friendly_names_path().map(|path| (path, false))
    }
}

pub fn default_friendly_names_path() -> Option<PathBuf> {
    let executable = std::env::current_exe().ok()?;
    let directory = executable.parent()?;
    Some(directory.join(FRIENDLY_NAMES_FILE_NAME))
}

fn normalized_path(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|value| !value.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
