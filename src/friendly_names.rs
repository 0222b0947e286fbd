use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const FRIENDLY_NAMES_FILE_NAME: &str = "friendly_names.json";

#[derive(Debug, Error)]
pub enum FriendlyNamesError {
    #[error("failed to read friendly name table '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse friendly name table '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable lookup from raw asset codes to display names.
///
/// Keys are matched case-insensitively. Reloading builds a new table instead
/// of mutating an existing one, so a table handed to the renderer never
/// changes under it.
#[derive(Debug, Clone, Default)]
pub struct FriendlyNames {
    names: HashMap<String, String>,
}

impl FriendlyNames {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(raw, friendly)| (normalize_key(raw.as_ref()), friendly.into()))
            .collect();
        Self { names }
    }

    /// Reads a JSON object of `"RAW_CODE": "Display name"` pairs.
    pub fn load(path: &Path) -> Result<Self, FriendlyNamesError> {
        let raw_json = std::fs::read_to_string(path).map_err(|source| FriendlyNamesError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries = serde_json::from_str::<HashMap<String, String>>(&raw_json).map_err(
            |source| FriendlyNamesError::Parse {
                path: path.to_path_buf(),
                source,
            },
        )?;

        tracing::debug!(
            names_path = %path.display(),
            entry_count = entries.len(),
            "Loaded friendly name table"
        );
        Ok(Self::new(entries))
    }

    /// Like [`load`](Self::load), but a missing or broken table degrades to an
    /// empty one so rendering still works with raw codes.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(names) => names,
            Err(FriendlyNamesError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    names_path = %path.display(),
                    "No friendly name table found, using raw names"
                );
                Self::default()
            }
            Err(error) => {
                tracing::warn!(names_error = %error, "Ignoring friendly name table");
                Self::default()
            }
        }
    }

    /// Returns a table where `overrides` wins over the entries of `self`.
    /// The CLI layers `--names-override` on top of the base table this way.
    pub fn with_overrides(&self, overrides: &FriendlyNames) -> Self {
        let mut names = self.names.clone();
        names.extend(
            overrides
                .names
                .iter()
                .map(|(raw, friendly)| (raw.clone(), friendly.clone())),
        );
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Humanizes a raw code. The trailing `_<digits>` instance id is always
    /// stripped; codes missing from the table come back stripped but
    /// otherwise unchanged.
    pub fn resolve(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return raw.to_string();
        }

        let cleaned = strip_instance_suffix(raw);
        self.names
            .get(&normalize_key(cleaned))
            .cloned()
            .unwrap_or_else(|| cleaned.to_string())
    }
}

fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
}

fn strip_instance_suffix(raw: &str) -> &str {
    match raw.rsplit_once('_') {
        Some((prefix, suffix))
            if !suffix.is_empty() && suffix.bytes().all(|byte| byte.is_ascii_digit()) =>
        {
            prefix
        }
        _ => raw,
    }
}
