//! Persisted lifecycle state.
//!
//! Stages usually run as separate process invocations, so progress is
//! recorded in a JSON state file under the work directory. The file carries
//! the stage reached, the package version it was reached for, and the
//! configure definitions fingerprint captured at build time.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle stages, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Uninitialized,
    Sourced,
    Built,
    Packaged,
    Published,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Uninitialized => "uninitialized",
            Stage::Sourced => "sourced",
            Stage::Built => "built",
            Stage::Packaged => "packaged",
            Stage::Published => "published",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The recorded state of one package lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageState {
    /// Last stage completed.
    pub stage: Stage,

    /// Package version the lifecycle is running for.
    pub version: String,

    /// Fingerprint of the configure definitions used by the build stage.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub definitions: Option<String>,
}

impl StageState {
    /// Fresh state for a version that has not been sourced yet.
    pub fn new(version: impl Into<String>) -> Self {
        StageState {
            stage: Stage::Uninitialized,
            version: version.into(),
            definitions: None,
        }
    }

    /// Load recorded state, returning `None` when no state file exists.
    pub fn load(path: &Path) -> Result<Option<Self>, StateError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StateError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let state = serde_json::from_str(&content).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Write the state file, creating its parent directory as needed.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|source| StateError::Encode { source })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| StateError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The state file could not be read or written.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file `{}` is corrupt", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write state file `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode lifecycle state")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}
