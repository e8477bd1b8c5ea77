//! Persisted form of the history, written wholesale after each mutation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::HistoryEntry;
use crate::atomic_file::atomic_write;

/// Everything needed to restore a history store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub cursor_index: usize,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

/// Errors raised while reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unable to create snapshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid snapshot at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize snapshot for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a snapshot, `Ok(None)` when no file exists yet.
pub fn load_snapshot(path: &Path) -> Result<Option<HistorySnapshot>, SnapshotError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SnapshotError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Replace the snapshot at `path`, creating parent directories as needed.
pub fn save_snapshot(path: &Path, snapshot: &HistorySnapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SnapshotError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = serde_json::to_vec_pretty(snapshot).map_err(|source| SnapshotError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &data).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}
