//! Best-effort persistence of session snapshots.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::session::SessionSnapshot;

#[derive(Debug)]
pub enum PersistError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(serde_json::Error),
    InvalidSessionId(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "Failed to write session to {}: {}", path.display(), source)
            }
            PersistError::Encode(err) => write!(f, "Failed to encode session: {}", err),
            PersistError::InvalidSessionId(id) => write!(f, "Invalid session id: {:?}", id),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Encode(err) => Some(err),
            PersistError::InvalidSessionId(_) => None,
        }
    }
}

/// Sink for session snapshots. Implementations are called from blocking tasks.
pub trait SessionStore: Send + Sync {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError>;
}

/// Writes each session to `{dir}/{session_id}.json`, replacing earlier saves
/// of the same session atomically.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> Result<PathBuf, PersistError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistError::InvalidSessionId(session_id.to_string()));
        }
        Ok(self.dir.join(format!("{session_id}.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        let path = self.path_for(&snapshot.session_id)?;
        let io_err = |source| PersistError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let contents = serde_json::to_vec_pretty(snapshot).map_err(PersistError::Encode)?;

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp_file.write_all(&contents).map_err(io_err)?;
        temp_file.as_file_mut().sync_all().map_err(io_err)?;
        temp_file.persist(&path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}
