//! On-disk character catalog.
//!
//! Characters live as one JSON document per file in a directory. The store is
//! read-only from the session's point of view: listing, catalog lookups, and
//! loading are all the controller ever asks of it.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::character::resolver::CatalogEntry;
use crate::character::Character;

/// Errors raised while reading the character catalog.
#[derive(Debug)]
pub enum StorageError {
    /// The catalog directory or a character file could not be read.
    Io { path: PathBuf, source: std::io::Error },

    /// A character file did not contain a valid character document.
    InvalidDocument { path: PathBuf, reason: String },

    /// No character with the requested id exists in the catalog.
    NotFound(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            StorageError::InvalidDocument { path, reason } => {
                write!(f, "Invalid character file {}: {}", path.display(), reason)
            }
            StorageError::NotFound(id) => write!(f, "Character '{}' not found in catalog", id),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read access to the set of known characters.
pub trait CharacterStore: Send + Sync {
    /// Ids of every character in the catalog.
    fn list_characters(&self) -> Result<Vec<String>, StorageError>;

    /// `{id, name}` pairs for every character, sorted by name.
    fn character_info(&self) -> Result<Vec<CatalogEntry>, StorageError>;

    fn load_character(&self, id: &str) -> Result<Character, StorageError>;
}

pub struct FileCharacterStore {
    dir: PathBuf,
}

impl FileCharacterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_document(path: &Path) -> Result<Character, StorageError> {
        let contents = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let character: Character =
            serde_json::from_str(&contents).map_err(|err| StorageError::InvalidDocument {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        if character.id.trim().is_empty() {
            return Err(StorageError::InvalidDocument {
                path: path.to_path_buf(),
                reason: "id must not be empty".to_string(),
            });
        }

        Ok(character.normalized())
    }

    /// Load every parseable character file. Broken files are skipped so one bad
    /// document does not hide the rest of the catalog.
    fn scan(&self) -> Result<Vec<(Character, PathBuf)>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut characters = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StorageError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();

            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !path.is_file() || !is_json {
                continue;
            }

            match Self::read_document(&path) {
                Ok(character) => characters.push((character, path)),
                Err(err) => debug!(error = %err, "skipping unreadable character file"),
            }
        }

        Ok(characters)
    }
}

impl CharacterStore for FileCharacterStore {
    fn list_characters(&self) -> Result<Vec<String>, StorageError> {
        let mut ids: Vec<String> = self
            .scan()?
            .into_iter()
            .map(|(character, _)| character.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn character_info(&self) -> Result<Vec<CatalogEntry>, StorageError> {
        let mut entries: Vec<CatalogEntry> = self
            .scan()?
            .into_iter()
            .map(|(character, _)| CatalogEntry::new(character.id, character.name))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    fn load_character(&self, id: &str) -> Result<Character, StorageError> {
        // Fast path: files are conventionally named after the character id.
        let candidate = self.dir.join(format!("{id}.json"));
        if candidate.is_file() {
            if let Ok(character) = Self::read_document(&candidate) {
                if character.id == id {
                    return Ok(character);
                }
            }
        }

        self.scan()?
            .into_iter()
            .map(|(character, _)| character)
            .find(|character| character.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_character(dir: &Path, file: &str, id: &str, name: &str) {
        let body = format!(r#"{{"id":"{id}","name":"{name}","mood":{{"joy":0.3}}}}"#);
        fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn missing_directory_is_an_empty_catalog() {
        let dir = tempdir().unwrap();
        let store = FileCharacterStore::new(dir.path().join("absent"));
        assert!(store.list_characters().unwrap().is_empty());
        assert!(store.character_info().unwrap().is_empty());
    }

    #[test]
    fn catalog_is_sorted_by_name_and_skips_broken_files() {
        let dir = tempdir().unwrap();
        write_character(dir.path(), "zara.json", "zara", "Zara");
        write_character(dir.path(), "amy.json", "amy", "Amy");
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = FileCharacterStore::new(dir.path());
        let info = store.character_info().unwrap();
        assert_eq!(
            info,
            vec![CatalogEntry::new("amy", "Amy"), CatalogEntry::new("zara", "Zara")]
        );
        assert_eq!(store.list_characters().unwrap(), vec!["amy", "zara"]);
    }

    #[test]
    fn load_character_finds_files_not_named_after_id() {
        let dir = tempdir().unwrap();
        write_character(dir.path(), "custom-name.json", "hero", "Hero");

        let store = FileCharacterStore::new(dir.path());
        let hero = store.load_character("hero").unwrap();
        assert_eq!(hero.name, "Hero");
        assert_eq!(hero.mood.joy, 0.3);
    }

    #[test]
    fn load_character_reports_missing_id() {
        let dir = tempdir().unwrap();
        let store = FileCharacterStore::new(dir.path());
        match store.load_character("ghost") {
            Err(StorageError::NotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn empty_id_documents_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blank.json"), r#"{"id":"  ","name":"Blank"}"#).unwrap();
        let store = FileCharacterStore::new(dir.path());
        assert!(store.character_info().unwrap().is_empty());
    }
}
