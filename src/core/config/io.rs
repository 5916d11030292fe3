use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to serialize or write the configuration back to disk.
    Write { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Write { path, reason } => {
                write!(
                    f,
                    "Failed to write config at {}: {}",
                    path_display(path),
                    reason
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Write { .. } => None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "cameo", "cameo")
}

impl Config {
    /// Load from `config_path`, treating a missing file as an empty config.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` (or the default location) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_config_path);
        let mut config = Self::load_from_path(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::Write {
            path: config_path.to_path_buf(),
            reason,
        };
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|e| write_err(e.to_string()))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| write_err(e.to_string()))?;
        temp_file
            .as_file_mut()
            .sync_all()
            .map_err(|e| write_err(e.to_string()))?;
        temp_file
            .persist(config_path)
            .map_err(|e| write_err(e.error.to_string()))?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => PathBuf::from("cameo.toml"),
        }
    }

    pub(crate) fn data_dir() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => PathBuf::from(".cameo"),
        }
    }
}
