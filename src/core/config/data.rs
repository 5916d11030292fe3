use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "user";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const ENV_BACKEND_URL: &str = "CAMEO_BACKEND_URL";
pub const ENV_API_KEY: &str = "CAMEO_API_KEY";
pub const ENV_CHARACTERS_DIR: &str = "CAMEO_CHARACTERS_DIR";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the character agent backend
    pub backend_url: Option<String>,
    /// Bearer token sent with every backend request
    pub api_key: Option<String>,
    /// Identifier sent as the speaking user
    pub user_id: Option<String>,
    /// Optional scenario forwarded with each request
    pub scenario_id: Option<String>,
    /// Character query used at startup when `--character` is not given
    pub default_character: Option<String>,
    /// Directory holding one JSON document per character
    pub characters_dir: Option<PathBuf>,
    /// Directory session snapshots are written to
    pub sessions_dir: Option<PathBuf>,
    /// Write tracing output to this file
    pub log_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn backend_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn user_id(&self) -> String {
        self.user_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.characters_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("characters"))
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.sessions_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("sessions"))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(dir) = non_empty(ENV_CHARACTERS_DIR) {
            self.characters_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  backend_url: {}", self.backend_url());
        println!(
            "  api_key: {}",
            if self.api_key.is_some() { "(set)" } else { "(unset)" }
        );
        println!("  user_id: {}", self.user_id());
        match &self.scenario_id {
            Some(scenario) => println!("  scenario_id: {scenario}"),
            None => println!("  scenario_id: (unset)"),
        }
        match &self.default_character {
            Some(character) => println!("  default_character: {character}"),
            None => println!("  default_character: (unset)"),
        }
        println!("  characters_dir: {}", path_display(self.characters_dir()));
        println!("  sessions_dir: {}", path_display(self.sessions_dir()));
        match &self.log_file {
            Some(path) => println!("  log_file: {}", path_display(path)),
            None => println!("  log_file: (unset)"),
        }
        println!("  request_timeout_secs: {}", self.request_timeout().as_secs());
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
