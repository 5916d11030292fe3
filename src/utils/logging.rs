use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "CAMEO_LOG";

const DEFAULT_FILTER: &str = "info";

pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Send diagnostics to `path`, appending to what is already there.
///
/// The terminal belongs to the chat UI, so this is the only place logs go.
/// Nothing is installed when logging is not requested.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| -> Box<dyn Error> { e })?;
    Ok(())
}
