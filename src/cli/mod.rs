//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod character_list;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::character_list::list_characters;
use crate::core::config::Config;
use crate::ui::chat_loop::{bootstrap_app, run_chat, ChatOptions};
use crate::utils::logging::init_file_logging;

#[derive(Parser, Debug)]
#[command(name = "cameo", version)]
#[command(about = "A terminal chat client for persistent character agents")]
#[command(
    long_about = "Cameo is a full-screen terminal client for talking to character agents \
hosted by a backend service. Each character carries a personality and a mood that the \
backend updates as the conversation goes.\n\n\
Environment Variables:\n\
  CAMEO_BACKEND_URL     Backend base URL (default http://localhost:8000)\n\
  CAMEO_API_KEY         Bearer token sent with every backend request\n\
  CAMEO_CHARACTERS_DIR  Directory of character JSON files\n\
  CAMEO_LOG             Log filter when logging to a file (default info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Up/Down           Browse input history (scroll when the transcript has focus)\n\
  PageUp/PageDown   Scroll the transcript\n\
  Tab               Switch focus between input and transcript\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             List slash commands\n\
  /switch <name>    Talk to a different character"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Character to start with (id, name, or a unique fragment of either)
    #[arg(short = 'c', long, global = true, value_name = "CHARACTER")]
    pub character: Option<String>,

    /// User id sent to the backend
    #[arg(short = 'u', long, global = true, value_name = "USER")]
    pub user: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the characters in the catalog
    Characters,
    /// Print the effective configuration, or set one key in the config file
    Config {
        /// Key to set (backend-url, user-id, scenario-id, default-character,
        /// characters-dir, sessions-dir, log-file, request-timeout)
        key: Option<String>,
        /// New value; omit to unset the key
        value: Option<String>,
    },
}

impl Args {
    /// Fold command-line flags into `config`. Flags win over the file and
    /// the environment.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = self.backend_url.as_ref().filter(|u| !u.trim().is_empty()) {
            config.backend_url = Some(url.clone());
        }
        if let Some(log) = &self.log {
            config.log_file = Some(log.clone());
        }
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            character: self.character.clone(),
            user: self.user.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    if let Some(log_file) = &config.log_file {
        init_file_logging(log_file)?;
    }

    match args.command.clone().unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let (app, collaborators) = bootstrap_app(&config, args.chat_options()).await?;
            run_chat(app, collaborators).await
        }
        Commands::Characters => list_characters(&config),
        Commands::Config { key: None, .. } => {
            config.print_all();
            Ok(())
        }
        Commands::Config {
            key: Some(key),
            value,
        } => {
            let path = args.config.clone().unwrap_or_else(Config::get_config_path);
            let mut stored = Config::load_from_path(&path)?;
            if let Err(e) = set_config_value(&mut stored, &key, value.as_deref()) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            stored.save_to_path(&path)?;
            match value {
                Some(value) => println!("✅ Set {key} to: {value}"),
                None => println!("✅ Unset {key}"),
            }
            Ok(())
        }
    }
}

/// Set (or with `None`, unset) one config key by its command-line name.
pub fn set_config_value(config: &mut Config, key: &str, value: Option<&str>) -> Result<(), String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let text = || value.map(str::to_string);
    let path = || value.map(PathBuf::from);

    match key {
        "backend-url" => config.backend_url = text(),
        "user-id" => config.user_id = text(),
        "scenario-id" => config.scenario_id = text(),
        "default-character" => config.default_character = text(),
        "characters-dir" => config.characters_dir = path(),
        "sessions-dir" => config.sessions_dir = path(),
        "log-file" => config.log_file = path(),
        "request-timeout" => {
            config.request_timeout_secs = match value {
                Some(v) => Some(
                    v.parse()
                        .map_err(|_| format!("request-timeout must be whole seconds, got '{v}'"))?,
                ),
                None => None,
            }
        }
        _ => return Err(format!("Unknown config key: {key}")),
    }
    Ok(())
}
