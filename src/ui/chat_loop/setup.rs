use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::HttpAgentBackend;
use crate::character::{resolve, CatalogEntry, FileCharacterStore};
use crate::core::app::App;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::message::AppMessageKind;
use crate::core::session::Session;
use crate::core::session_store::FileSessionStore;

use super::executors::Collaborators;

/// Startup choices taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub character: Option<String>,
    pub user: Option<String>,
}

/// Wire up the file stores and HTTP backend described by `config`, then
/// build the initial [`App`].
pub async fn bootstrap_app(
    config: &Config,
    options: ChatOptions,
) -> Result<(App, Collaborators), Box<dyn Error>> {
    let backend = HttpAgentBackend::new(
        config.backend_url(),
        config.api_key.clone(),
        config.request_timeout(),
    )?;
    let collaborators = Collaborators {
        backend: Arc::new(backend),
        characters: Arc::new(FileCharacterStore::new(config.characters_dir())),
        sessions: Arc::new(FileSessionStore::new(config.sessions_dir())),
    };

    let app = build_app(config, options, &collaborators).await?;
    Ok((app, collaborators))
}

/// Pick the starting character, register it with the backend, and open a
/// session for it. A failed registration is reported in the transcript but
/// does not stop the session from starting.
pub async fn build_app(
    config: &Config,
    options: ChatOptions,
    collaborators: &Collaborators,
) -> Result<App, Box<dyn Error>> {
    let catalog = collaborators.characters.character_info()?;
    let query = options
        .character
        .or_else(|| config.default_character.clone());
    let entry = select_initial_character(query.as_deref(), &catalog).ok_or_else(|| {
        format!(
            "No characters found in {}. Add a character file or set characters_dir.",
            path_display(config.characters_dir())
        )
    })??;

    let character = collaborators.characters.load_character(&entry.id)?;
    let registration = collaborators.backend.create_character(&character).await;

    let user_id = options
        .user
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| config.user_id());
    let session = Session::new(character, user_id, config.scenario_id.clone());
    info!(
        session = %session.session_id,
        character = %session.character.id,
        user = %session.user_id,
        "session created"
    );

    let mut app = App::new(session);
    app.notify(
        AppMessageKind::Info,
        format!(
            "Now talking to {}. Type /help for commands.",
            app.session.character.display_label()
        ),
    );
    if let Err(err) = registration {
        warn!(error = %err, "failed to register character with backend");
        app.notify(
            AppMessageKind::Warning,
            format!("Could not register character with the backend: {err}"),
        );
    }
    Ok(app)
}

/// `None` when the catalog is empty and no query was given.
fn select_initial_character<'a>(
    query: Option<&str>,
    catalog: &'a [CatalogEntry],
) -> Option<Result<&'a CatalogEntry, crate::core::error::SessionError>> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => Some(resolve(query, catalog).map_err(Into::into)),
        None => catalog.first().map(Ok),
    }
}
