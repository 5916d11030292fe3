use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::AgentBackend;
use crate::character::{resolve, CatalogEntry, CharacterStore, StorageError};
use crate::commands::{CommandOutcome, CommandRequest};
use crate::core::app::AppAction;
use crate::core::error::SessionError;

use super::ExecutorContext;

pub fn spawn_command_request(
    ctx: ExecutorContext,
    session_id: String,
    request: CommandRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = run_command_request(
            request,
            ctx.collaborators.characters.clone(),
            ctx.collaborators.backend.clone(),
        )
        .await;
        ctx.dispatcher.dispatch_many(
            [AppAction::CommandCompleted {
                session_id,
                outcome,
            }],
            ctx.action_context(),
        );
    })
}

/// Carry out a catalog command. Store reads happen on the blocking pool.
pub async fn run_command_request(
    request: CommandRequest,
    characters: Arc<dyn CharacterStore>,
    backend: Arc<dyn AgentBackend>,
) -> CommandOutcome {
    let result = match request {
        CommandRequest::List => catalog(characters).await.map(CommandOutcome::Listed),
        CommandRequest::Switch {
            query,
            active_character_id,
        } => switch_character(&query, &active_character_id, characters, backend).await,
    };
    result.unwrap_or_else(CommandOutcome::Failed)
}

async fn switch_character(
    query: &str,
    active_character_id: &str,
    characters: Arc<dyn CharacterStore>,
    backend: Arc<dyn AgentBackend>,
) -> Result<CommandOutcome, SessionError> {
    let entries = catalog(characters.clone()).await?;
    let entry = resolve(query, &entries)?.clone();
    if entry.id == active_character_id {
        return Ok(CommandOutcome::AlreadyActive(entry));
    }

    let id = entry.id.clone();
    let character = with_store(characters, move |store| store.load_character(&id)).await?;
    backend.create_character(&character).await?;
    debug!(character = %character.id, "character registered with backend");
    Ok(CommandOutcome::Loaded(character))
}

async fn catalog(characters: Arc<dyn CharacterStore>) -> Result<Vec<CatalogEntry>, SessionError> {
    with_store(characters, |store| store.character_info()).await
}

async fn with_store<T, F>(characters: Arc<dyn CharacterStore>, f: F) -> Result<T, SessionError>
where
    T: Send + 'static,
    F: FnOnce(&dyn CharacterStore) -> Result<T, StorageError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(characters.as_ref()))
        .await
        .map_err(|err| SessionError::Storage(format!("character store task failed: {err}")))?
        .map_err(SessionError::from)
}
