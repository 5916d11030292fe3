use tracing::{debug, warn};

use super::AppCommand;
use crate::api::{BackendError, BackendResponse};
use crate::character::Character;
use crate::core::app::{App, Phase};
use crate::core::error::SessionError;
use crate::core::message::{AppMessageKind, Message};
use crate::core::session::Speaker;

pub(super) fn handle_response(
    app: &mut App,
    session_id: String,
    result: Result<BackendResponse, BackendError>,
) -> Option<AppCommand> {
    if !app.is_current_session(&session_id) {
        return None;
    }
    if app.phase != Phase::AwaitingResponse {
        debug!(phase = ?app.phase, "ignoring response with no request outstanding");
        return None;
    }
    app.finish_processing();

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "backend request failed");
            let err = SessionError::from(err);
            app.ui.set_status(AppMessageKind::Error, err.to_string());
            return None;
        }
    };

    app.ui.push_message(Message::character(response.content.clone()));
    app.ui.scroll_back = 0;
    app.session
        .context
        .push(Speaker::Character, response.content);

    let metrics = &mut app.session.metrics;
    if response.cache_metrics.hit {
        metrics.cache_hits += 1;
    }
    metrics.last_tokens_saved = response.cache_metrics.saved_tokens;

    app.schedule_persist();

    Some(AppCommand::FetchCharacter {
        session_id: app.session.session_id.clone(),
        character_id: app.session.character.id.clone(),
    })
}

/// Refresh mood and personality from the backend's copy of the character.
pub(super) fn handle_character_info(
    app: &mut App,
    session_id: String,
    result: Result<Character, BackendError>,
) {
    if !app.is_current_session(&session_id) {
        return;
    }

    match result {
        Ok(character) if character.id == app.session.character.id => {
            let character = character.normalized();
            app.session.character.mood = character.mood;
            app.session.character.personality = character.personality;
        }
        Ok(character) => {
            debug!(
                received = %character.id,
                active = %app.session.character.id,
                "ignoring character info for a different character"
            );
        }
        Err(err) => warn!(error = %err, "failed to refresh character state"),
    }
}
