use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::AgentBackend;
use crate::character::CharacterStore;
use crate::core::app::{AppActionContext, AppActionDispatcher, AppCommand};
use crate::core::session_store::SessionStore;

pub mod backend;
pub mod commands;
pub mod persistence;

/// The external services a chat session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn AgentBackend>,
    pub characters: Arc<dyn CharacterStore>,
    pub sessions: Arc<dyn SessionStore>,
}

#[derive(Clone)]
pub struct ExecutorContext {
    pub collaborators: Collaborators,
    pub dispatcher: AppActionDispatcher,
    pub term_width: u16,
    pub term_height: u16,
}

impl ExecutorContext {
    pub fn new(collaborators: Collaborators, dispatcher: AppActionDispatcher) -> Self {
        Self {
            collaborators,
            dispatcher,
            term_width: 0,
            term_height: 0,
        }
    }

    pub fn action_context(&self) -> AppActionContext {
        AppActionContext {
            term_width: self.term_width,
            term_height: self.term_height,
        }
    }
}

/// Start the task for `command`. The task reports back through the
/// dispatcher with exactly one completion action.
pub fn spawn_app_command(ctx: &ExecutorContext, command: AppCommand) -> JoinHandle<()> {
    match command {
        AppCommand::CallBackend {
            session_id,
            request,
        } => backend::spawn_backend_call(ctx.clone(), session_id, request),
        AppCommand::FetchCharacter {
            session_id,
            character_id,
        } => backend::spawn_character_fetch(ctx.clone(), session_id, character_id),
        AppCommand::RunCommand {
            session_id,
            request,
        } => commands::spawn_command_request(ctx.clone(), session_id, request),
    }
}
