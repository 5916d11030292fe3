mod command;
mod input;
mod response;

use std::time::Instant;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use super::ui_state::LayoutInfo;
use super::{App, Phase};
use crate::api::{BackendError, BackendRequest, BackendResponse};
use crate::character::Character;
use crate::commands::{CommandOutcome, CommandRequest};
use crate::core::session::{Focus, SessionSnapshot};

pub enum AppAction {
    Resize {
        width: u16,
        height: u16,
    },
    Key(KeyEvent),
    Tick {
        now: Instant,
    },
    ResponseReceived {
        session_id: String,
        result: Result<BackendResponse, BackendError>,
    },
    CommandCompleted {
        session_id: String,
        outcome: CommandOutcome,
    },
    CharacterInfoLoaded {
        session_id: String,
        result: Result<Character, BackendError>,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }

    pub fn dispatch(&self, action: AppAction) {
        self.dispatch_many([action], AppActionContext::default());
    }
}

/// Asynchronous work requested by a handler. Each delivers exactly one
/// completion action tagged with `session_id`.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    CallBackend {
        session_id: String,
        request: BackendRequest,
    },
    RunCommand {
        session_id: String,
        request: CommandRequest,
    },
    FetchCharacter {
        session_id: String,
        character_id: String,
    },
}

/// Fire-and-forget effects drained by the runtime after each action.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    PersistSession(SessionSnapshot),
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        // Input queued behind a quit must not reach the session
        if app.exit_requested {
            break;
        }
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::Resize { width, height } => {
            handle_resize(app, width, height);
            None
        }
        AppAction::Tick { now } => {
            handle_tick(app, now);
            None
        }
        AppAction::Key(key) => input::handle_key(app, key, ctx),
        AppAction::ResponseReceived { session_id, result } => {
            response::handle_response(app, session_id, result)
        }
        AppAction::CharacterInfoLoaded { session_id, result } => {
            response::handle_character_info(app, session_id, result);
            None
        }
        AppAction::CommandCompleted {
            session_id,
            outcome,
        } => command::handle_command_completed(app, session_id, outcome),
    }
}

fn handle_resize(app: &mut App, width: u16, height: u16) {
    app.ui.layout = Some(LayoutInfo { width, height });
    if app.phase == Phase::Uninitialized {
        app.phase = Phase::Ready;
        app.session.focus = Focus::Input;
    }
}

fn handle_tick(app: &mut App, now: Instant) {
    if app.is_processing() {
        app.ui.advance_spinner();
    }
    app.ui.expire_status(now);
}
