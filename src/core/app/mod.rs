//! Session controller state.
//!
//! [`App`] owns everything the controller mutates: the [`Session`], the
//! view state in [`UiState`], and the input history. It is driven only
//! through [`apply_action`]; the event loop owns it by value and hands
//! out `&mut` one action at a time.

pub mod actions;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand, SideEffect,
};
pub use ui_state::UiState;

use tracing::debug;

use crate::core::error::SessionError;
use crate::core::history::InputHistory;
use crate::core::message::AppMessageKind;
use crate::core::session::{Focus, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No layout yet; keys are ignored until the first resize.
    Uninitialized,
    Ready,
    AwaitingResponse,
    AwaitingCommand,
}

pub struct App {
    pub session: Session,
    pub ui: UiState,
    pub history: InputHistory,
    pub phase: Phase,
    pub exit_requested: bool,
    side_effects: Vec<SideEffect>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            ui: UiState::new(),
            history: InputHistory::new(),
            phase: Phase::Uninitialized,
            exit_requested: false,
            side_effects: Vec::new(),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.session.processing
    }

    pub fn is_ready(&self) -> bool {
        self.phase != Phase::Uninitialized
    }

    pub fn is_input_focused(&self) -> bool {
        self.session.focus == Focus::Input
    }

    pub fn toggle_focus(&mut self) {
        self.session.focus = match self.session.focus {
            Focus::Input => Focus::Messages,
            Focus::Messages => Focus::Input,
        };
    }

    pub fn begin_processing(&mut self, phase: Phase) {
        self.session.processing = true;
        self.phase = phase;
    }

    pub fn finish_processing(&mut self) {
        self.session.processing = false;
        self.phase = Phase::Ready;
    }

    /// Whether a completion tagged with `session_id` still belongs to the
    /// active session. Stale completions are logged and should be dropped.
    pub fn is_current_session(&self, session_id: &str) -> bool {
        let current = self.session.session_id == session_id;
        if !current {
            debug!(
                stale = session_id,
                current = %self.session.session_id,
                "discarding completion for a previous session"
            );
        }
        current
    }

    pub fn schedule_persist(&mut self) {
        self.side_effects
            .push(SideEffect::PersistSession(self.session.snapshot()));
    }

    pub fn take_side_effects(&mut self) -> Vec<SideEffect> {
        std::mem::take(&mut self.side_effects)
    }

    pub fn pending_side_effects(&self) -> &[SideEffect] {
        &self.side_effects
    }

    pub fn request_exit(&mut self) {
        self.schedule_persist();
        self.exit_requested = true;
    }

    pub fn notify(&mut self, kind: AppMessageKind, content: impl Into<String>) {
        self.ui.add_app_message(kind, content);
        self.ui.scroll_back = 0;
    }

    pub fn report_error(&mut self, err: &SessionError) {
        self.notify(AppMessageKind::Error, err.to_string());
    }
}
