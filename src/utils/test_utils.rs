use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{AgentBackend, BackendError, BackendRequest, BackendResponse, CacheMetrics};
use crate::character::{CatalogEntry, Character, CharacterStore, StorageError};
use crate::core::app::{apply_action, App, AppAction, AppActionContext, AppCommand};
use crate::core::session::{Session, SessionSnapshot};
use crate::core::session_store::{PersistError, SessionStore};

pub const TERM_WIDTH: u16 = 80;
pub const TERM_HEIGHT: u16 = 24;

pub fn sample_character(id: &str, name: &str) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        ..Character::default()
    }
}

pub fn create_test_session() -> Session {
    Session::new(sample_character("alice", "Alice"), "tester", None)
}

/// An app that has already seen its first resize.
pub fn create_test_app() -> App {
    let mut app = App::new(create_test_session());
    apply_action(
        &mut app,
        AppAction::Resize {
            width: TERM_WIDTH,
            height: TERM_HEIGHT,
        },
        test_context(),
    );
    app
}

pub fn test_context() -> AppActionContext {
    AppActionContext {
        term_width: TERM_WIDTH,
        term_height: TERM_HEIGHT,
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub fn press(app: &mut App, event: KeyEvent) -> Option<AppCommand> {
    apply_action(app, AppAction::Key(event), test_context())
}

/// Replace the draft with `text` and press Enter.
pub fn submit(app: &mut App, text: &str) -> Option<AppCommand> {
    app.ui.set_input_text(text);
    press(app, key(KeyCode::Enter))
}

pub fn ok_response(content: &str, hit: bool, saved_tokens: u64) -> BackendResponse {
    BackendResponse {
        content: content.to_string(),
        cache_metrics: CacheMetrics { hit, saved_tokens },
    }
}

/// Scripted backend. Responses are served in order; unknown characters 404.
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<VecDeque<Result<BackendResponse, BackendError>>>,
    characters: Mutex<HashMap<String, Character>>,
    pub requests: Mutex<Vec<BackendRequest>>,
    pub created: Mutex<Vec<String>>,
    pub fail_create: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `create_character` always fails.
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn with_response(self, response: Result<BackendResponse, BackendError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_character(self, character: Character) -> Self {
        self.characters
            .lock()
            .unwrap()
            .insert(character.id.clone(), character);
        self
    }

    pub fn created_ids(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentBackend for FakeBackend {
    async fn process_request(
        &self,
        request: BackendRequest,
    ) -> Result<BackendResponse, BackendError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ok_response("...", false, 0)))
    }

    async fn get_character(&self, id: &str) -> Result<Character, BackendError> {
        self.characters
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(BackendError::Status {
                status: 404,
                body: format!("no character {id}"),
            })
    }

    async fn create_character(&self, character: &Character) -> Result<(), BackendError> {
        if self.fail_create {
            return Err(BackendError::Transport("connection refused".into()));
        }
        self.created.lock().unwrap().push(character.id.clone());
        self.characters
            .lock()
            .unwrap()
            .insert(character.id.clone(), character.clone());
        Ok(())
    }
}

/// In-memory catalog. `unavailable` makes every call fail like an unreadable directory.
#[derive(Default)]
pub struct MemoryCharacterStore {
    pub characters: Vec<Character>,
    pub unavailable: bool,
}

impl MemoryCharacterStore {
    pub fn new(characters: Vec<Character>) -> Self {
        Self {
            characters,
            unavailable: false,
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Io {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        } else {
            Ok(())
        }
    }
}

impl CharacterStore for MemoryCharacterStore {
    fn list_characters(&self) -> Result<Vec<String>, StorageError> {
        self.check()?;
        Ok(self.characters.iter().map(|c| c.id.clone()).collect())
    }

    fn character_info(&self) -> Result<Vec<CatalogEntry>, StorageError> {
        self.check()?;
        Ok(self
            .characters
            .iter()
            .map(|c| CatalogEntry::new(c.id.clone(), c.name.clone()))
            .collect())
    }

    fn load_character(&self, id: &str) -> Result<Character, StorageError> {
        self.check()?;
        self.characters
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    pub saved: Mutex<Vec<SessionSnapshot>>,
}

impl SessionStore for MemorySessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        self.saved.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}
