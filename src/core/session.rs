//! The session aggregate: who is talking, to whom, and what has been said.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::character::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Character,
}

/// One exchanged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered conversation turns for the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub turns: Vec<Turn>,
    pub started_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn push(&mut self, speaker: Speaker, content: impl Into<String>) {
        self.turns.push(Turn::new(speaker, content));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Input,
    Messages,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub last_tokens_saved: u64,
}

impl SessionMetrics {
    /// Percentage of requests served from cache; zero when nothing was sent yet.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64 * 100.0
        }
    }

    pub fn format_hit_rate(&self) -> String {
        if self.total_requests == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", self.cache_hit_rate())
        }
    }
}

pub struct Session {
    pub character: Character,
    pub user_id: String,
    pub session_id: String,
    pub scenario_id: Option<String>,
    pub context: ConversationContext,
    pub focus: Focus,
    pub processing: bool,
    pub metrics: SessionMetrics,
}

impl Session {
    pub fn new(
        character: Character,
        user_id: impl Into<String>,
        scenario_id: Option<String>,
    ) -> Self {
        Self {
            character,
            user_id: user_id.into(),
            session_id: generate_session_id(None),
            scenario_id,
            context: ConversationContext::new(),
            focus: Focus::Input,
            processing: false,
            metrics: SessionMetrics::default(),
        }
    }

    /// Replace the active character and start over with a fresh id, empty
    /// context, and zeroed metrics.
    pub fn restart_with(&mut self, character: Character) {
        self.character = character;
        self.session_id = generate_session_id(Some(&self.session_id));
        self.context = ConversationContext::new();
        self.metrics = SessionMetrics::default();
        self.processing = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            user_id: self.user_id.clone(),
            character_id: self.character.id.clone(),
            character_name: self.character.name.clone(),
            scenario_id: self.scenario_id.clone(),
            started_at: self.context.started_at,
            saved_at: Utc::now(),
            turns: self.context.turns.clone(),
            metrics: self.metrics,
        }
    }
}

/// Serializable record of a session, written by the persistence effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub user_id: String,
    pub character_id: String,
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub saved_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
    pub metrics: SessionMetrics,
}

/// Produce a random session id, never equal to `previous`.
pub fn generate_session_id(previous: Option<&str>) -> String {
    loop {
        let mut bytes = [0u8; 8];
        let id = match getrandom::fill(&mut bytes) {
            Ok(()) => format!("sess-{}", hex(&bytes)),
            Err(_) => {
                let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
                format!("sess-{nanos:016x}")
            }
        };

        if previous != Some(id.as_str()) {
            return id;
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
