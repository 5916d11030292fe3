//! Wire types and the collaborator trait for the character agent backend.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::core::session::Turn;

pub mod client;

pub use client::HttpAgentBackend;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackendRequest {
    pub character_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    pub session_id: String,
    /// Turns exchanged so far, oldest first, excluding `message`.
    pub context: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheMetrics {
    #[serde(default)]
    pub hit: bool,
    #[serde(default)]
    pub saved_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendResponse {
    pub content: String,
    #[serde(default)]
    pub cache_metrics: CacheMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    Transport(String),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body was not what we expected.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(cause) => write!(f, "request failed: {cause}"),
            BackendError::Status { status, body } => {
                if body.trim().is_empty() {
                    write!(f, "backend returned status {status}")
                } else {
                    write!(f, "backend returned status {status}: {}", body.trim())
                }
            }
            BackendError::Decode(cause) => write!(f, "invalid backend response: {cause}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// The remote agent that produces character replies.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn process_request(&self, request: BackendRequest)
        -> Result<BackendResponse, BackendError>;

    async fn get_character(&self, id: &str) -> Result<Character, BackendError>;

    /// Register `character` with the backend. Registering an existing id is
    /// not an error.
    async fn create_character(&self, character: &Character) -> Result<(), BackendError>;
}
