use std::fmt;

use crate::api::BackendError;
use crate::character::{ResolveError, StorageError};

/// Everything that can go wrong while handling user input. None of these end
/// the session; each is reported inline and the controller carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A command was malformed. Carries the usage line to show.
    Usage(String),

    /// No character matched the query.
    NotFound { query: String },

    /// Several characters matched; no action was taken.
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },

    /// The backend call failed. The request is not retried.
    Backend(String),

    /// The character catalog could not be read.
    Storage(String),

    /// A slash token that names no command.
    UnknownCommand(String),
}

impl SessionError {
    pub fn usage(usage: impl Into<String>) -> Self {
        SessionError::Usage(usage.into())
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Usage(usage) => write!(f, "Usage: {}", usage),
            SessionError::NotFound { query } => write!(
                f,
                "No character matches '{}'. Use /list to see available characters.",
                query
            ),
            SessionError::Ambiguous { query, candidates } => {
                write!(f, "'{}' matches several characters:", query)?;
                for candidate in candidates {
                    write!(f, "\n  • {}", candidate)?;
                }
                write!(f, "\nBe more specific, e.g. /switch <id>.")
            }
            SessionError::Backend(cause) => write!(f, "Backend error: {}", cause),
            SessionError::Storage(cause) => write!(
                f,
                "Character catalog unavailable: {}. Use /list to see available characters.",
                cause
            ),
            SessionError::UnknownCommand(token) => write!(
                f,
                "Unknown command '{}'. Type /help to see available commands.",
                token
            ),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ResolveError> for SessionError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Ambiguous { query, candidates } => {
                SessionError::Ambiguous { query, candidates }
            }
            ResolveError::NotFound { query } => SessionError::NotFound { query },
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        SessionError::Backend(err.to_string())
    }
}
