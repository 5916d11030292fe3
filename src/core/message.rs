use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Character,
    AppInfo,
    AppWarning,
    AppError,
}

/// A single transcript line as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Character => "character",
            TranscriptRole::AppInfo => "app/info",
            TranscriptRole::AppWarning => "app/warning",
            TranscriptRole::AppError => "app/error",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_character(self) -> bool {
        self == TranscriptRole::Character
    }

    pub fn is_app(self) -> bool {
        matches!(
            self,
            TranscriptRole::AppInfo | TranscriptRole::AppWarning | TranscriptRole::AppError
        )
    }

    pub fn app_kind(self) -> Option<AppMessageKind> {
        match self {
            TranscriptRole::AppInfo => Some(AppMessageKind::Info),
            TranscriptRole::AppWarning => Some(AppMessageKind::Warning),
            TranscriptRole::AppError => Some(AppMessageKind::Error),
            _ => None,
        }
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "character" => Ok(TranscriptRole::Character),
            "app/info" => Ok(TranscriptRole::AppInfo),
            "app/warning" => Ok(TranscriptRole::AppWarning),
            "app/error" => Ok(TranscriptRole::AppError),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

/// Severity for app-authored notices rendered in the transcript but never
/// sent to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMessageKind {
    /// Informational notice (command output, switch confirmations).
    Info,

    /// Something the user should look at but that changed nothing.
    Warning,

    /// A command or lookup failed.
    Error,
}

impl AppMessageKind {
    pub fn as_role(self) -> TranscriptRole {
        match self {
            AppMessageKind::Info => TranscriptRole::AppInfo,
            AppMessageKind::Warning => TranscriptRole::AppWarning,
            AppMessageKind::Error => TranscriptRole::AppError,
        }
    }
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn character(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Character, content)
    }

    pub fn app(kind: AppMessageKind, content: impl Into<String>) -> Self {
        Self::new(kind.as_role(), content)
    }

    pub fn is_app(&self) -> bool {
        self.role.is_app()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_kinds_map_to_app_roles() {
        for kind in [
            AppMessageKind::Info,
            AppMessageKind::Warning,
            AppMessageKind::Error,
        ] {
            let message = Message::app(kind, "notice");
            assert!(message.is_app());
            assert_eq!(message.role.app_kind(), Some(kind));
        }
        assert!(!Message::user("hi").is_app());
        assert!(Message::character("hello").role.is_character());
    }

    #[test]
    fn roles_serialize_as_strings() {
        let json = serde_json::to_string(&TranscriptRole::AppWarning).unwrap();
        assert_eq!(json, "\"app/warning\"");
        let parsed: TranscriptRole = serde_json::from_str("\"character\"").unwrap();
        assert_eq!(parsed, TranscriptRole::Character);
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(TranscriptRole::try_from("assistant").is_err());
    }
}
