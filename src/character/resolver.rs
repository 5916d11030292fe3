//! Fuzzy lookup of characters by partial id or name.
//!
//! Resolution walks a fixed ladder of matching rules and stops at the first
//! rule that singles out exactly one catalog entry:
//!
//! 1. exact id
//! 2. exact name
//! 3. id prefix
//! 4. name prefix (only when no id prefix matched)
//! 5. substring of id or name (only when no name prefix matched)
//!
//! All comparisons are case-insensitive. When a prefix or substring rule
//! matches several entries the lookup is ambiguous and the caller has to ask
//! the user to narrow it down; there is no tie-break.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lightweight `{id, name}` pair used for resolution only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// More than one entry matched; candidates are rendered as `name (id)`.
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
    NotFound {
        query: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Ambiguous { query, candidates } => write!(
                f,
                "'{}' matches multiple characters: {}",
                query,
                candidates.join(", ")
            ),
            ResolveError::NotFound { query } => write!(f, "No character matches '{}'", query),
        }
    }
}

impl std::error::Error for ResolveError {}

pub fn resolve<'a>(
    query: &str,
    catalog: &'a [CatalogEntry],
) -> Result<&'a CatalogEntry, ResolveError> {
    let trimmed = query.trim();
    let not_found = || ResolveError::NotFound {
        query: trimmed.to_string(),
    };

    if trimmed.is_empty() || catalog.is_empty() {
        return Err(not_found());
    }

    let needle = trimmed.to_lowercase();
    let folded: Vec<(String, String)> = catalog
        .iter()
        .map(|entry| (entry.id.to_lowercase(), entry.name.to_lowercase()))
        .collect();

    let select = |pred: &dyn Fn(&str, &str) -> bool| -> Vec<&'a CatalogEntry> {
        catalog
            .iter()
            .zip(folded.iter())
            .filter(|(_, (id, name))| pred(id.as_str(), name.as_str()))
            .map(|(entry, _)| entry)
            .collect()
    };

    let exact_id = select(&|id, _| id == needle);
    if let [only] = exact_id.as_slice() {
        return Ok(*only);
    }

    let exact_name = select(&|_, name| name == needle);
    if let [only] = exact_name.as_slice() {
        return Ok(*only);
    }

    let ladder: [&dyn Fn(&str, &str) -> bool; 3] = [
        &|id, _| id.starts_with(&needle),
        &|_, name| name.starts_with(&needle),
        &|id, name| id.contains(&needle) || name.contains(&needle),
    ];

    for rule in ladder {
        match select(rule).as_slice() {
            [] => continue,
            [only] => return Ok(*only),
            many => {
                return Err(ResolveError::Ambiguous {
                    query: trimmed.to_string(),
                    candidates: many.iter().map(|entry| entry.label()).collect(),
                })
            }
        }
    }

    Err(not_found())
}
