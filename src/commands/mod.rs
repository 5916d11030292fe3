//! Slash command parsing and the payloads read-only commands produce.

pub mod handlers;
mod registry;

pub use registry::{all_commands, find_command, CommandName, CommandSpec};

use crate::character::{CatalogEntry, Character};
use crate::core::error::SessionError;

/// A fully parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Clear,
    List,
    Switch { query: String },
    Stats,
    Mood,
    Personality,
    Session,
}

/// Work a command needs done off the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    List,
    Switch {
        query: String,
        active_character_id: String,
    },
}

/// What an asynchronous command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Listed(Vec<CatalogEntry>),
    AlreadyActive(CatalogEntry),
    Loaded(Character),
    Failed(SessionError),
}

pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with('/')
}

/// Parse a line that starts with `/`.
///
/// Tokens are split on whitespace and the command name matches without
/// regard to case. Arity is checked here, so a malformed `/switch` is a
/// usage error before any character lookup happens.
pub fn parse_command(line: &str) -> Result<Command, SessionError> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next().unwrap_or("/");
    let args: Vec<&str> = tokens.collect();

    let spec = find_command(head).ok_or_else(|| SessionError::UnknownCommand(head.to_string()))?;
    if args.len() != spec.arity {
        return Err(SessionError::usage(spec.usage));
    }

    let command = match spec.kind {
        CommandName::Help => Command::Help,
        CommandName::Quit => Command::Quit,
        CommandName::Clear => Command::Clear,
        CommandName::List => Command::List,
        CommandName::Switch => Command::Switch {
            query: args[0].to_string(),
        },
        CommandName::Stats => Command::Stats,
        CommandName::Mood => Command::Mood,
        CommandName::Personality => Command::Personality,
        CommandName::Session => Command::Session,
    };
    Ok(command)
}

#[cfg(test)]
mod tests;
