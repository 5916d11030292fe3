/// Which command a slash token names, before its arguments are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Quit,
    Clear,
    List,
    Switch,
    Stats,
    Mood,
    Personality,
    Session,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub kind: CommandName,
    /// Exact number of arguments accepted.
    pub arity: usize,
}

pub fn all_commands() -> &'static [CommandSpec] {
    COMMANDS
}

/// Look up a command by name or alias, ignoring ASCII case and the leading slash.
pub fn find_command(token: &str) -> Option<&'static CommandSpec> {
    let token = token.strip_prefix('/').unwrap_or(token);
    all_commands().iter().find(|command| {
        command.name.eq_ignore_ascii_case(token)
            || command
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(token))
    })
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        aliases: &["h"],
        usage: "/help",
        help: "Show available commands and key bindings.",
        kind: CommandName::Help,
        arity: 0,
    },
    CommandSpec {
        name: "exit",
        aliases: &["quit", "q"],
        usage: "/exit",
        help: "Save the session and leave.",
        kind: CommandName::Quit,
        arity: 0,
    },
    CommandSpec {
        name: "clear",
        aliases: &["c"],
        usage: "/clear",
        help: "Clear the transcript and conversation context.",
        kind: CommandName::Clear,
        arity: 0,
    },
    CommandSpec {
        name: "list",
        aliases: &[],
        usage: "/list",
        help: "List available characters.",
        kind: CommandName::List,
        arity: 0,
    },
    CommandSpec {
        name: "switch",
        aliases: &[],
        usage: "/switch <name|id>",
        help: "Start a new session with another character.",
        kind: CommandName::Switch,
        arity: 1,
    },
    CommandSpec {
        name: "stats",
        aliases: &[],
        usage: "/stats",
        help: "Show request and cache statistics for this session.",
        kind: CommandName::Stats,
        arity: 0,
    },
    CommandSpec {
        name: "mood",
        aliases: &[],
        usage: "/mood",
        help: "Show the character's current mood.",
        kind: CommandName::Mood,
        arity: 0,
    },
    CommandSpec {
        name: "personality",
        aliases: &[],
        usage: "/personality",
        help: "Show the character's personality traits.",
        kind: CommandName::Personality,
        arity: 0,
    },
    CommandSpec {
        name: "session",
        aliases: &[],
        usage: "/session",
        help: "Show session identifiers and timing.",
        kind: CommandName::Session,
        arity: 0,
    },
];
