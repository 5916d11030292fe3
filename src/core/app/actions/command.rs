use tracing::info;

use super::AppCommand;
use crate::character::Character;
use crate::commands::handlers::{
    help_text, list_text, mood_text, personality_text, session_text, stats_text,
};
use crate::commands::{parse_command, Command, CommandOutcome, CommandRequest};
use crate::core::app::{App, Phase};
use crate::core::message::AppMessageKind;

/// Run a submitted `/...` line. Read-only commands answer immediately;
/// `/list` and `/switch` leave the controller awaiting their task.
pub(super) fn handle_command_line(app: &mut App, line: &str) -> Option<AppCommand> {
    app.phase = Phase::AwaitingCommand;

    let command = match parse_command(line) {
        Ok(command) => command,
        Err(err) => {
            app.report_error(&err);
            app.phase = Phase::Ready;
            return None;
        }
    };

    let request = match command {
        Command::Quit => {
            app.request_exit();
            None
        }
        Command::Clear => {
            clear_conversation(app);
            None
        }
        Command::Help => {
            app.notify(AppMessageKind::Info, help_text());
            None
        }
        Command::Stats => {
            app.notify(AppMessageKind::Info, stats_text(&app.session));
            None
        }
        Command::Mood => {
            app.notify(AppMessageKind::Info, mood_text(&app.session.character));
            None
        }
        Command::Personality => {
            app.notify(
                AppMessageKind::Info,
                personality_text(&app.session.character),
            );
            None
        }
        Command::Session => {
            app.notify(AppMessageKind::Info, session_text(&app.session));
            None
        }
        Command::List => Some(CommandRequest::List),
        Command::Switch { query } => Some(CommandRequest::Switch {
            query,
            active_character_id: app.session.character.id.clone(),
        }),
    };

    match request {
        Some(request) => {
            app.begin_processing(Phase::AwaitingCommand);
            Some(AppCommand::RunCommand {
                session_id: app.session.session_id.clone(),
                request,
            })
        }
        None => {
            app.phase = Phase::Ready;
            None
        }
    }
}

pub(super) fn handle_command_completed(
    app: &mut App,
    session_id: String,
    outcome: CommandOutcome,
) -> Option<AppCommand> {
    if !app.is_current_session(&session_id) || app.phase != Phase::AwaitingCommand {
        return None;
    }
    app.finish_processing();

    match outcome {
        CommandOutcome::Listed(entries) => {
            let text = list_text(&entries, &app.session.character.id);
            app.notify(AppMessageKind::Info, text);
        }
        CommandOutcome::AlreadyActive(entry) => {
            app.notify(
                AppMessageKind::Info,
                format!("Already talking to {}.", entry.label()),
            );
        }
        CommandOutcome::Loaded(character) => switch_character(app, character),
        CommandOutcome::Failed(err) => app.report_error(&err),
    }
    None
}

fn clear_conversation(app: &mut App) {
    app.ui.clear_transcript();
    app.session.context.clear();
    app.notify(AppMessageKind::Info, "Conversation cleared.");
    app.schedule_persist();
}

/// Persist the outgoing session, then start a fresh one with `character`.
fn switch_character(app: &mut App, character: Character) {
    app.schedule_persist();

    let previous = app.session.character.display_label();
    app.session.restart_with(character);
    info!(
        from = %previous,
        to = %app.session.character.display_label(),
        session = %app.session.session_id,
        "switched character"
    );

    app.ui.clear_transcript();
    app.notify(
        AppMessageKind::Info,
        format!(
            "Switched to {}. New session {}.",
            app.session.character.display_label(),
            app.session.session_id
        ),
    );
}
