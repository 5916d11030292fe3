use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{command, AppActionContext, AppCommand};
use crate::api::BackendRequest;
use crate::commands::is_command;
use crate::core::app::ui_state::CHROME_HEIGHT;
use crate::core::app::{App, Phase};
use crate::core::message::Message;
use crate::core::session::Speaker;

pub(super) fn handle_key(
    app: &mut App,
    key: KeyEvent,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    if key.kind == KeyEventKind::Release || !app.is_ready() || app.exit_requested {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.request_exit();
        return None;
    }

    if key.code == KeyCode::Tab {
        app.toggle_focus();
        return None;
    }

    if !app.is_input_focused() {
        handle_transcript_key(app, key, ctx);
        return None;
    }

    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.ui.apply_textarea_edit(|textarea| textarea.insert_newline());
            None
        }
        KeyCode::Enter => submit(app),
        KeyCode::Up => {
            browse_previous(app);
            None
        }
        KeyCode::Down => {
            browse_next(app);
            None
        }
        KeyCode::PageUp | KeyCode::PageDown => {
            handle_transcript_key(app, key, ctx);
            None
        }
        _ => {
            app.ui
                .apply_textarea_edit(|textarea| {
                    textarea.input(tui_textarea::Input::from(key));
                });
            None
        }
    }
}

fn handle_transcript_key(app: &mut App, key: KeyEvent, ctx: AppActionContext) {
    let page = page_size(app, ctx);
    match key.code {
        KeyCode::Up => app.ui.scroll_up(1),
        KeyCode::Down => app.ui.scroll_down(1),
        KeyCode::PageUp => app.ui.scroll_up(page),
        KeyCode::PageDown => app.ui.scroll_down(page),
        KeyCode::End => app.ui.scroll_back = 0,
        _ => {}
    }
}

fn page_size(app: &App, ctx: AppActionContext) -> u16 {
    if ctx.term_height > 0 {
        ctx.term_height.saturating_sub(CHROME_HEIGHT).max(1)
    } else {
        app.ui.page_height()
    }
}

fn browse_previous(app: &mut App) {
    if app.is_processing() {
        return;
    }
    let draft = app.ui.get_input_text();
    if let Some(entry) = app.history.previous(&draft) {
        app.ui.set_input_text(&entry);
    }
}

fn browse_next(app: &mut App) {
    if app.is_processing() {
        return;
    }
    if let Some(entry) = app.history.next() {
        app.ui.set_input_text(&entry);
    }
}

/// Submit the draft. Ignored while a request is outstanding so the draft survives.
fn submit(app: &mut App) -> Option<AppCommand> {
    if app.is_processing() {
        return None;
    }

    let text = app.ui.get_input_text();
    if text.trim().is_empty() {
        return None;
    }

    app.history.append(text.clone());
    app.ui.clear_input();

    if is_command(&text) {
        command::handle_command_line(app, &text)
    } else {
        send_message(app, text.trim().to_string())
    }
}

fn send_message(app: &mut App, text: String) -> Option<AppCommand> {
    let context = app.session.context.turns.clone();

    app.ui.push_message(Message::user(text.clone()));
    app.ui.scroll_back = 0;
    app.session.context.push(Speaker::User, text.clone());
    app.session.metrics.total_requests += 1;
    app.begin_processing(Phase::AwaitingResponse);

    let session = &app.session;
    Some(AppCommand::CallBackend {
        session_id: session.session_id.clone(),
        request: BackendRequest {
            character_id: session.character.id.clone(),
            user_id: session.user_id.clone(),
            message: text,
            scenario_id: session.scenario_id.clone(),
            session_id: session.session_id.clone(),
            context,
        },
    })
}
