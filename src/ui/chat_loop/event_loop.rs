//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop owns the [`App`] outright. Terminal input, timer ticks, and
//! task completions all become [`AppAction`]s on one queue, which is drained
//! and applied between frames. Commands returned by the reducer are handed
//! to the executors and side effects to the persistence worker, so the
//! loop itself never blocks on the network or the filesystem.

use std::{
    error::Error,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppActionEnvelope};
use crate::ui::renderer::ui;

use super::executors::persistence::PersistenceWorker;
use super::executors::{spawn_app_command, Collaborators, ExecutorContext};
use super::lifecycle::{restore_terminal, setup_terminal};

const MAX_FPS: u64 = 30;
const TICK_INTERVAL: Duration = Duration::from_millis(100);
const PERSIST_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn translate_event(event: UiEvent) -> Option<AppAction> {
    match event {
        UiEvent::Crossterm(Event::Key(key)) => Some(AppAction::Key(key)),
        UiEvent::Crossterm(Event::Resize(width, height)) => {
            Some(AppAction::Resize { width, height })
        }
        UiEvent::Crossterm(_) => None,
    }
}

/// Move pending terminal events onto the action queue. Returns whether any
/// event was seen.
fn process_ui_events(
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    executor: &mut ExecutorContext,
) -> bool {
    let mut seen = false;
    while let Ok(event) = event_rx.try_recv() {
        seen = true;
        let Some(action) = translate_event(event) else {
            continue;
        };
        if let AppAction::Resize { width, height } = action {
            executor.term_width = width;
            executor.term_height = height;
        }
        dispatcher.dispatch_many([action], executor.action_context());
    }
    seen
}

fn drain_action_queue(
    app: &mut App,
    executor: &ExecutorContext,
    persistence: &PersistenceWorker,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = apply_actions(app, pending);
    for command in commands {
        debug!(?command, "spawning command");
        spawn_app_command(executor, command);
    }
    for effect in app.take_side_effects() {
        persistence.submit(effect);
    }
    true
}

pub async fn run_chat(mut app: App, collaborators: Collaborators) -> Result<(), Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let mut executor = ExecutorContext::new(collaborators.clone(), dispatcher.clone());
    let persistence = PersistenceWorker::spawn(collaborators.sessions.clone());

    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;
    executor.term_width = size.width;
    executor.term_height = size.height;
    dispatcher.dispatch_many(
        [AppAction::Resize {
            width: size.width,
            height: size.height,
        }],
        executor.action_context(),
    );

    let cancel = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx, cancel.clone());

    info!(
        session = %app.session.session_id,
        character = %app.session.character.id,
        "chat session started"
    );

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut last_tick = Instant::now();
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.exit_requested {
            break Ok(());
        }

        if request_redraw && last_draw.elapsed() >= frame_duration {
            if let Err(err) = terminal.draw(|f| ui(f, &app)) {
                break Err(err.into());
            }
            last_draw = Instant::now();
            request_redraw = false;
        }

        let events_processed = process_ui_events(&mut event_rx, &dispatcher, &mut executor);

        let now = Instant::now();
        if now.duration_since(last_tick) >= TICK_INTERVAL {
            dispatcher.dispatch_many([AppAction::Tick { now }], executor.action_context());
            last_tick = now;
        }

        let actions_applied =
            drain_action_queue(&mut app, &executor, &persistence, &mut action_rx);
        if actions_applied {
            request_redraw = true;
        }

        if !events_processed && !actions_applied {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    cancel.cancel();
    let _ = event_reader_handle.await;
    let restored = restore_terminal(&mut terminal);

    for effect in app.take_side_effects() {
        persistence.submit(effect);
    }
    if !persistence.shutdown(PERSIST_FLUSH_TIMEOUT).await {
        eprintln!("⚠️  Some session writes did not finish before exit.");
    }
    info!(session = %app.session.session_id, "chat session ended");

    restored?;
    result
}
