use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::BackendRequest;
use crate::core::app::AppAction;

use super::ExecutorContext;

pub fn spawn_backend_call(
    ctx: ExecutorContext,
    session_id: String,
    request: BackendRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(
            session = %session_id,
            character = %request.character_id,
            context_turns = request.context.len(),
            "sending message to backend"
        );
        let result = ctx.collaborators.backend.process_request(request).await;
        ctx.dispatcher.dispatch_many(
            [AppAction::ResponseReceived { session_id, result }],
            ctx.action_context(),
        );
    })
}

pub fn spawn_character_fetch(
    ctx: ExecutorContext,
    session_id: String,
    character_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = ctx
            .collaborators
            .backend
            .get_character(&character_id)
            .await;
        ctx.dispatcher.dispatch_many(
            [AppAction::CharacterInfoLoaded { session_id, result }],
            ctx.action_context(),
        );
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::api::BackendError;
    use crate::core::app::AppActionDispatcher;
    use crate::ui::chat_loop::executors::Collaborators;
    use crate::utils::test_utils::{
        ok_response, sample_character, FakeBackend, MemoryCharacterStore, MemorySessionStore,
    };

    fn context_with(
        backend: FakeBackend,
    ) -> (
        ExecutorContext,
        mpsc::UnboundedReceiver<crate::core::app::AppActionEnvelope>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let collaborators = Collaborators {
            backend: Arc::new(backend),
            characters: Arc::new(MemoryCharacterStore::default()),
            sessions: Arc::new(MemorySessionStore::default()),
        };
        (
            ExecutorContext::new(collaborators, AppActionDispatcher::new(tx)),
            rx,
        )
    }

    fn request() -> BackendRequest {
        BackendRequest {
            character_id: "alice".into(),
            user_id: "tester".into(),
            message: "hi".into(),
            scenario_id: None,
            session_id: "s1".into(),
            context: Vec::new(),
        }
    }

    #[tokio::test]
    async fn backend_call_reports_response_for_its_session() {
        let backend = FakeBackend::new().with_response(Ok(ok_response("hello", true, 12)));
        let (ctx, mut rx) = context_with(backend);

        spawn_backend_call(ctx, "s1".into(), request())
            .await
            .unwrap();

        let envelope = rx.recv().await.unwrap();
        match envelope.action {
            AppAction::ResponseReceived { session_id, result } => {
                assert_eq!(session_id, "s1");
                let response = result.unwrap();
                assert_eq!(response.content, "hello");
                assert!(response.cache_metrics.hit);
            }
            _ => panic!("expected a response action"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn backend_failure_is_delivered_as_action() {
        let backend = FakeBackend::new().with_response(Err(BackendError::Status {
            status: 500,
            body: "boom".into(),
        }));
        let (ctx, mut rx) = context_with(backend);

        spawn_backend_call(ctx, "s1".into(), request())
            .await
            .unwrap();

        match rx.recv().await.unwrap().action {
            AppAction::ResponseReceived { result, .. } => {
                assert!(matches!(result, Err(BackendError::Status { status: 500, .. })));
            }
            _ => panic!("expected a response action"),
        }
    }

    #[tokio::test]
    async fn character_fetch_reports_backend_copy() {
        let mut alice = sample_character("alice", "Alice");
        alice.mood.joy = 0.9;
        let (ctx, mut rx) = context_with(FakeBackend::new().with_character(alice));

        spawn_character_fetch(ctx, "s1".into(), "alice".into())
            .await
            .unwrap();

        match rx.recv().await.unwrap().action {
            AppAction::CharacterInfoLoaded { session_id, result } => {
                assert_eq!(session_id, "s1");
                assert_eq!(result.unwrap().mood.joy, 0.9);
            }
            _ => panic!("expected a character info action"),
        }
    }
}
