//! Drives a [`ChatSession`] through one request/response round trip.

use std::time::Duration;

use tracing::{debug, info, warn};

use operai_core::{AssistantReply, ChatSession, ExecuteRequest, Resolution, SessionId};

use crate::error::ClientError;
use crate::executor::CommandExecutor;

/// Run one command through `executor`, failing with
/// [`ClientError::Timeout`] if no reply arrives within `timeout`.
pub async fn execute_with_timeout<E>(
    executor: &E,
    request: &ExecuteRequest,
    timeout: Duration,
) -> Result<AssistantReply, ClientError>
where
    E: CommandExecutor + ?Sized,
{
    match tokio::time::timeout(timeout, executor.execute(request)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(
                session_id = %request.session_id,
                timeout_secs = timeout.as_secs_f32(),
                "Command timed out"
            );
            Err(ClientError::Timeout(timeout))
        }
    }
}

/// A conversation bound to one executor.
///
/// Owns the session exclusively, so at most one request is ever
/// outstanding.
pub struct Conversation<E> {
    session: ChatSession,
    executor: E,
    timeout: Duration,
}

impl<E: CommandExecutor> Conversation<E> {
    /// Start a conversation with a fresh session id.
    pub fn new(executor: E, timeout: Duration) -> Self {
        Self::with_session(ChatSession::new(), executor, timeout)
    }

    /// Continue an existing session.
    pub fn with_session(session: ChatSession, executor: E, timeout: Duration) -> Self {
        Self {
            session,
            executor,
            timeout,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_id(&self) -> &SessionId {
        self.session.session_id()
    }

    /// Submit `input` and wait for the reply.
    ///
    /// Returns `None` when the input is rejected (empty, or busy); nothing
    /// is appended and no request is made in that case. Failures never
    /// escape: they come back as [`Resolution::Failed`].
    pub async fn send(&mut self, input: &str) -> Option<Resolution> {
        let request = match self.session.submit(input) {
            Ok(request) => request,
            Err(reason) => {
                debug!(reason = %reason, "Command rejected");
                return None;
            }
        };

        info!(session_id = %request.session_id, "Sending command");
        let outcome = execute_with_timeout(&self.executor, &request, self.timeout).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "Command failed");
        }

        // The session was put in Sending by submit above, so resolve cannot
        // report NoRequestInFlight here.
        self.session.resolve(outcome).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use operai_core::{ChatRole, FAILURE_NOTICE, FALLBACK_REPLY};

    /// Replies with a fixed body and counts calls.
    struct CannedExecutor {
        body: serde_json::Value,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandExecutor for CannedExecutor {
        async fn execute(
            &self,
            _request: &ExecuteRequest,
        ) -> Result<AssistantReply, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AssistantReply::from_value(self.body.clone()))
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl CommandExecutor for FailingExecutor {
        async fn execute(
            &self,
            _request: &ExecuteRequest,
        ) -> Result<AssistantReply, ClientError> {
            Err(ClientError::Connection("connection refused".to_string()))
        }
    }

    struct HangingExecutor;

    #[async_trait]
    impl CommandExecutor for HangingExecutor {
        async fn execute(
            &self,
            _request: &ExecuteRequest,
        ) -> Result<AssistantReply, ClientError> {
            std::future::pending().await
        }
    }

    fn canned(body: serde_json::Value) -> (CannedExecutor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CannedExecutor {
                body,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[tokio::test]
    async fn test_round_trip_appends_user_then_assistant() {
        let (executor, calls) = canned(json!({
            "message": "Done",
            "actionsExecuted": [
                {"action": "create_task", "success": true, "details": {"title": "X"}}
            ]
        }));
        let mut conversation = Conversation::new(executor, Duration::from_secs(5));

        let resolution = conversation.send("create task X").await;

        assert_eq!(
            resolution,
            Some(Resolution::Replied {
                actions: 1,
                failed: 0
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let messages = conversation.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "Done");
        assert_eq!(messages[1].actions[0].label(), "CREATE TASK");
        assert!(messages[1].actions[0].success);
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_request() {
        let (executor, calls) = canned(json!({"response": "unused"}));
        let mut conversation = Conversation::new(executor, Duration::from_secs(5));

        assert_eq!(conversation.send("   ").await, None);
        assert_eq!(conversation.send("").await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(conversation.session().messages().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_appends_fallback() {
        let mut conversation = Conversation::new(FailingExecutor, Duration::from_secs(5));

        let resolution = conversation.send("mark my attendance").await;

        match resolution {
            Some(Resolution::Failed { notice, cause }) => {
                assert_eq!(notice, FAILURE_NOTICE);
                assert!(cause.contains("connection refused"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
        let last = conversation.session().messages().last().unwrap();
        assert_eq!(last.content, FALLBACK_REPLY);
        assert!(last.actions.is_empty());
        assert!(!conversation.session().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_request_times_out() {
        let mut conversation = Conversation::new(HangingExecutor, Duration::from_secs(30));

        let resolution = conversation.send("list pending leaves").await;

        match resolution {
            Some(Resolution::Failed { cause, .. }) => assert!(cause.contains("30")),
            other => panic!("Expected timeout failure, got {:?}", other),
        }
        assert!(!conversation.session().is_busy());
        assert_eq!(conversation.session().messages().len(), 2);

        // The session accepts the next command after the timeout.
        let next = conversation.send("again").await;
        assert!(matches!(next, Some(Resolution::Failed { .. })));
        assert_eq!(conversation.session().messages().len(), 4);
    }

    #[tokio::test]
    async fn test_alternate_reply_shape_renders_the_same() {
        let (primary, _) = canned(json!({
            "message": "Ok",
            "actionsExecuted": [{"action": "apply_leave", "success": false, "error": "Overlap"}]
        }));
        let (alternate, _) = canned(json!({
            "explanation": "Ok",
            "actions": [{"action": "apply_leave", "success": false, "error": "Overlap"}]
        }));

        let mut a = Conversation::new(primary, Duration::from_secs(5));
        let mut b = Conversation::new(alternate, Duration::from_secs(5));
        a.send("apply leave").await;
        b.send("apply leave").await;

        let reply_a = &a.session().messages()[1];
        let reply_b = &b.session().messages()[1];
        assert_eq!(reply_a.content, reply_b.content);
        assert_eq!(reply_a.actions, reply_b.actions);
    }

    #[tokio::test]
    async fn test_requests_carry_the_session_id() {
        struct RecordingExecutor {
            seen: std::sync::Mutex<Vec<ExecuteRequest>>,
        }

        #[async_trait]
        impl CommandExecutor for RecordingExecutor {
            async fn execute(
                &self,
                request: &ExecuteRequest,
            ) -> Result<AssistantReply, ClientError> {
                self.seen.lock().unwrap().push(request.clone());
                Ok(AssistantReply::plain("ok"))
            }
        }

        let executor = RecordingExecutor {
            seen: std::sync::Mutex::new(Vec::new()),
        };
        let session = ChatSession::with_id(SessionId::new("session_fixed"));
        let mut conversation =
            Conversation::with_session(session, executor, Duration::from_secs(5));

        conversation.send(" one ").await;
        conversation.send("two").await;

        let seen = conversation.executor.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].message, "one");
        assert_eq!(seen[1].message, "two");
        assert!(seen.iter().all(|r| r.session_id.as_str() == "session_fixed"));
    }
}
