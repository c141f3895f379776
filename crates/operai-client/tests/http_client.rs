//! AssistantClient against a local axum server with canned replies.

use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use operai_client::{
    execute_with_timeout, AssistantClient, AssistantMode, ClientConfig, ClientError, Conversation,
};
use operai_core::{ExecuteRequest, Resolution, SessionId, FALLBACK_REPLY};

/// Serve `app` on an ephemeral port and return its root URL.
async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn execute_handler(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    Json(json!({
        "response": format!("Handled: {}", body["message"].as_str().unwrap_or("")),
        "thought": auth,
        "actions_executed": [
            {
                "action": "list_user_tasks",
                "success": true,
                "details": {
                    "user": "Dana",
                    "count": 1,
                    "tasks": [{"title": "Write report", "status": "todo", "priority": "high"}]
                }
            }
        ],
        "session_id": body["session_id"]
    }))
}

fn assistant_router() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Json(json!({"message": "OperAI WorkforceOS API", "version": "1.0"})) }),
        )
        .route("/api/ai/execute", post(execute_handler))
        .route(
            "/api/ai/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"response": "Plain answer", "session_id": body["session_id"]}))
            }),
        )
        .route(
            "/api/ai/history",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                let session = params.get("session_id").cloned().unwrap_or_default();
                Json(json!([
                    {
                        "message": "second",
                        "response": "two",
                        "session_id": session,
                        "action_type": "execute",
                        "created_at": "2025-01-02T10:00:00+00:00"
                    },
                    {
                        "message": "first",
                        "response": "one",
                        "session_id": session,
                        "created_at": "2025-01-02T09:00:00+00:00"
                    }
                ]))
            }),
        )
}

#[tokio::test]
async fn test_execute_round_trip() {
    let url = spawn_server(assistant_router()).await;
    let client = AssistantClient::new(&ClientConfig::new(&url).with_token("secret")).unwrap();

    let request = ExecuteRequest::new("show my tasks", SessionId::new("session_http"));
    let reply = client.send_command(&request).await.unwrap();

    assert_eq!(reply.content, "Handled: show my tasks");
    assert_eq!(reply.thought.as_deref(), Some("Bearer secret"));
    assert_eq!(reply.actions.len(), 1);
    assert_eq!(reply.actions[0].label(), "LIST USER TASKS");
}

#[tokio::test]
async fn test_plain_chat_mode() {
    let url = spawn_server(assistant_router()).await;
    let config = ClientConfig::new(&url).with_mode(AssistantMode::Chat);
    let client = AssistantClient::new(&config).unwrap();

    let request = ExecuteRequest::new("hello", SessionId::generate());
    let reply = client.send_command(&request).await.unwrap();

    assert_eq!(reply.content, "Plain answer");
    assert!(reply.actions.is_empty());
}

#[tokio::test]
async fn test_server_error_becomes_fallback() {
    let app = Router::new().route(
        "/api/ai/execute",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "AI service error: boom"})),
            )
        }),
    );
    let url = spawn_server(app).await;
    let client = AssistantClient::new(&ClientConfig::new(&url)).unwrap();

    let request = ExecuteRequest::new("do it", SessionId::generate());
    match client.send_command(&request).await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("Expected status error, got {:?}", other),
    }

    let mut conversation = Conversation::new(client, Duration::from_secs(5));
    let resolution = conversation.send("do it").await;
    assert!(matches!(resolution, Some(Resolution::Failed { .. })));
    assert_eq!(
        conversation.session().messages().last().unwrap().content,
        FALLBACK_REPLY
    );
}

#[tokio::test]
async fn test_non_json_body_degrades_to_raw_text() {
    let app = Router::new().route("/api/ai/execute", post(|| async { "upstream says hi" }));
    let url = spawn_server(app).await;
    let client = AssistantClient::new(&ClientConfig::new(&url)).unwrap();

    let request = ExecuteRequest::new("anything", SessionId::generate());
    let reply = client.send_command(&request).await.unwrap();

    assert_eq!(reply.content, "upstream says hi");
    assert!(reply.actions.is_empty());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let app = Router::new().route(
        "/api/ai/execute",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let url = spawn_server(app).await;
    let client = AssistantClient::new(&ClientConfig::new(&url)).unwrap();

    let request = ExecuteRequest::new("slow", SessionId::generate());
    let outcome = execute_with_timeout(&client, &request, Duration::from_millis(200)).await;

    assert!(matches!(outcome, Err(ClientError::Timeout(_))));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AssistantClient::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();
    let request = ExecuteRequest::new("hello", SessionId::generate());

    assert!(matches!(
        client.send_command(&request).await,
        Err(ClientError::Connection(_))
    ));
}

#[tokio::test]
async fn test_history_and_health() {
    let url = spawn_server(assistant_router()).await;
    let client = AssistantClient::new(&ClientConfig::new(&url)).unwrap();

    assert!(client.health().await.unwrap());

    let session = SessionId::new("session_hist");
    let history = client.history(Some(&session)).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "second");
    assert_eq!(history[0].session_id.as_deref(), Some("session_hist"));
    assert_eq!(history[0].action_type.as_deref(), Some("execute"));
    assert!(history[1].created_at().is_some());
}
