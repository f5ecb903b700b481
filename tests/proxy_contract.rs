//! Contract of `POST /api/maop` against a stubbed platform client.
//!
//! - every known action answers 200 with the client's result, after exactly
//!   one call to the matching operation
//! - unknown actions answer 400 `{"error": "Invalid action"}`
//! - client failures answer 500 with an `error` field
//! - `updateAgent` pins the agent's tools unless pinning is disabled

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use maop_console::config::{DEFAULT_PINNED_AGENT_TOOL, ProxyConfig};
use maop_console::gateway::{self, GatewayState};
use maop_console::proxy::{Action, ActionProxy};
use maop_console::testing::StubMaop;

fn app(stub: Arc<StubMaop>, config: ProxyConfig) -> Router {
    gateway::router(GatewayState::new(ActionProxy::new(stub, config)), None)
}

async fn post(app: Router, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/maop")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// A payload carrying every field any action reads.
fn full_payload() -> Value {
    json!({
        "toolId": "tool-1",
        "agentId": "agent-1",
        "tool": { "nameForHuman": "Tool" },
        "agent": { "nameForHuman": "Agent", "tools": ["tool-1"] }
    })
}

#[tokio::test]
async fn every_action_reaches_its_operation() {
    let expected = [
        (Action::TestRunTool, "tools.testRun"),
        (Action::TestRunAgent, "agents.testRun"),
        (Action::UpdateTool, "tools.update"),
        (Action::UpdateAgent, "agents.update"),
        (Action::CreateTool, "tools.create"),
        (Action::CreateAgent, "agents.create"),
        (Action::ListTools, "tools.list"),
        (Action::ListAgents, "agents.list"),
        (Action::DeleteTool, "tools.delete"),
        (Action::DeleteAgent, "agents.delete"),
        (Action::PublishTool, "tools.publishTool"),
        (Action::PublishAgent, "agents.publishAgent"),
        (Action::GetChatUrl, "getLoginUrl"),
    ];
    assert_eq!(expected.len(), Action::ALL.len());

    for (action, operation) in expected {
        let canned = json!({ "data": { "for": action.as_str() } });
        let stub = Arc::new(StubMaop::new(canned.clone()));

        let (status, body) = post(
            app(stub.clone(), ProxyConfig::default()),
            json!({ "action": action.as_str(), "payload": full_payload() }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{action}");
        assert_eq!(body, canned, "{action}");
        let calls = stub.calls();
        assert_eq!(calls.len(), 1, "{action}");
        assert_eq!(calls[0].operation, operation, "{action}");
    }
}

#[tokio::test]
async fn chat_url_string_is_returned_as_json_string() {
    let stub = Arc::new(StubMaop::new(json!("https://chat.example.com/s/1")));

    let (status, body) = post(
        app(stub.clone(), ProxyConfig::default()),
        json!({ "action": "getChatUrl", "payload": { "agentId": "agent-1" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("https://chat.example.com/s/1"));
    assert_eq!(stub.last_call().unwrap().args, vec![json!({ "agentId": "agent-1" })]);
}

#[tokio::test]
async fn unknown_actions_are_rejected() {
    for action in [json!("removeEverything"), json!("ListTools"), json!(""), json!(null)] {
        let stub = Arc::new(StubMaop::default());
        let (status, body) = post(
            app(stub.clone(), ProxyConfig::default()),
            json!({ "action": action, "payload": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{action}");
        assert_eq!(body, json!({ "error": "Invalid action" }), "{action}");
        assert_eq!(stub.call_count(), 0);
    }
}

#[tokio::test]
async fn client_failures_are_server_errors() {
    for stub in [StubMaop::failing(), StubMaop::failing_transport()] {
        let (status, body) = post(
            app(Arc::new(stub), ProxyConfig::default()),
            json!({ "action": "listTools" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("error").is_some(), "{body}");
        assert!(body["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn missing_payload_field_is_server_error() {
    let stub = Arc::new(StubMaop::default());
    let (status, body) = post(
        app(stub.clone(), ProxyConfig::default()),
        json!({ "action": "publishTool", "payload": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "missing_field");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn update_agent_overwrites_tools_with_pinned_id() {
    let stub = Arc::new(StubMaop::default());
    let (status, _) = post(
        app(stub.clone(), ProxyConfig::default()),
        json!({
            "action": "updateAgent",
            "payload": {
                "agentId": "agent-1",
                "agent": { "nameForHuman": "Agent", "tools": ["tool-a", "tool-b"] }
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let call = stub.last_call().unwrap();
    assert_eq!(call.args[0], json!("agent-1"));
    assert_eq!(call.args[1]["tools"], json!([DEFAULT_PINNED_AGENT_TOOL]));
    assert_eq!(call.args[1]["tools"], json!(["67a49afda9575c4df9397def"]));
    assert_eq!(call.args[1]["nameForHuman"], "Agent");
}

#[tokio::test]
async fn update_agent_keeps_tools_when_unpinned() {
    let stub = Arc::new(StubMaop::default());
    let (status, _) = post(
        app(stub.clone(), ProxyConfig::unpinned()),
        json!({
            "action": "updateAgent",
            "payload": {
                "agentId": "agent-1",
                "agent": { "tools": ["tool-a"] }
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stub.last_call().unwrap().args[1], json!({ "tools": ["tool-a"] }));
}
