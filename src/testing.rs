//! Test doubles for the MAOP platform client.
//!
//! Provides:
//! - [`StubMaop`]: a [`MaopApi`] that records every call and returns a canned
//!   response, or fails on demand
//! - [`RecordedCall`]: one recorded operation with its arguments
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use maop_console::config::ProxyConfig;
//! use maop_console::proxy::{ActionEnvelope, ActionProxy};
//! use maop_console::testing::StubMaop;
//!
//! # async fn example() {
//! let stub = Arc::new(StubMaop::new(serde_json::json!({ "data": { "docs": [] } })));
//! let proxy = ActionProxy::new(stub.clone(), ProxyConfig::default());
//! proxy
//!     .handle(ActionEnvelope::new("listTools", serde_json::Value::Null))
//!     .await
//!     .unwrap();
//! assert_eq!(stub.last_call().unwrap().operation, "tools.list");
//! # }
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::MaopError;
use crate::maop::{AgentTestRun, ListQuery, LoginUrlRequest, MaopApi, ToolTestRun};

/// What kind of error the stub should produce when failing.
#[derive(Clone, Copy, Debug)]
pub enum StubErrorKind {
    /// The platform answered with HTTP 502 (`MaopError::Api`).
    Api,
    /// The request never reached the platform (`MaopError::Request`).
    Transport,
}

/// One operation performed against the stub.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Operation name, e.g. `tools.update` or `getLoginUrl`.
    pub operation: &'static str,
    /// Arguments in call order, serialized to JSON.
    pub args: Vec<Value>,
}

/// A recording [`MaopApi`] stub.
pub struct StubMaop {
    response: Value,
    calls: Mutex<Vec<RecordedCall>>,
    should_fail: AtomicBool,
    error_kind: StubErrorKind,
}

impl StubMaop {
    /// Create a stub that answers every operation with `response`.
    pub fn new(response: Value) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
            error_kind: StubErrorKind::Api,
        }
    }

    /// Create a stub that always fails with an API error.
    pub fn failing() -> Self {
        let stub = Self::new(Value::Null);
        stub.set_failing(true);
        stub
    }

    /// Create a stub that always fails with a transport error.
    pub fn failing_transport() -> Self {
        Self {
            error_kind: StubErrorKind::Transport,
            ..Self::failing()
        }
    }

    /// Toggle whether calls should fail at runtime.
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock_calls().last().cloned()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        // A panicking test thread must not hide the calls from others.
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, operation: &'static str, args: Vec<Value>) -> Result<Value, MaopError> {
        self.lock_calls().push(RecordedCall { operation, args });

        if !self.should_fail.load(Ordering::Relaxed) {
            return Ok(self.response.clone());
        }
        Err(match self.error_kind {
            StubErrorKind::Api => MaopError::Api {
                operation: operation.to_string(),
                status: 502,
                body: json!({ "message": "stub failure" }),
            },
            StubErrorKind::Transport => MaopError::Request {
                operation: operation.to_string(),
                reason: "connection refused".to_string(),
            },
        })
    }
}

impl Default for StubMaop {
    fn default() -> Self {
        Self::new(json!({ "ok": true }))
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[async_trait]
impl MaopApi for StubMaop {
    async fn tools_list(&self, query: &ListQuery) -> Result<Value, MaopError> {
        self.record("tools.list", vec![to_json(query)])
    }

    async fn tools_create(&self, tool: &Value) -> Result<Value, MaopError> {
        self.record("tools.create", vec![tool.clone()])
    }

    async fn tools_update(&self, tool_id: &str, tool: &Value) -> Result<Value, MaopError> {
        self.record("tools.update", vec![json!(tool_id), tool.clone()])
    }

    async fn tools_delete(&self, tool_id: &str) -> Result<Value, MaopError> {
        self.record("tools.delete", vec![json!(tool_id)])
    }

    async fn tools_publish(&self, tool_id: &str) -> Result<Value, MaopError> {
        self.record("tools.publishTool", vec![json!(tool_id)])
    }

    async fn tools_test_run(
        &self,
        tool_id: &str,
        request: &ToolTestRun,
    ) -> Result<Value, MaopError> {
        self.record("tools.testRun", vec![json!(tool_id), to_json(request)])
    }

    async fn agents_list(&self, query: &ListQuery) -> Result<Value, MaopError> {
        self.record("agents.list", vec![to_json(query)])
    }

    async fn agents_create(&self, agent: &Value) -> Result<Value, MaopError> {
        self.record("agents.create", vec![agent.clone()])
    }

    async fn agents_update(&self, agent_id: &str, agent: &Value) -> Result<Value, MaopError> {
        self.record("agents.update", vec![json!(agent_id), agent.clone()])
    }

    async fn agents_delete(&self, agent_id: &str) -> Result<Value, MaopError> {
        self.record("agents.delete", vec![json!(agent_id)])
    }

    async fn agents_publish(&self, agent_id: &str) -> Result<Value, MaopError> {
        self.record("agents.publishAgent", vec![json!(agent_id)])
    }

    async fn agents_test_run(&self, request: &AgentTestRun) -> Result<Value, MaopError> {
        self.record("agents.testRun", vec![to_json(request)])
    }

    async fn login_url(&self, request: &LoginUrlRequest) -> Result<Value, MaopError> {
        self.record("getLoginUrl", vec![to_json(request)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_and_toggles() {
        let stub = StubMaop::new(json!("hello"));
        assert_eq!(stub.tools_delete("t1").await.unwrap(), json!("hello"));

        stub.set_failing(true);
        let err = stub.agents_delete("a1").await.unwrap_err();
        assert!(matches!(err, MaopError::Api { status: 502, .. }));

        let calls = stub.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, "tools.delete");
        assert_eq!(calls[1].args, vec![json!("a1")]);
    }

    #[tokio::test]
    async fn test_failing_transport_kind() {
        let stub = StubMaop::failing_transport();
        let err = stub
            .tools_list(&ListQuery { is_public: false })
            .await
            .unwrap_err();
        assert!(matches!(err, MaopError::Request { .. }));
    }
}
