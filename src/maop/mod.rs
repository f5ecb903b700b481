//! Client for the MAOP agent platform.
//!
//! [`MaopApi`] is the seam the action proxy talks to. [`MaopClient`] is the
//! HTTP implementation; tests use [`crate::testing::StubMaop`].

mod client;
pub mod types;

pub use client::{MAX_RESPONSE_BYTES, MaopClient};
pub use types::{
    Agent, AgentForm, AgentTestRun, ListPage, ListQuery, ListResponse, LoginUrlRequest, Method,
    Shortcut, Tool, ToolForm, ToolTestRun,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::MaopError;

/// Operations the platform exposes for tools, agents and chat login.
///
/// Every operation returns the platform's JSON response untouched.
#[async_trait]
pub trait MaopApi: Send + Sync {
    async fn tools_list(&self, query: &ListQuery) -> Result<Value, MaopError>;

    async fn tools_create(&self, tool: &Value) -> Result<Value, MaopError>;

    async fn tools_update(&self, tool_id: &str, tool: &Value) -> Result<Value, MaopError>;

    async fn tools_delete(&self, tool_id: &str) -> Result<Value, MaopError>;

    /// Make a tool visible to other users of the platform.
    async fn tools_publish(&self, tool_id: &str) -> Result<Value, MaopError>;

    async fn tools_test_run(
        &self,
        tool_id: &str,
        request: &ToolTestRun,
    ) -> Result<Value, MaopError>;

    async fn agents_list(&self, query: &ListQuery) -> Result<Value, MaopError>;

    async fn agents_create(&self, agent: &Value) -> Result<Value, MaopError>;

    async fn agents_update(&self, agent_id: &str, agent: &Value) -> Result<Value, MaopError>;

    async fn agents_delete(&self, agent_id: &str) -> Result<Value, MaopError>;

    async fn agents_publish(&self, agent_id: &str) -> Result<Value, MaopError>;

    async fn agents_test_run(&self, request: &AgentTestRun) -> Result<Value, MaopError>;

    /// URL of a chat session with the given agent, logged in as the
    /// configured open user.
    async fn login_url(&self, request: &LoginUrlRequest) -> Result<Value, MaopError>;
}
