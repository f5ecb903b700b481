//! Wire types for the MAOP platform API.
//!
//! The proxy forwards payloads as raw JSON and never requires these. The
//! forms are for library callers that build requests in Rust; the CLI uses
//! the record and list types to decode list pages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method a tool calls its endpoint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

/// Fields submitted when creating or updating a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolForm {
    pub avatar: String,
    pub name_for_model: String,
    pub name_for_human: String,
    pub description_for_model: String,
    pub description_for_human: String,
    pub method: Method,
    pub url: String,
}

/// A prompt shortcut shown in an agent's chat.
///
/// The platform owns this shape; unknown fields are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields submitted when creating or updating an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentForm {
    pub avatar: String,
    pub name_for_model: String,
    pub name_for_human: String,
    pub description_for_model: String,
    pub description_for_human: String,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
    /// Tool ids the agent may call.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A tool as returned by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub name_for_model: String,
    #[serde(default)]
    pub name_for_human: String,
    #[serde(default)]
    pub description_for_model: String,
    #[serde(default)]
    pub description_for_human: String,
    #[serde(default)]
    pub method: Option<Method>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_public: bool,
}

/// An agent as returned by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub name_for_model: String,
    #[serde(default)]
    pub name_for_human: String,
    #[serde(default)]
    pub description_for_model: String,
    #[serde(default)]
    pub description_for_human: String,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Paginated list envelope: `{ "data": { "docs": [...] } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: ListPage<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    #[serde(default)]
    pub total_docs: Option<u64>,
}

/// Query for the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub is_public: bool,
}

/// Request body for a tool test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolTestRun {
    pub params: Vec<Value>,
    pub body: Value,
}

impl Default for ToolTestRun {
    /// No params and an empty object body.
    fn default() -> Self {
        Self {
            params: Vec::new(),
            body: Value::Object(Map::new()),
        }
    }
}

/// Request for an agent test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTestRun {
    pub agent_id: String,
    pub input: String,
}

/// Request for a chat login URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlRequest {
    pub agent_id: String,
}
