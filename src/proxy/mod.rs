//! Action dispatch for `POST /api/maop`.
//!
//! A request names one of a fixed set of [`Action`]s and carries an
//! unvalidated JSON `payload`. The proxy pulls the fields each action needs
//! out of the payload, performs exactly one [`MaopApi`] call and returns the
//! platform's response as is. There are no retries: one request, one call.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::maop::{AgentTestRun, ListQuery, LoginUrlRequest, MaopApi, ToolTestRun};

/// Input sent with every agent test run.
pub const AGENT_TEST_INPUT: &str = "Hi";

/// The actions the proxy accepts, one per platform operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TestRunTool,
    TestRunAgent,
    UpdateTool,
    UpdateAgent,
    CreateTool,
    CreateAgent,
    ListTools,
    ListAgents,
    DeleteTool,
    DeleteAgent,
    PublishTool,
    PublishAgent,
    GetChatUrl,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::TestRunTool,
        Action::TestRunAgent,
        Action::UpdateTool,
        Action::UpdateAgent,
        Action::CreateTool,
        Action::CreateAgent,
        Action::ListTools,
        Action::ListAgents,
        Action::DeleteTool,
        Action::DeleteAgent,
        Action::PublishTool,
        Action::PublishAgent,
        Action::GetChatUrl,
    ];

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestRunTool => "testRunTool",
            Self::TestRunAgent => "testRunAgent",
            Self::UpdateTool => "updateTool",
            Self::UpdateAgent => "updateAgent",
            Self::CreateTool => "createTool",
            Self::CreateAgent => "createAgent",
            Self::ListTools => "listTools",
            Self::ListAgents => "listAgents",
            Self::DeleteTool => "deleteTool",
            Self::DeleteAgent => "deleteAgent",
            Self::PublishTool => "publishTool",
            Self::PublishAgent => "publishAgent",
            Self::GetChatUrl => "getChatUrl",
        }
    }

    /// Look up an action by its exact (case-sensitive) wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(ProxyError::InvalidAction)
    }
}

/// The `{ action, payload }` request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEnvelope {
    /// `None` when the body has no string `action` field.
    pub action: Option<String>,
    /// `null` when absent.
    pub payload: Value,
}

impl ActionEnvelope {
    pub fn new(action: impl Into<String>, payload: Value) -> Self {
        Self {
            action: Some(action.into()),
            payload,
        }
    }

    /// Parse a raw request body.
    ///
    /// Only malformed JSON is rejected. A body that is valid JSON but not an
    /// object, or whose `action` is missing or not a string, yields an
    /// envelope without an action so it is answered as an invalid action.
    pub fn from_slice(body: &[u8]) -> Result<Self, ProxyError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                action: map
                    .get("action")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                payload: map.remove("payload").unwrap_or(Value::Null),
            },
            _ => Self {
                action: None,
                payload: Value::Null,
            },
        }
    }
}

/// Dispatches action envelopes to a [`MaopApi`] implementation.
pub struct ActionProxy {
    client: Arc<dyn MaopApi>,
    config: ProxyConfig,
}

impl ActionProxy {
    pub fn new(client: Arc<dyn MaopApi>, config: ProxyConfig) -> Self {
        Self { client, config }
    }

    /// Validate the action name and dispatch.
    pub async fn handle(&self, envelope: ActionEnvelope) -> Result<Value, ProxyError> {
        let name = envelope.action.as_deref().unwrap_or_default();
        let Some(action) = Action::parse(name) else {
            tracing::warn!(action = name, "Rejected unknown MAOP action");
            return Err(ProxyError::InvalidAction);
        };

        tracing::info!(%action, "Dispatching MAOP action");
        tracing::debug!(%action, payload = %envelope.payload, "MAOP action payload");

        match self.dispatch(action, envelope.payload).await {
            Ok(result) => {
                tracing::debug!(%action, result = %result, "MAOP action succeeded");
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(%action, error = %e, "MAOP action failed");
                Err(e)
            }
        }
    }

    /// Perform the single platform call `action` maps to.
    pub async fn dispatch(&self, action: Action, mut payload: Value) -> Result<Value, ProxyError> {
        let client = self.client.as_ref();

        let result = match action {
            Action::TestRunTool => {
                let tool_id = str_field(&payload, action, "toolId")?;
                client
                    .tools_test_run(tool_id, &ToolTestRun::default())
                    .await
            }
            Action::TestRunAgent => {
                let request = AgentTestRun {
                    agent_id: str_field(&payload, action, "agentId")?.to_string(),
                    input: AGENT_TEST_INPUT.to_string(),
                };
                client.agents_test_run(&request).await
            }
            Action::UpdateTool => {
                let tool_id = str_field(&payload, action, "toolId")?;
                let tool = value_field(&payload, action, "tool")?;
                client.tools_update(tool_id, tool).await
            }
            Action::UpdateAgent => {
                let agent_id = str_field(&payload, action, "agentId")?.to_string();
                let agent = payload
                    .get_mut("agent")
                    .filter(|v| v.is_object())
                    .ok_or(ProxyError::MissingField {
                        action: action.as_str(),
                        field: "agent",
                    })?;
                if let Some(tool_id) = &self.config.pinned_agent_tool {
                    let submitted = agent.get("tools").cloned().unwrap_or_default();
                    tracing::warn!(
                        agent_id = %agent_id,
                        submitted = %submitted,
                        pinned = %tool_id,
                        "Replacing agent tools with pinned tool id"
                    );
                    agent["tools"] = json!([tool_id]);
                }
                client.agents_update(&agent_id, agent).await
            }
            Action::CreateTool => client.tools_create(&payload).await,
            Action::CreateAgent => client.agents_create(&payload).await,
            Action::ListTools => client.tools_list(&ListQuery { is_public: false }).await,
            Action::ListAgents => client.agents_list(&ListQuery { is_public: false }).await,
            Action::DeleteTool => {
                client
                    .tools_delete(str_field(&payload, action, "toolId")?)
                    .await
            }
            Action::DeleteAgent => {
                client
                    .agents_delete(str_field(&payload, action, "agentId")?)
                    .await
            }
            Action::PublishTool => {
                client
                    .tools_publish(str_field(&payload, action, "toolId")?)
                    .await
            }
            Action::PublishAgent => {
                client
                    .agents_publish(str_field(&payload, action, "agentId")?)
                    .await
            }
            Action::GetChatUrl => {
                let request = LoginUrlRequest {
                    agent_id: str_field(&payload, action, "agentId")?.to_string(),
                };
                client.login_url(&request).await
            }
        };

        Ok(result?)
    }
}

fn value_field<'a>(
    payload: &'a Value,
    action: Action,
    field: &'static str,
) -> Result<&'a Value, ProxyError> {
    payload
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or(ProxyError::MissingField {
            action: action.as_str(),
            field,
        })
}

fn str_field<'a>(
    payload: &'a Value,
    action: Action,
    field: &'static str,
) -> Result<&'a str, ProxyError> {
    value_field(payload, action, field)?
        .as_str()
        .ok_or(ProxyError::MissingField {
            action: action.as_str(),
            field,
        })
}
