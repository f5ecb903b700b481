//! reqwest implementation of [`MaopApi`].

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::config::MaopConfig;
use crate::error::MaopError;
use crate::maop::{AgentTestRun, ListQuery, LoginUrlRequest, MaopApi, ToolTestRun};

/// Largest response body accepted from the platform.
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

const OPEN_USER_HEADER: &str = "X-Open-User-Id";

/// HTTP client for the MAOP platform API.
///
/// Cheap to share behind an `Arc`; the inner reqwest client pools
/// connections.
pub struct MaopClient {
    http: Client,
    config: MaopConfig,
}

impl std::fmt::Debug for MaopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaopClient")
            .field("config", &self.config)
            .finish()
    }
}

impl MaopClient {
    pub fn new(config: MaopConfig) -> Result<Self, MaopError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("maop-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MaopError::ClientBuild(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Resolve `segments` under the base URL, percent-encoding each one.
    fn resource_url(&self, segments: &[&str]) -> Result<Url, MaopError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MaopError::Request {
                operation: segments.join("/"),
                reason: format!("base URL '{}' cannot have a path", self.config.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.config.api_key())
            .header(OPEN_USER_HEADER, &self.config.open_user_id)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Value, MaopError> {
        tracing::debug!(operation, "Sending MAOP request");

        let response = request.send().await.map_err(|e| MaopError::Request {
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if let Some(len) = response.content_length()
            && len > MAX_RESPONSE_BYTES
        {
            return Err(MaopError::ResponseTooLarge {
                operation: operation.to_string(),
                size: len,
                max: MAX_RESPONSE_BYTES,
            });
        }

        // Content-Length may be absent or wrong; stop reading at the cap.
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = StreamExt::next(&mut stream).await {
            let chunk = chunk.map_err(|e| MaopError::Request {
                operation: operation.to_string(),
                reason: format!("failed to read response body: {e}"),
            })?;
            let size = (bytes.len() + chunk.len()) as u64;
            if size > MAX_RESPONSE_BYTES {
                return Err(MaopError::ResponseTooLarge {
                    operation: operation.to_string(),
                    size,
                    max: MAX_RESPONSE_BYTES,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(operation, status = %status, bytes = bytes.len(), "MAOP response");

        if !status.is_success() {
            return Err(MaopError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: decode_lenient(&bytes),
            });
        }

        decode_body(&bytes).ok_or_else(|| MaopError::InvalidResponse {
            operation: operation.to_string(),
            reason: format!("{} bytes of non-UTF-8, non-JSON data", bytes.len()),
        })
    }
}

/// Decode a success body: JSON if it parses, otherwise UTF-8 text as a
/// JSON string (the login URL endpoint may answer `text/plain`). Empty
/// bodies become `null`.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Some(Value::Null);
    }
    if let Ok(value) = serde_json::from_slice(bytes) {
        return Some(value);
    }
    std::str::from_utf8(bytes)
        .ok()
        .map(|s| Value::String(s.trim().to_string()))
}

/// Decode an error body, never failing.
fn decode_lenient(bytes: &[u8]) -> Value {
    decode_body(bytes)
        .unwrap_or_else(|| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn list_query(query: &ListQuery) -> [(&'static str, &'static str); 1] {
    [("isPublic", if query.is_public { "true" } else { "false" })]
}

#[async_trait]
impl MaopApi for MaopClient {
    async fn tools_list(&self, query: &ListQuery) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools"])?;
        let req = self.request(reqwest::Method::GET, url).query(&list_query(query));
        self.send("tools.list", req).await
    }

    async fn tools_create(&self, tool: &Value) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools"])?;
        let req = self.request(reqwest::Method::POST, url).json(tool);
        self.send("tools.create", req).await
    }

    async fn tools_update(&self, tool_id: &str, tool: &Value) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools", tool_id])?;
        let req = self.request(reqwest::Method::PUT, url).json(tool);
        self.send("tools.update", req).await
    }

    async fn tools_delete(&self, tool_id: &str) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools", tool_id])?;
        let req = self.request(reqwest::Method::DELETE, url);
        self.send("tools.delete", req).await
    }

    async fn tools_publish(&self, tool_id: &str) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools", tool_id, "publish"])?;
        let req = self.request(reqwest::Method::POST, url);
        self.send("tools.publishTool", req).await
    }

    async fn tools_test_run(
        &self,
        tool_id: &str,
        request: &ToolTestRun,
    ) -> Result<Value, MaopError> {
        let url = self.resource_url(&["tools", tool_id, "test-run"])?;
        let req = self.request(reqwest::Method::POST, url).json(request);
        self.send("tools.testRun", req).await
    }

    async fn agents_list(&self, query: &ListQuery) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents"])?;
        let req = self.request(reqwest::Method::GET, url).query(&list_query(query));
        self.send("agents.list", req).await
    }

    async fn agents_create(&self, agent: &Value) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents"])?;
        let req = self.request(reqwest::Method::POST, url).json(agent);
        self.send("agents.create", req).await
    }

    async fn agents_update(&self, agent_id: &str, agent: &Value) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents", agent_id])?;
        let req = self.request(reqwest::Method::PUT, url).json(agent);
        self.send("agents.update", req).await
    }

    async fn agents_delete(&self, agent_id: &str) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents", agent_id])?;
        let req = self.request(reqwest::Method::DELETE, url);
        self.send("agents.delete", req).await
    }

    async fn agents_publish(&self, agent_id: &str) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents", agent_id, "publish"])?;
        let req = self.request(reqwest::Method::POST, url);
        self.send("agents.publishAgent", req).await
    }

    async fn agents_test_run(&self, request: &AgentTestRun) -> Result<Value, MaopError> {
        let url = self.resource_url(&["agents", &request.agent_id, "test-run"])?;
        let body = serde_json::json!({ "input": request.input });
        let req = self.request(reqwest::Method::POST, url).json(&body);
        self.send("agents.testRun", req).await
    }

    async fn login_url(&self, request: &LoginUrlRequest) -> Result<Value, MaopError> {
        let url = self.resource_url(&["login-url"])?;
        let req = self
            .request(reqwest::Method::GET, url)
            .query(&[("agentId", request.agent_id.as_str())]);
        self.send("getLoginUrl", req).await
    }
}
