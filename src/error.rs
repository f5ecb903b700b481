//! Error types for configuration, the platform client and the action proxy.

use axum::http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors starting or running the web gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {reason}")]
    StartupFailed { addr: String, reason: String },

    #[error("Gateway server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Errors returned by the MAOP platform client.
#[derive(Debug, Error)]
pub enum MaopError {
    /// The request never produced an HTTP response (DNS, TLS, timeout...).
    #[error("{operation} request failed: {reason}")]
    Request { operation: String, reason: String },

    /// The platform answered with a non-success status.
    #[error("{operation} returned HTTP {status}")]
    Api {
        operation: String,
        status: u16,
        /// Upstream body, parsed as JSON when possible.
        body: Value,
    },

    #[error("{operation} returned an invalid response: {reason}")]
    InvalidResponse { operation: String, reason: String },

    #[error("{operation} response too large: {size} bytes (max {max})")]
    ResponseTooLarge {
        operation: String,
        size: u64,
        max: u64,
    },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl MaopError {
    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request_failed",
            Self::Api { .. } => "api_error",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::ResponseTooLarge { .. } => "response_too_large",
            Self::ClientBuild(_) => "client_build",
        }
    }

    /// Serialize into the object placed under `error` in proxy responses.
    ///
    /// Upstream status and body are passed through untouched so callers see
    /// what the platform actually said.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Api { status, body, .. } => json!({
                "kind": self.kind(),
                "message": self.to_string(),
                "status": status,
                "body": body,
            }),
            _ => json!({
                "kind": self.kind(),
                "message": self.to_string(),
            }),
        }
    }
}

/// Errors produced while dispatching an action envelope.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid action")]
    InvalidAction,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Action '{action}' requires payload field '{field}'")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Upstream(#[from] MaopError),
}

impl ProxyError {
    /// HTTP status used when this error is returned by the gateway.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAction | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingField { .. } | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value placed under `error` in the response body.
    pub fn error_value(&self) -> Value {
        match self {
            Self::InvalidAction | Self::InvalidBody(_) => Value::String(self.to_string()),
            Self::MissingField { .. } => json!({
                "kind": "missing_field",
                "message": self.to_string(),
            }),
            Self::Upstream(e) => e.to_json(),
        }
    }

    /// Full `{ "error": ... }` response body.
    pub fn to_body(&self) -> Value {
        json!({ "error": self.error_value() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_body() {
        let err = ProxyError::InvalidAction;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_body(), json!({ "error": "Invalid action" }));
    }

    #[test]
    fn test_upstream_error_keeps_status_and_body() {
        let err = ProxyError::from(MaopError::Api {
            operation: "tools.delete".to_string(),
            status: 404,
            body: json!({ "message": "tool not found" }),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = err.to_body();
        assert_eq!(body["error"]["kind"], "api_error");
        assert_eq!(body["error"]["status"], 404);
        assert_eq!(body["error"]["body"]["message"], "tool not found");
        assert_eq!(
            body["error"]["message"],
            "tools.delete returned HTTP 404"
        );
    }

    #[test]
    fn test_missing_field_is_server_error() {
        let err = ProxyError::MissingField {
            action: "deleteTool",
            field: "toolId",
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_body()["error"]["kind"], "missing_field");
    }

    #[test]
    fn test_request_error_has_no_status() {
        let err = MaopError::Request {
            operation: "agents.list".to_string(),
            reason: "connection refused".to_string(),
        };
        let value = err.to_json();
        assert_eq!(value["kind"], "request_failed");
        assert!(value.get("status").is_none());
    }
}
