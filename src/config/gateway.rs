use std::net::SocketAddr;

use crate::config::helpers::{optional_env, parse_optional_env};
use crate::error::ConfigError;

/// Web gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required on `/api/*` routes. No auth when unset.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.is_some())
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            auth_token: None,
        }
    }
}

impl GatewayConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: optional_env("GATEWAY_HOST")?.unwrap_or(defaults.host),
            port: parse_optional_env("GATEWAY_PORT", defaults.port)?,
            auth_token: optional_env("GATEWAY_AUTH_TOKEN")?,
        })
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "GATEWAY_HOST".to_string(),
                message: format!("'{}:{}' is not a socket address: {e}", self.host, self.port),
            })
    }
}
