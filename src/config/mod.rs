//! Configuration resolved from environment variables.
//!
//! `main` loads `.env` with `dotenvy` before calling [`Config::from_env`], so
//! values can come from either the process environment or a local file.

mod gateway;
pub(crate) mod helpers;
mod maop;
mod proxy;

pub use gateway::GatewayConfig;
pub use maop::MaopConfig;
pub use proxy::{DEFAULT_PINNED_AGENT_TOOL, ProxyConfig};

use crate::error::ConfigError;

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub maop: MaopConfig,
    pub proxy: ProxyConfig,
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            maop: MaopConfig::resolve()?,
            proxy: ProxyConfig::resolve()?,
            gateway: GatewayConfig::resolve()?,
        })
    }
}
