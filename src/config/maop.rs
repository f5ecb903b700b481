use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::helpers::{parse_optional_env, required_env};
use crate::error::ConfigError;

/// Connection settings for the MAOP platform API.
#[derive(Clone)]
pub struct MaopConfig {
    /// Base URL of the platform API. Always ends with `/` so relative
    /// resource paths join underneath it.
    pub base_url: Url,
    /// API key sent as a bearer token.
    pub api_key: SecretString,
    /// Open user id the platform scopes tools and agents to.
    pub open_user_id: String,
    /// Per-request timeout for platform calls.
    pub timeout: Duration,
}

impl std::fmt::Debug for MaopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaopConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("open_user_id", &self.open_user_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MaopConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Build a config from explicit values.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        open_user_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "MAOP_API_KEY".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key: SecretString::from(api_key),
            open_user_id: open_user_id.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let base_url = required_env(
            "MAOP_BASE_URL",
            "Set it to the MAOP platform API root, e.g. https://maop.example.com/api",
        )?;
        let api_key = required_env("MAOP_API_KEY", "Create an API key on the MAOP platform.")?;
        let open_user_id = required_env(
            "MAOP_USER_ID",
            "Set it to the open user id tools and agents belong to.",
        )?;
        let timeout_secs: u64 =
            parse_optional_env("MAOP_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAOP_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self::new(&base_url, api_key, open_user_id)?
            .with_timeout(Duration::from_secs(timeout_secs)))
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Validate the base URL and normalize it to end with a slash.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key: "MAOP_BASE_URL".to_string(),
        message: format!("'{raw}' is not a valid URL: {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            key: "MAOP_BASE_URL".to_string(),
            message: format!("unsupported scheme '{}', expected http or https", url.scheme()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
