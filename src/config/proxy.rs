use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Tool id `updateAgent` forces onto every agent it forwards.
pub const DEFAULT_PINNED_AGENT_TOOL: &str = "67a49afda9575c4df9397def";

/// Action proxy behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// When set, `updateAgent` replaces the submitted `agent.tools` with
    /// exactly this id. `None` forwards the submitted list untouched.
    pub pinned_agent_tool: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            pinned_agent_tool: Some(DEFAULT_PINNED_AGENT_TOOL.to_string()),
        }
    }
}

impl ProxyConfig {
    /// Config that forwards agent updates unchanged.
    pub fn unpinned() -> Self {
        Self {
            pinned_agent_tool: None,
        }
    }

    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            pinned_agent_tool: pinned_agent_tool_from(
                optional_env("MAOP_PINNED_AGENT_TOOL")?.as_deref(),
            ),
        })
    }
}

/// Unset means the default id, `none` disables pinning.
fn pinned_agent_tool_from(raw: Option<&str>) -> Option<String> {
    match raw.map(str::trim) {
        None => Some(DEFAULT_PINNED_AGENT_TOOL.to_string()),
        Some(v) if v.eq_ignore_ascii_case("none") => None,
        Some(v) => Some(v.to_string()),
    }
}
