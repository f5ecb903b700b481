//! CLI command handling.
//!
//! Provides subcommands for:
//! - Running the web gateway and console (`serve`, the default)
//! - Running a single proxy action and printing its JSON result (`call`)
//! - Listing the user's tools or agents (`list tools`, `list agents`)

use anyhow::Context;
use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use crate::maop::{Agent, ListResponse, Tool};
use crate::proxy::{Action, ActionEnvelope, ActionProxy};

#[derive(Parser, Debug)]
#[command(name = "maop-console")]
#[command(about = "Console and action proxy for MAOP tools and agents")]
#[command(
    long_about = "Serves a web console for managing MAOP tools and agents.\nExamples:\n  maop-console serve\n  maop-console call deleteTool --payload '{\"toolId\":\"abc\"}'\n  maop-console list agents"
)]
#[command(version)]
#[command(color = ColorChoice::Auto)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web gateway (default if no subcommand given)
    Serve,

    /// Run one proxy action and print the result
    #[command(
        long_about = "Runs an action through the same dispatch table as POST /api/maop.\nExample: maop-console call publishAgent --payload '{\"agentId\":\"abc\"}'"
    )]
    Call {
        /// Action name, e.g. listTools or updateAgent
        action: String,

        /// JSON payload for the action
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// List tools or agents owned by the configured user
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Tools,
    Agents,
}

/// Run `call`: dispatch one action and print the pretty JSON result.
pub async fn run_call_command(
    proxy: &ActionProxy,
    action: &str,
    payload: Option<&str>,
) -> anyhow::Result<()> {
    let payload = parse_payload(payload)?;
    let result = proxy
        .handle(ActionEnvelope::new(action, payload))
        .await
        .map_err(|e| anyhow::anyhow!("{}", pretty(&e.to_body())))?;
    println!("{}", pretty(&result));
    Ok(())
}

/// Run `list`: fetch one page of tools or agents and print a line per item.
pub async fn run_list_command(proxy: &ActionProxy, kind: ListKind) -> anyhow::Result<()> {
    let (action, what) = match kind {
        ListKind::Tools => (Action::ListTools, "tools"),
        ListKind::Agents => (Action::ListAgents, "agents"),
    };
    let value = proxy.dispatch(action, Value::Null).await?;

    let lines = match kind {
        ListKind::Tools => tool_lines(
            serde_json::from_value(value).context("Unexpected tools list response")?,
        ),
        ListKind::Agents => agent_lines(
            serde_json::from_value(value).context("Unexpected agents list response")?,
        ),
    };

    if lines.is_empty() {
        println!("No {what} found.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn parse_payload(raw: Option<&str>) -> anyhow::Result<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).context("--payload must be valid JSON"),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn visibility(is_public: bool) -> &'static str {
    if is_public { "public" } else { "private" }
}

fn tool_lines(list: ListResponse<Tool>) -> Vec<String> {
    list.data
        .docs
        .into_iter()
        .map(|t| {
            let method = t
                .method
                .and_then(|m| serde_json::to_value(m).ok())
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:<26} {:<8} {:<6} {}",
                t.id,
                visibility(t.is_public),
                method,
                t.name_for_human
            )
        })
        .collect()
}

fn agent_lines(list: ListResponse<Agent>) -> Vec<String> {
    list.data
        .docs
        .into_iter()
        .map(|a| {
            let tools = if a.tools.is_empty() {
                "-".to_string()
            } else {
                a.tools.join(",")
            };
            format!(
                "{:<26} {:<8} {} (tools: {})",
                a.id,
                visibility(a.is_public),
                a.name_for_human,
                tools
            )
        })
        .collect()
}
