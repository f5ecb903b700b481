//! MAOP console - main entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use maop_console::{
    cli::{Cli, Command, run_call_command, run_list_command},
    config::Config,
    gateway::{self, GatewayState},
    maop::MaopClient,
    proxy::ActionProxy,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    init_tracing(&cli);

    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let client = MaopClient::new(config.maop.clone())?;
    let proxy = ActionProxy::new(Arc::new(client), config.proxy.clone());

    if let Some(pinned) = &config.proxy.pinned_agent_tool {
        tracing::info!(
            "updateAgent pins agent tools to '{}' (set MAOP_PINNED_AGENT_TOOL=none to disable)",
            pinned
        );
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(
                "Starting MAOP console for {} (user {})",
                config.maop.base_url,
                config.maop.open_user_id
            );
            let state = GatewayState::new(proxy);
            gateway::serve(&config.gateway, state, shutdown_signal()).await?;
        }
        Command::Call { action, payload } => {
            run_call_command(&proxy, &action, payload.as_deref()).await?;
        }
        Command::List { kind } => {
            run_list_command(&proxy, kind).await?;
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("maop_console=info,tower_http=info"));

    // One-shot commands print results on stdout; keep logs off it.
    let registry = tracing_subscriber::registry().with(env_filter);
    if cli.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
