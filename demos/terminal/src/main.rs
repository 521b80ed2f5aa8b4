//! Terminal chat client.
//!
//! Logs in to a long-poll chat server, prints everything the server pushes
//! and sends each line typed on stdin:
//!   cargo run -p pollchat-terminal -- --server http://localhost:8080/ --name alice
//!
//! Settings come from an optional TOML file (`--config`), then flags.

mod render;

use clap::Parser;
use pollchat_client::{BroadcastError, ChatClient, ClientConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pollchat", about = "Long-poll chat client")]
struct Args {
    /// TOML config file.
    #[arg(long, env = "POLLCHAT_CONFIG")]
    config: Option<PathBuf>,
    /// Server base URL.
    #[arg(long, env = "POLLCHAT_SERVER")]
    server: Option<String>,
    /// Display name to request at login.
    #[arg(long)]
    name: Option<String>,
    /// Delay before re-polling after an error, in milliseconds.
    #[arg(long)]
    backoff_ms: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(server) = self.server {
            config.server_url = server;
        }
        if let Some(name) = self.name {
            config.username = Some(name);
        }
        if let Some(backoff_ms) = self.backoff_ms {
            config.backoff_ms = backoff_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pollchat_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config()?;
    tracing::info!("Connecting to {}", config.server_url);

    let client = ChatClient::connect(&config, Arc::new(render::TerminalRender)).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match client.broadcast(&line).await {
            Ok(()) | Err(BroadcastError::Empty) => {}
            Err(e) => tracing::debug!("Broadcast failed: {}", e),
        }
    }

    tracing::info!("stdin closed, leaving");
    Ok(())
}
