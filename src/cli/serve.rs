//! `espgpt serve` command handler.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use espgpt::api::{start_server, AppState};
use espgpt::{Assistant, Config};

/// Build the assistant once and serve it until the process is stopped.
pub(crate) async fn cmd_serve(
    mut config: Config,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let assistant = Arc::new(Assistant::from_config(&config)?);
    info!(
        "Access the assistant at http://{}:{}",
        config.server.bind, config.server.port
    );
    start_server(&config.server, AppState::new(assistant))
        .await
        .map_err(|e| anyhow!(e))
}
