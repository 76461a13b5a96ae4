//! Serve command - run the HTTP upload service.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use tracing::warn;

use poreader_core::Pipeline;

use super::load_config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if std::env::var_os(&config.llm.api_key_env).is_none() {
        warn!(
            "${} is not set; uploads will fail until it is",
            config.llm.api_key_env
        );
    }

    let pipeline = Pipeline::from_config(&config)?;

    poreader_server::serve(Arc::new(pipeline), &config.server).await?;
    Ok(())
}
