//! nzbget - command-line front end for the NZBGet JSON-RPC client.
//!
//! Loads connection settings from the default config file (if present), then
//! `NZBGET_*` environment variables, then command-line flags, runs one
//! command and prints the result as JSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nzbget_rpc::{Config, NzbGet, RpcError};

#[derive(Debug, Parser)]
#[command(name = "nzbget", version, about = "Query and control an NZBGet server")]
struct Cli {
    /// Config file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, e.g. http://localhost:6789
    #[arg(long, global = true)]
    url: Option<String>,

    #[arg(long, global = true)]
    user: Option<String>,

    #[arg(long, global = true)]
    pass: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the server version
    Version,
    /// Print the server status
    Status,
    /// List queued downloads
    Groups,
    /// List download history
    History {
        /// Include hidden records
        #[arg(long)]
        hidden: bool,
    },
    /// Print the last log entries
    Log {
        #[arg(default_value_t = 50)]
        limit: i64,
    },
    /// Pause downloading
    Pause,
    /// Resume downloading
    Resume,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let path = self.config.clone().or_else(Config::default_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Config::from_file(&path)?
            }
            Some(path) if self.config.is_some() => {
                anyhow::bail!("Config file {} does not exist", path.display())
            }
            _ => Config::default(),
        };

        config.apply_env_overrides();

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(pass) = &self.pass {
            config.pass = pass.clone();
        }
        if self.insecure {
            config.verify_ssl = false;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

async fn run(client: &NzbGet, command: &Command) -> Result<serde_json::Value> {
    let output = match command {
        Command::Version => to_json(client.version().await)?,
        Command::Status => to_json(client.status().await)?,
        Command::Groups => to_json(client.list_groups(0).await)?,
        Command::History { hidden } => to_json(client.history(*hidden).await)?,
        Command::Log { limit } => to_json(client.log(0, *limit).await)?,
        Command::Pause => to_json(client.pause_download().await)?,
        Command::Resume => to_json(client.resume_download().await)?,
    };
    Ok(output)
}

fn to_json<T: Serialize>(result: Result<T, RpcError>) -> Result<serde_json::Value> {
    let value = result.context("Request failed")?;
    Ok(serde_json::to_value(value)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nzbget=info,nzbget_rpc=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let client = NzbGet::new(&config).context("Failed to create client")?;

    info!("Connecting to {}", client.endpoint());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => anyhow::bail!("Interrupted"),
        result = run(&client, &cli.command) => result?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
