//! `slimd` — the SLIM protocol server daemon.
//!
//! Usage:
//!   slimd --port 8085 --fixtures demos
//!
//! Accepts SLIM client connections (e.g. a FitNesse test runner), dynamically
//! resolving fixture classes registered under the given module-like names or
//! filesystem paths, and serves one isolated session per connection until
//! shutdown (Ctrl+C) or, with `--no-keepalive`, until the first session ends.

mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::NodeConfig;
use slim_server::{Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "slimd", about = "SLIM protocol server daemon", version)]
struct Cli {
    /// Path to an optional TOML configuration file.
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides the listen host.
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Overrides the listen port.
    #[arg(long, short = 'p', value_name = "PORT")]
    port: Option<u16>,

    /// Serves indefinitely, spawning one session per connection. Without
    /// this flag the server accepts exactly one connection and exits once
    /// that session ends.
    #[arg(long)]
    keepalive: bool,

    #[arg(long, conflicts_with = "keepalive")]
    no_keepalive: bool,

    /// Comma-separated fixture search paths (filesystem paths or dotted
    /// module-like names), merged with whatever a config file supplies.
    #[arg(long = "fixtures", value_delimiter = ',', value_name = "PATH")]
    fixture_paths: Vec<String>,

    /// Raises log verbosity across all loggers.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Optional path to a logging configuration file (here: a plain text
    /// file containing an `EnvFilter` spec, loaded if present).
    #[arg(long, value_name = "PATH")]
    logging_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut node_config = match &cli.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };

    if let Some(host) = &cli.host {
        node_config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        node_config.server.port = port;
    }
    if cli.no_keepalive {
        node_config.server.keepalive = false;
    } else if cli.keepalive {
        node_config.server.keepalive = true;
    }
    if !cli.fixture_paths.is_empty() {
        node_config.fixtures.paths.extend(cli.fixture_paths.clone());
    }

    init_tracing(&node_config, cli.verbose, cli.logging_config.as_deref())?;

    slim_demos::register();

    let server_config = node_config.server_config();
    info!(
        addr = %server_config.socket_addr_string(),
        keepalive = server_config.keepalive,
        fixtures = ?server_config.fixture_paths,
        "starting slimd"
    );

    let server = Server::bind(server_config).await?;

    tokio::select! {
        result = server.serve() => {
            if let Err(err) = result {
                error!(error = %err, "server exited with an error");
                return Err(err.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received (Ctrl+C)");
        }
    }

    info!("slimd shutdown complete");
    Ok(())
}

fn init_tracing(config: &NodeConfig, verbose: bool, logging_config: Option<&std::path::Path>) -> Result<()> {
    let base_level = config.logging.level.as_deref().unwrap_or("info");
    let level = if verbose { "debug" } else { base_level };

    let filter_spec = logging_config
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|contents| contents.trim().to_string())
        .filter(|spec| !spec.is_empty())
        .unwrap_or_else(|| format!("{level},slim={level}"));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_spec));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
