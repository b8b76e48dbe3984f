use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use slim_server::ServerConfig;

/// On-disk configuration schema, matching spec.md §6's configuration
/// surface: listen host/port, keep-alive, verbose, logging config file
/// path, and comma-separated fixture search paths. CLI flags in [`Cli`]
/// override whatever a loaded file supplies, the same precedence the
/// teacher's `NodeConfig` uses.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub server: ServerSection,
    pub fixtures: FixturesSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub keepalive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
            keepalive: defaults.keepalive,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FixturesSection {
    /// Filesystem paths or dotted module-like names, each added via
    /// `ExecutionContext::add_import_path`/`add_type_prefix` (the engine
    /// decides which based on whether the string contains a path
    /// separator).
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file_path: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file_path: None,
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs_read(path)?;
        toml::from_str(&contents)
            .with_context(|| format!("invalid slimd configuration in {}", path.display()))
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            keepalive: self.server.keepalive,
            fixture_paths: self.fixtures.paths.clone(),
        }
    }
}

fn fs_read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("unable to read configuration at {}", path.display()))
}
