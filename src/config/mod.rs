//! Configuration system (layered: code > env > config file).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ToolkitError;
use crate::mcp::toolkit::DiscoveryPolicy;
use crate::session::{RmcpSession, StdioTransport};

pub const ENV_SERVER_COMMAND: &str = "MCP_TOOLKIT_SERVER_COMMAND";
pub const ENV_SERVER_ARGS: &str = "MCP_TOOLKIT_SERVER_ARGS";
pub const ENV_DISCOVERY: &str = "MCP_TOOLKIT_DISCOVERY";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "MCP_TOOLKIT_REQUEST_TIMEOUT_MS";

/// How to launch the MCP server a session talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct ServerConfig {
    #[builder(into)]
    pub command: String,
    #[builder(default)]
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the server process.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl ServerConfig {
    pub fn transport(&self) -> StdioTransport {
        let transport = StdioTransport::new(self.command.clone(), self.args.clone())
            .with_env(self.env.clone());
        match &self.cwd {
            Some(cwd) => transport.with_cwd(cwd.clone()),
            None => transport,
        }
    }
}

/// Layered configuration for the toolkit and its session.
///
/// Resolution order:
/// 1. Values set in code on the loaded struct
/// 2. Environment variables (`.env` honored)
/// 3. The TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    pub server: Option<ServerConfig>,
    #[builder(default)]
    pub discovery: DiscoveryPolicy,
    pub request_timeout_ms: Option<u64>,
}

impl ToolkitConfig {
    /// Load the config file (explicit path, or the default path when it
    /// exists) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ToolkitError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = default_config_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ToolkitError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            ToolkitError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Overlay values found through `lookup` onto this config.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ToolkitError> {
        let args = lookup(ENV_SERVER_ARGS)
            .map(|raw| raw.split_whitespace().map(str::to_string).collect::<Vec<_>>());

        self.server = match (lookup(ENV_SERVER_COMMAND), self.server.take()) {
            (Some(command), Some(mut server)) => {
                server.command = command;
                if let Some(args) = args {
                    server.args = args;
                }
                Some(server)
            }
            (Some(command), None) => Some(ServerConfig {
                command,
                args: args.unwrap_or_default(),
                ..ServerConfig::default()
            }),
            (None, Some(mut server)) => {
                if let Some(args) = args {
                    server.args = args;
                }
                Some(server)
            }
            (None, None) => {
                if args.is_some() {
                    return Err(ToolkitError::Configuration(format!(
                        "{ENV_SERVER_ARGS} is set but no server command is configured"
                    )));
                }
                None
            }
        };

        if let Some(raw) = lookup(ENV_DISCOVERY) {
            self.discovery = raw.trim().parse().map_err(|_| {
                ToolkitError::Configuration(format!(
                    "{ENV_DISCOVERY} must be `always_refresh` or `cache_once`, got `{raw}`"
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            let millis = raw.trim().parse::<u64>().map_err(|e| {
                ToolkitError::Configuration(format!("{ENV_REQUEST_TIMEOUT_MS} is invalid: {e}"))
            })?;
            self.request_timeout_ms = Some(millis);
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Build a stdio session for the configured server. The handshake runs
    /// when the session is initialized.
    pub fn build_session(&self) -> Result<RmcpSession, ToolkitError> {
        let server = self.server.as_ref().ok_or_else(|| {
            ToolkitError::Configuration(format!(
                "no MCP server configured; set {ENV_SERVER_COMMAND} or `server.command`"
            ))
        })?;

        let session = RmcpSession::new(Box::new(server.transport()));
        Ok(match self.request_timeout() {
            Some(timeout) => session.with_request_timeout(timeout),
            None => session,
        })
    }
}

/// `~/.mcp-toolkit/config.toml`, or a relative fallback without a home dir.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".mcp-toolkit"))
        .unwrap_or_else(|| PathBuf::from(".mcp-toolkit"))
        .join("config.toml")
}
