//! Ways to reach an MCP server and run the client handshake over them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type MCPRunningService = RunningService<RoleClient, DynClientService>;

/// Establishes a fresh MCP client service each time it is asked to.
#[async_trait]
pub trait SessionTransport: Send {
    /// Open the channel and complete `initialize` with the given client info.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError>;
}

/// Launches the server as a child process and talks MCP over its stdio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdioTransport {
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl StdioTransport {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            ..Self::default()
        }
    }

    pub fn from_command(command: impl Into<String>) -> Self {
        Self::new(command, Vec::new())
    }

    /// Extra environment variables for the server process.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Working directory for the server process.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    fn process_command(&self) -> Command {
        let mut process = Command::new(&self.command);
        process.args(&self.args).envs(&self.env);
        if let Some(cwd) = &self.cwd {
            process.current_dir(cwd);
        }
        process
    }
}

#[async_trait]
impl SessionTransport for StdioTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        let child = TokioChildProcess::new(self.process_command()).map_err(|error| {
            ClientInitializeError::transport::<TokioChildProcess>(
                error,
                "launch MCP server process",
            )
        })?;
        tracing::debug!(
            command = %self.command,
            args = ?self.args,
            cwd = ?self.cwd,
            "launched MCP server"
        );

        client_info.into_dyn().serve(child).await
    }
}
