//! CLI definitions for the `mcp-toolkit` demo binary.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ServerConfig, ToolkitConfig};

/// Inspect and call the tools of an MCP server
#[derive(Parser, Debug)]
#[command(name = "mcp-toolkit", version, about = "Inspect and call MCP server tools")]
pub struct Cli {
    /// Server command to spawn over stdio (overrides config and env)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Argument passed to the server command (repeatable)
    #[arg(short = 'a', long = "arg", global = true, allow_hyphen_values = true)]
    pub server_args: Vec<String>,

    /// Config file path (defaults to ~/.mcp-toolkit/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the server's tools with their argument schemas
    List,
    /// Call one tool and print its result
    Call(CallArgs),
}

/// Arguments for `mcp-toolkit call`.
#[derive(Parser, Debug)]
pub struct CallArgs {
    /// Tool name
    pub name: String,

    /// Tool arguments as a JSON object
    #[arg(long = "args", default_value = "{}")]
    pub arguments: String,
}

impl Cli {
    /// Layer command-line server settings over a loaded config. The
    /// configured environment and working directory are kept.
    pub fn apply_to(&self, mut config: ToolkitConfig) -> ToolkitConfig {
        if let Some(command) = &self.server {
            let mut server = config.server.take().unwrap_or_default();
            server.command = command.clone();
            server.args = self.server_args.clone();
            config.server = Some(server);
        } else if !self.server_args.is_empty() {
            if let Some(server) = config.server.as_mut() {
                server.args = self.server_args.clone();
            }
        }
        config
    }
}
