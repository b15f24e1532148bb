//! mcp-toolkit demo binary entry point.

use std::sync::Arc;

use clap::Parser;
use mcp_toolkit::cli::{commands, Cli, Commands};
use mcp_toolkit::config::ToolkitConfig;
use mcp_toolkit::error::ToolkitError;
use mcp_toolkit::mcp::MCPToolkit;
use mcp_toolkit::session::ToolSession;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the called tool reported a failure.
async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.apply_to(ToolkitConfig::load(cli.config.as_deref())?);
    let session = Arc::new(config.build_session()?);
    let toolkit = MCPToolkit::from_config(Arc::clone(&session) as Arc<dyn ToolSession>, &config);

    Ok(session
        .close_after(run_command(&cli.command, &toolkit))
        .await?)
}

async fn run_command(command: &Commands, toolkit: &MCPToolkit) -> Result<bool, ToolkitError> {
    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::List => {
            commands::handle_list(toolkit, &mut stdout).await?;
            Ok(true)
        }
        Commands::Call(args) => Ok(!commands::handle_call(toolkit, args, &mut stdout)
            .await?
            .is_error),
    }
}
