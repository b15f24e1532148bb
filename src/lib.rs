//! MCP toolkit: remote Model Context Protocol tools as host tools.
//!
//! Discovers the tools a connected MCP session exposes and wraps each one as
//! a schema-carrying [`tools::Tool`] a host runtime can call. Session setup
//! runs once per toolkit; every tool shares the toolkit's session.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mcp_toolkit::prelude::*;
//!
//! # async fn example() -> mcp_toolkit::error::Result<()> {
//! let transport = StdioTransport::new(
//!     "npx",
//!     vec!["-y".into(), "@modelcontextprotocol/server-filesystem".into(), ".".into()],
//! );
//! let session: Arc<dyn ToolSession> = Arc::new(RmcpSession::new(Box::new(transport)));
//! let toolkit = MCPToolkit::new(session);
//!
//! for tool in toolkit.get_tools().await? {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod session;
pub mod tools;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
