//! Model Context Protocol (MCP) toolkit: remote tools as host tools.

pub mod schema;
pub mod tool;
pub mod toolkit;

pub use schema::SchemaAdapter;
pub use tool::MCPTool;
pub use toolkit::{DiscoveryPolicy, MCPToolkit, ToolkitState};
