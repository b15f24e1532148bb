//! Convenience re-exports for common use.

pub use crate::config::{ServerConfig, ToolkitConfig};
pub use crate::error::{Result, ToolkitError};
pub use crate::mcp::{DiscoveryPolicy, MCPTool, MCPToolkit, SchemaAdapter, ToolkitState};
pub use crate::session::{
    InvocationResult, OperationDescriptor, RmcpSession, StdioTransport, ToolSession,
};
pub use crate::tools::{
    run_tool, ArgsSchema, SchemaRenderOptions, Tool, ToolArguments, ToolExecutionContext,
    ToolOutcome, Toolkit,
};
