//! Tool and toolkit traits a host runtime consumes.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::schema::ArgsSchema;
use crate::error::ToolkitError;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    /// Additional metadata for the tool.
    pub metadata: serde_json::Value,
}

/// Core tool trait. Implement to expose something the host can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Validation descriptor for the tool's arguments.
    fn args_schema(&self) -> &dyn ArgsSchema;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolkitError>;
}

/// A source of tools that may need one-time setup before use.
#[async_trait]
pub trait Toolkit: Send + Sync {
    /// Prepare the toolkit. Repeated calls are no-ops.
    async fn initialize(&self) -> Result<(), ToolkitError>;

    /// Tools currently offered by this toolkit.
    async fn get_tools(&self) -> Result<Vec<Arc<dyn Tool>>, ToolkitError>;
}
