//! Host-side tool execution with the tool-failure convention applied.

use serde::{Deserialize, Serialize};

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use crate::error::ToolkitError;

/// Result of running a tool as the host sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool_name: String,
    pub content: serde_json::Value,
    pub is_error: bool,
}

/// Run a tool, folding tool failures into an error outcome.
///
/// Errors for which [`ToolkitError::is_tool_failure`] holds are reported back
/// as `is_error` outcomes carrying the error message; any other error is
/// returned to the caller untouched.
pub async fn run_tool(
    tool: &dyn Tool,
    args: &ToolArguments,
    ctx: &ToolExecutionContext,
) -> Result<ToolOutcome, ToolkitError> {
    match tool.execute(args, ctx).await {
        Ok(content) => Ok(ToolOutcome {
            tool_name: tool.name().to_string(),
            content,
            is_error: false,
        }),
        Err(err) if err.is_tool_failure() => {
            tracing::debug!(tool = tool.name(), error = %err, "tool reported failure");
            Ok(ToolOutcome {
                tool_name: tool.name().to_string(),
                content: serde_json::Value::String(err.to_string()),
                is_error: true,
            })
        }
        Err(err) => Err(err),
    }
}
