//! Handlers for the demo CLI subcommands.

use std::io::Write;

use crate::error::ToolkitError;
use crate::mcp::MCPToolkit;
use crate::session::serialize_content;
use crate::tools::{run_tool, SchemaRenderOptions, ToolArguments, ToolExecutionContext, ToolOutcome};

use super::CallArgs;

/// Print every tool with its description and argument schema.
pub async fn handle_list(toolkit: &MCPToolkit, out: &mut impl Write) -> Result<(), ToolkitError> {
    let tools = toolkit.get_tools().await?;
    if tools.is_empty() {
        writeln!(out, "(server exposes no tools)")?;
        return Ok(());
    }

    let options = SchemaRenderOptions::default();
    for tool in &tools {
        writeln!(out, "{}", tool.name())?;
        if !tool.description().is_empty() {
            writeln!(out, "  {}", tool.description())?;
        }
        let schema = serde_json::to_string_pretty(tool.schema().render(&options))?;
        for line in schema.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

/// Call one tool and print its output. Remote tool failures are printed and
/// reported through the returned outcome rather than as an error.
pub async fn handle_call(
    toolkit: &MCPToolkit,
    args: &CallArgs,
    out: &mut impl Write,
) -> Result<ToolOutcome, ToolkitError> {
    let tools = toolkit.get_tools().await?;
    let tool = tools
        .iter()
        .find(|tool| tool.name() == args.name)
        .ok_or_else(|| ToolkitError::InvalidArgument(format!("unknown tool `{}`", args.name)))?;

    let arguments = ToolArguments::new(serde_json::Value::String(args.arguments.clone()));
    let outcome = run_tool(tool, &arguments, &ToolExecutionContext::default()).await?;

    let rendered = serialize_content(&outcome.content);
    if outcome.is_error {
        writeln!(out, "error: {rendered}")?;
    } else {
        writeln!(out, "{rendered}")?;
    }
    Ok(outcome)
}
