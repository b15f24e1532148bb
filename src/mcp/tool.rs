//! Invokable handle for one remote MCP tool.

use std::sync::Arc;

use async_trait::async_trait;

use super::schema::SchemaAdapter;
use crate::error::ToolkitError;
use crate::session::{OperationDescriptor, ToolSession};
use crate::tools::arguments::ToolArguments;
use crate::tools::schema::ArgsSchema;
use crate::tools::tool::{Tool, ToolExecutionContext};

/// A remote MCP tool exposed through the host [`Tool`] trait.
///
/// Holds a shared reference to the session it was discovered on and nothing
/// else; discovery and session setup belong to the toolkit.
#[derive(Clone)]
pub struct MCPTool {
    name: String,
    description: String,
    schema: SchemaAdapter,
    session: Arc<dyn ToolSession>,
}

impl MCPTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: SchemaAdapter,
        session: Arc<dyn ToolSession>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            session,
        }
    }

    pub(crate) fn from_operation(
        operation: OperationDescriptor,
        session: Arc<dyn ToolSession>,
    ) -> Self {
        Self::new(
            operation.name,
            operation.description,
            SchemaAdapter::new(operation.input_schema),
            session,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &SchemaAdapter {
        &self.schema
    }

    /// Call the remote tool and return its serialized content.
    ///
    /// A result flagged `is_error` fails with [`ToolkitError::RemoteTool`]
    /// whose message is the serialized content.
    pub async fn invoke_async(&self, arguments: serde_json::Value) -> Result<String, ToolkitError> {
        let arguments = self.schema.admit(arguments)?;
        tracing::debug!(tool = %self.name, "invoking MCP tool");

        let result = self.session.call_operation(&self.name, arguments).await?;
        let content = result.serialized_content();
        if result.is_error {
            return Err(ToolkitError::remote_tool(&self.name, content));
        }
        Ok(content)
    }

    /// Blocking variant of [`MCPTool::invoke_async`], kept for callers that
    /// cannot await.
    ///
    /// Drives the call on a fresh current-thread runtime. Must not be called
    /// from inside a tokio runtime; that case fails with
    /// [`ToolkitError::InvalidState`] instead of nesting runtimes.
    #[deprecated(note = "synchronous invocation exists only for compatibility; use invoke_async")]
    pub fn invoke_sync(&self, arguments: serde_json::Value) -> Result<String, ToolkitError> {
        tracing::warn!(
            tool = %self.name,
            "MCPTool::invoke_sync is deprecated and exists only for compatibility; use invoke_async"
        );

        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ToolkitError::InvalidState(format!(
                "invoke_sync called for `{}` inside an async runtime; await invoke_async instead",
                self.name
            )));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.invoke_async(arguments))
    }
}

#[async_trait]
impl Tool for MCPTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn args_schema(&self) -> &dyn ArgsSchema {
        &self.schema
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolkitError> {
        self.invoke_async(args.raw().clone())
            .await
            .map(serde_json::Value::String)
    }
}

impl std::fmt::Debug for MCPTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MCPTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", self.schema.raw())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InvocationResult;
    use crate::tools::{run_tool, JsonObject};
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingSession {
        result: InvocationResult,
        calls: Mutex<Vec<(String, JsonObject)>>,
    }

    impl RecordingSession {
        fn returning(result: InvocationResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ToolSession for RecordingSession {
        async fn initialize(&self) -> Result<(), ToolkitError> {
            Ok(())
        }

        async fn list_operations(&self) -> Result<Vec<OperationDescriptor>, ToolkitError> {
            Ok(Vec::new())
        }

        async fn call_operation(
            &self,
            name: &str,
            arguments: JsonObject,
        ) -> Result<InvocationResult, ToolkitError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((name.to_string(), arguments));
            Ok(self.result.clone())
        }
    }

    fn tool_over(session: Arc<RecordingSession>) -> MCPTool {
        MCPTool::new(
            "read_file",
            "Read a file",
            SchemaAdapter::new(json!({"type": "object"})),
            session,
        )
    }

    #[tokio::test]
    async fn invoke_async_returns_serialized_content() {
        let session = RecordingSession::returning(InvocationResult::success(json!([
            { "type": "text", "text": "hello" }
        ])));
        let tool = tool_over(Arc::clone(&session));

        let output = tool
            .invoke_async(json!({"path": "LICENSE"}))
            .await
            .expect("success result should not fail");
        let reparsed: serde_json::Value = serde_json::from_str(&output).expect("JSON output");
        assert_eq!(reparsed[0]["text"], "hello");

        let calls = session.calls.lock().expect("calls lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "read_file");
        assert_eq!(calls[0].1.get("path"), Some(&json!("LICENSE")));
    }

    #[tokio::test]
    async fn invoke_async_maps_error_flag_to_remote_tool_error() {
        let session = RecordingSession::returning(InvocationResult::error("permission denied"));
        let tool = tool_over(session);

        let err = tool
            .invoke_async(json!({"path": "/etc/shadow"}))
            .await
            .expect_err("error result should fail");
        assert!(matches!(
            &err,
            ToolkitError::RemoteTool { tool_name, message }
            if tool_name == "read_file" && message == "permission denied"
        ));
        assert_eq!(err.to_string(), "permission denied");
    }

    #[tokio::test]
    async fn invoke_async_rejects_bad_arguments_before_calling() {
        let session = RecordingSession::returning(InvocationResult::success("unused"));
        let tool = tool_over(Arc::clone(&session));

        let err = tool
            .invoke_async(json!(42))
            .await
            .expect_err("scalar arguments are not an object");
        assert!(matches!(err, ToolkitError::InvalidArgument(_)));
        assert!(session.calls.lock().expect("calls lock").is_empty());
    }

    #[tokio::test]
    async fn execute_wraps_output_as_string_value() {
        let session = RecordingSession::returning(InvocationResult::success("MIT License"));
        let tool = tool_over(session);

        let value = tool
            .execute(
                &ToolArguments::new(json!({"path": "LICENSE"})),
                &ToolExecutionContext::default(),
            )
            .await
            .expect("execute should succeed");
        assert_eq!(value, json!("MIT License"));
    }

    #[tokio::test]
    async fn run_tool_folds_remote_failures_into_error_outcome() {
        let session = RecordingSession::returning(InvocationResult::error("permission denied"));
        let tool = tool_over(session);

        let outcome = run_tool(
            &tool,
            &ToolArguments::new(json!({"path": "LICENSE"})),
            &ToolExecutionContext::default(),
        )
        .await
        .expect("remote failures are outcomes, not errors");
        assert!(outcome.is_error);
        assert_eq!(outcome.tool_name, "read_file");
        assert_eq!(outcome.content, json!("permission denied"));
    }

    #[tokio::test]
    async fn run_tool_propagates_plumbing_errors() {
        let session = RecordingSession::returning(InvocationResult::success("unused"));
        let tool = tool_over(session);

        let err = run_tool(
            &tool,
            &ToolArguments::new(json!([1, 2])),
            &ToolExecutionContext::default(),
        )
        .await
        .expect_err("argument errors are not tool failures");
        assert!(matches!(err, ToolkitError::InvalidArgument(_)));
    }

    #[allow(deprecated)]
    #[test]
    fn invoke_sync_drives_call_on_fresh_runtime() {
        let session = RecordingSession::returning(InvocationResult::success("MIT License"));
        let tool = tool_over(session);

        let output = tool
            .invoke_sync(json!({"path": "LICENSE"}))
            .expect("sync shim should complete outside a runtime");
        assert_eq!(output, "MIT License");
    }

    #[allow(deprecated)]
    #[test]
    fn invoke_sync_reraises_remote_error_unchanged() {
        let session = RecordingSession::returning(InvocationResult::error("permission denied"));
        let tool = tool_over(session);

        let err = tool
            .invoke_sync(json!({"path": "LICENSE"}))
            .expect_err("error result should fail through the shim");
        assert!(matches!(
            err,
            ToolkitError::RemoteTool { message, .. } if message == "permission denied"
        ));
    }

    #[allow(deprecated)]
    #[tokio::test]
    async fn invoke_sync_refuses_to_nest_inside_runtime() {
        let session = RecordingSession::returning(InvocationResult::success("unused"));
        let tool = tool_over(Arc::clone(&session));

        let err = tool
            .invoke_sync(json!({}))
            .expect_err("sync shim must not run inside a runtime");
        assert!(matches!(err, ToolkitError::InvalidState(_)));
        assert!(session.calls.lock().expect("calls lock").is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log lock").clone()).expect("utf8 logs")
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    #[allow(deprecated)]
    fn invoke_sync_warns_about_deprecation() {
        let session = RecordingSession::returning(InvocationResult::success("MIT License"));
        let tool = tool_over(session);
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let output = tracing::subscriber::with_default(subscriber, || {
            tool.invoke_sync(json!({"path": "LICENSE"}))
        })
        .expect("sync shim should complete outside a runtime");

        assert_eq!(output, "MIT License");
        let logged = logs.contents();
        assert!(logged.contains("WARN"), "expected a warning, got: {logged}");
        assert!(logged.contains("invoke_sync is deprecated"));
        assert!(logged.contains("read_file"));
    }
}
