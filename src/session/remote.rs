//! [`ToolSession`] backed by an rmcp client service.

use std::time::Duration;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo, ProtocolVersion};
use rmcp::service::{ClientInitializeError, ServiceError};
use tokio::sync::{Mutex, RwLock};

use super::transport::{MCPRunningService, SessionTransport};
use super::{InvocationResult, OperationDescriptor, ToolSession};
use crate::error::ToolkitError;
use crate::tools::JsonObject;
use crate::util::timeout::with_timeout;

/// MCP session over rmcp.
///
/// Built from a [`SessionTransport`], the handshake runs on `initialize`.
/// Built from an already running service, `initialize` only checks that the
/// service is still open.
pub struct RmcpSession {
    transport: Mutex<Option<Box<dyn SessionTransport>>>,
    service: RwLock<Option<MCPRunningService>>,
    request_timeout: Option<Duration>,
}

impl RmcpSession {
    /// Create a session that connects through `transport` on first initialize.
    pub fn new(transport: Box<dyn SessionTransport>) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
            service: RwLock::new(None),
            request_timeout: None,
        }
    }

    /// Wrap a service whose handshake already ran.
    pub fn from_running_service(service: MCPRunningService) -> Self {
        Self {
            transport: Mutex::new(None),
            service: RwLock::new(Some(service)),
            request_timeout: None,
        }
    }

    /// Bound every list/call request by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.service
            .read()
            .await
            .as_ref()
            .is_some_and(|service| !service.is_closed())
    }

    /// Shut the session down. Only the owner of the session should call this.
    pub async fn close(&self) -> Result<(), ToolkitError> {
        let Some(service) = self.service.write().await.take() else {
            return Ok(());
        };
        service
            .cancel()
            .await
            .map(|reason| tracing::debug!(?reason, "MCP session closed"))
            .map_err(|e| ToolkitError::Transport(format!("MCP session shutdown failed: {e}")))
    }

    /// Await `work`, then close the session whether or not it succeeded.
    /// An error from `work` takes precedence over a shutdown error.
    pub async fn close_after<T, E>(
        &self,
        work: impl std::future::Future<Output = Result<T, E>>,
    ) -> Result<T, E>
    where
        E: From<ToolkitError>,
    {
        let outcome = work.await;
        let closed = self.close().await;
        let value = outcome?;
        closed?;
        Ok(value)
    }

    async fn connect_with_protocol_fallback(
        transport: &mut Option<Box<dyn SessionTransport>>,
    ) -> Result<MCPRunningService, ToolkitError> {
        let transport = transport.as_mut().ok_or_else(|| {
            ToolkitError::Setup("MCP session is closed and has no transport to reconnect".into())
        })?;

        let latest_client_info = ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        match transport.connect(latest_client_info).await {
            Ok(service) => return Ok(service),
            Err(error) if should_retry_protocol_fallback(&error) => {
                tracing::warn!(error = %error, "MCP server rejected protocol version, retrying with 2024-11-05");
            }
            Err(error) => return Err(map_client_initialize_error(error)),
        }

        let fallback_client_info = ClientInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            ..Default::default()
        };
        transport
            .connect(fallback_client_info)
            .await
            .map_err(map_client_initialize_error)
    }

    async fn bounded<T>(
        &self,
        future: impl std::future::Future<Output = Result<T, ToolkitError>>,
    ) -> Result<T, ToolkitError> {
        match self.request_timeout {
            Some(timeout) => with_timeout(timeout, future).await,
            None => future.await,
        }
    }
}

#[async_trait]
impl ToolSession for RmcpSession {
    async fn initialize(&self) -> Result<(), ToolkitError> {
        // Held across the check and the connect so concurrent callers share one handshake.
        let mut transport = self.transport.lock().await;
        if self
            .service
            .read()
            .await
            .as_ref()
            .is_some_and(|service| !service.is_closed())
        {
            return Ok(());
        }

        let service = Self::connect_with_protocol_fallback(&mut transport).await?;
        if let Some(info) = service.peer_info() {
            tracing::debug!(
                server = %info.server_info.name,
                version = %info.server_info.version,
                "MCP session initialized"
            );
        }
        *self.service.write().await = Some(service);
        Ok(())
    }

    async fn list_operations(&self) -> Result<Vec<OperationDescriptor>, ToolkitError> {
        let guard = self.service.read().await;
        let service = active_service(guard.as_ref())?;

        let tools = self
            .bounded(async move {
                match service.list_all_tools().await {
                    Ok(tools) => Ok(tools),
                    Err(ServiceError::UnexpectedResponse) => service
                        .list_tools(None)
                        .await
                        .map(|page| page.tools)
                        .map_err(|e| ToolkitError::Discovery(describe_service_error(e))),
                    Err(e) => Err(ToolkitError::Discovery(describe_service_error(e))),
                }
            })
            .await?;

        Ok(tools.into_iter().map(map_mcp_tool).collect())
    }

    async fn call_operation(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<InvocationResult, ToolkitError> {
        let guard = self.service.read().await;
        let service = active_service(guard.as_ref())?;

        let result = self
            .bounded(async move {
                service
                    .call_tool(CallToolRequestParams {
                        meta: None,
                        name: name.to_owned().into(),
                        arguments: Some(arguments),
                        task: None,
                    })
                    .await
                    .map_err(|e| map_call_error(name, e))
            })
            .await?;

        map_call_result(result)
    }
}

fn active_service(
    service: Option<&MCPRunningService>,
) -> Result<&MCPRunningService, ToolkitError> {
    match service {
        Some(service) if service.is_closed() => {
            Err(ToolkitError::Transport("MCP session is closed".into()))
        }
        Some(service) => Ok(service),
        None => Err(ToolkitError::NotReady(
            "MCP session must be initialized first".into(),
        )),
    }
}

fn should_retry_protocol_fallback(error: &ClientInitializeError) -> bool {
    match error {
        ClientInitializeError::JsonRpcError(error) => {
            let message = error.message.to_ascii_lowercase();
            message.contains("protocol") && message.contains("version")
        }
        _ => false,
    }
}

fn map_mcp_tool(tool: rmcp::model::Tool) -> OperationDescriptor {
    OperationDescriptor {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()).unwrap_or_default(),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

fn map_call_result(result: CallToolResult) -> Result<InvocationResult, ToolkitError> {
    let is_error = result.is_error.unwrap_or(false);
    let content = match result.structured_content {
        Some(structured) => structured,
        None => serde_json::to_value(&result.content)?,
    };
    Ok(InvocationResult { content, is_error })
}

fn map_client_initialize_error(error: ClientInitializeError) -> ToolkitError {
    let message = match error {
        ClientInitializeError::ConnectionClosed(context) => {
            format!("MCP initialize connection closed: {context}")
        }
        ClientInitializeError::TransportError { error, context } => {
            format!("MCP initialize transport error ({context}): {error}")
        }
        ClientInitializeError::JsonRpcError(error) => format!(
            "MCP initialize JSON-RPC error {}: {}",
            error.code.0, error.message
        ),
        ClientInitializeError::Cancelled => "MCP initialize cancelled".to_string(),
        other => format!("MCP initialize error: {other}"),
    };
    ToolkitError::Setup(message)
}

fn describe_service_error(error: ServiceError) -> String {
    match error {
        ServiceError::McpError(error) => format!("MCP error {}: {}", error.code.0, error.message),
        ServiceError::TransportSend(error) => format!("MCP transport send failed: {error}"),
        ServiceError::TransportClosed => "MCP transport closed".to_string(),
        ServiceError::UnexpectedResponse => "unexpected MCP response".to_string(),
        ServiceError::Cancelled { reason } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            format!("MCP request cancelled{suffix}")
        }
        ServiceError::Timeout { timeout } => {
            format!("MCP request timed out after {}ms", timeout.as_millis())
        }
        other => format!("MCP service error: {other}"),
    }
}

fn map_call_error(name: &str, error: ServiceError) -> ToolkitError {
    match error {
        ServiceError::Timeout { timeout } => ToolkitError::Timeout(timeout.as_millis() as u64),
        other => ToolkitError::Transport(format!(
            "call_tool {name}: {}",
            describe_service_error(other)
        )),
    }
}
