//! Session protocol client boundary.
//!
//! A [`ToolSession`] is a connected channel to something exposing a catalog
//! of callable operations. The toolkit and every tool handle it produces hold
//! the same `Arc<dyn ToolSession>`. The trait has no teardown method; closing
//! is left to whoever owns the concrete session.

pub mod remote;
pub mod transport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolkitError;
use crate::tools::JsonObject;

pub use remote::RmcpSession;
pub use transport::{SessionTransport, StdioTransport};

/// One remotely defined operation, as listed by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    /// Empty when the server gave none.
    #[serde(default)]
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl OperationDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Outcome of one remote call. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub content: serde_json::Value,
    pub is_error: bool,
}

impl InvocationResult {
    pub fn success(content: impl Into<serde_json::Value>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<serde_json::Value>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Content in the textual form handed to hosts.
    pub fn serialized_content(&self) -> String {
        serialize_content(&self.content)
    }
}

/// Render result content as text: strings verbatim, anything else as compact JSON.
pub fn serialize_content(content: &serde_json::Value) -> String {
    match content {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Protocol client operations the toolkit relies on.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Perform the session's setup handshake.
    async fn initialize(&self) -> Result<(), ToolkitError>;

    /// Enumerate the operations the session currently exposes.
    async fn list_operations(&self) -> Result<Vec<OperationDescriptor>, ToolkitError>;

    /// Invoke one operation by name.
    async fn call_operation(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<InvocationResult, ToolkitError>;
}
