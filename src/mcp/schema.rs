//! Pass-through argument schema for MCP tools.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::ToolkitError;
use crate::tools::schema::{ArgsSchema, JsonObject, SchemaRenderOptions};

/// Validation descriptor wrapping a tool's `inputSchema` verbatim.
///
/// The server's catalog entry is the authority on argument shape, so the
/// adapter never compiles, rewrites or re-derives the document: every render
/// returns the original value whatever options are requested. Argument
/// admission is open, unknown keys pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaAdapter {
    schema: Arc<serde_json::Value>,
}

impl SchemaAdapter {
    pub fn new(schema: serde_json::Value) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// The schema for the given rendering options (always the raw document).
    pub fn render(&self, _options: &SchemaRenderOptions) -> &serde_json::Value {
        &self.schema
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.schema
    }

    pub fn into_inner(self) -> serde_json::Value {
        Arc::try_unwrap(self.schema).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Coerce caller arguments into the object sent over the wire.
    ///
    /// `null` and blank strings become `{}`, strings are parsed as JSON,
    /// objects are kept as-is.
    pub fn admit(&self, arguments: serde_json::Value) -> Result<JsonObject, ToolkitError> {
        match arguments {
            serde_json::Value::Null => Ok(JsonObject::new()),
            serde_json::Value::Object(map) => Ok(map),
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(JsonObject::new());
                }
                let parsed: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
                    ToolkitError::InvalidArgument(format!(
                        "MCP tool arguments must be valid JSON: {e}"
                    ))
                })?;
                match parsed {
                    serde_json::Value::String(_) => Err(ToolkitError::InvalidArgument(
                        "MCP tool arguments must be a JSON object; got a nested string".into(),
                    )),
                    other => self.admit(other),
                }
            }
            other => Err(ToolkitError::InvalidArgument(format!(
                "MCP tool arguments must be a JSON object; got {other}"
            ))),
        }
    }
}

impl ArgsSchema for SchemaAdapter {
    fn json_schema(&self, options: &SchemaRenderOptions) -> serde_json::Value {
        self.render(options).clone()
    }

    fn admit(&self, arguments: serde_json::Value) -> Result<JsonObject, ToolkitError> {
        SchemaAdapter::admit(self, arguments)
    }
}

impl Serialize for SchemaAdapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.schema.serialize(serializer)
    }
}

impl From<serde_json::Value> for SchemaAdapter {
    fn from(schema: serde_json::Value) -> Self {
        Self::new(schema)
    }
}
