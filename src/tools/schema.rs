//! Argument schema contract the host expects from every tool.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ToolkitError;

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Which side of the call the schema is rendered for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SchemaMode {
    #[default]
    Validation,
    Serialization,
}

/// JSON Schema dialect a caller asks the schema to target.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SchemaDialect {
    #[default]
    Draft2020_12,
    Draft07,
    OpenApi3,
}

/// Rendering knobs a host may pass when asking a tool for its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRenderOptions {
    pub mode: SchemaMode,
    pub by_alias: bool,
    pub ref_template: Option<String>,
    pub dialect: SchemaDialect,
}

impl Default for SchemaRenderOptions {
    fn default() -> Self {
        Self {
            mode: SchemaMode::Validation,
            by_alias: true,
            ref_template: None,
            dialect: SchemaDialect::default(),
        }
    }
}

/// Validation descriptor attached to a tool.
pub trait ArgsSchema: Send + Sync {
    /// JSON Schema for the tool's arguments.
    fn json_schema(&self, options: &SchemaRenderOptions) -> serde_json::Value;

    /// Turn caller-supplied arguments into the object sent to the tool.
    fn admit(&self, arguments: serde_json::Value) -> Result<JsonObject, ToolkitError>;
}
