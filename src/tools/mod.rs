//! Host tool system: the contracts tools and toolkits must satisfy.

pub mod arguments;
pub mod outcome;
pub mod schema;
pub mod tool;

pub use arguments::ToolArguments;
pub use outcome::{run_tool, ToolOutcome};
pub use schema::{ArgsSchema, JsonObject, SchemaDialect, SchemaMode, SchemaRenderOptions};
pub use tool::{Tool, ToolExecutionContext, Toolkit};
