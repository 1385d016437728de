//! The trait every callable tool implements.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, ToolError};
use crate::result::ToolResult;
use crate::spec::ToolSpec;

/// A capability the model can call by name.
///
/// Implementations never fail outright: every problem is reported through
/// the returned [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// Parameters the tool accepts.
    fn spec(&self) -> ToolSpec;

    /// Run the tool on raw JSON arguments.
    async fn call(&self, input: Value) -> ToolResult<Value>;

    /// Function-calling definition for this tool.
    fn definition(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.spec().generate_schema(),
            }
        })
    }
}

/// Validate `input` against `spec` and deserialize it into the tool's
/// argument type.
pub fn parse_args<T: DeserializeOwned>(spec: &ToolSpec, input: Value) -> Result<T> {
    spec.validate_inputs(&input).map_err(ToolError::InvalidInput)?;
    Ok(serde_json::from_value(input)?)
}
