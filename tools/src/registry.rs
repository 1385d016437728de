//! Tool registry for dispatching model calls by name.
//!
//! The `ToolRegistry` owns the tools offered to the model, renders their
//! function-calling definitions, and routes each call to the right tool.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ToolError};
use crate::result::ToolResult;
use crate::space_calculator::{DistanceTool, GravityTool, TravelTimeTool};
use crate::tool::Tool;

/// Registry of the tools available to the agent.
///
/// Tools keep their registration order, which is also the order of
/// [`ToolRegistry::definitions`].
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,

    /// Position of each tool in `tools`, by name.
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the distance, gravity and travel time tools.
    pub fn with_space_calculator(mut self) -> Result<Self> {
        self.register(Arc::new(DistanceTool))?;
        self.register(Arc::new(GravityTool))?;
        self.register(Arc::new(TravelTimeTool))?;
        Ok(self)
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::AlreadyExists(name));
        }

        debug!("Registered tool: {name}");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look a tool up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Names of all tools, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function-calling definitions of all tools.
    pub fn definitions(&self) -> Vec<Value> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Definitions rendered as pretty JSON, for embedding in a prompt.
    pub fn describe(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.definitions())?)
    }

    /// Run the tool called `name` with `args`.
    ///
    /// An unknown name yields an error envelope rather than a failure.
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolResult<Value> {
        let Some(tool) = self.get(name) else {
            warn!("Model called unknown tool: {name}");
            return ToolResult::from_result(Err(ToolError::NotFound(name.to_string())));
        };

        debug!("Dispatching {name} with {args}");
        let result = tool.call(args).await;
        if let Some(error) = &result.error {
            debug!("Tool {name} failed: {error}");
        }
        result
    }
}
