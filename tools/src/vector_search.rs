//! Semantic search over the encyclopedia, exposed as a tool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use winston_embeddings::{LoadOutcome, MAX_TOP_K, SearchOutcome, SearchResult, VectorIndex};

use crate::result::ToolResult;
use crate::spec::{DataType, InputConstraints, ToolInput, ToolSpec};
use crate::tool::{Tool, parse_args};

/// Tool name of the encyclopedia search.
pub const ENCYCLOPEDIA_SEARCH: &str = "vector_search-encyclopedia_search";

/// Number of results returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 5;

/// Arguments of the encyclopedia search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchArgs {
    /// Text to look up.
    pub message: String,

    /// How many results to return.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Encyclopedia lookups backed by a shared [`VectorIndex`].
#[derive(Clone)]
pub struct EncyclopediaSearch {
    index: Arc<VectorIndex>,
}

impl EncyclopediaSearch {
    /// Create the tool over a shared index.
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self { index }
    }

    /// The index searches run against.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Populate the index from its snapshot, or build it from `source`.
    pub async fn initialize(
        &self,
        source: impl AsRef<Path>,
        force_regenerate: bool,
    ) -> ToolResult<LoadOutcome> {
        match self.index.load_or_build(source, force_regenerate).await {
            Ok(outcome) => {
                info!("encyclopedia ready: {outcome:?}");
                ToolResult::ok(outcome)
            }
            Err(e) => {
                error!("failed to initialize encyclopedia: {e}");
                ToolResult::err(format!("Failed to initialize vector database: {e}"))
            }
        }
    }

    /// Find the `top_k` passages closest to `message`.
    ///
    /// An empty index or a query without matches is a success carrying a
    /// message instead of data.
    pub async fn search(&self, message: &str, top_k: usize) -> ToolResult<Vec<SearchResult>> {
        match self.index.search(message, top_k).await {
            Ok(SearchOutcome::Matches(results)) => ToolResult::ok(results),
            Ok(SearchOutcome::NoData(reason)) => ToolResult::ok_empty(reason),
            Err(e) if e.is_input_validation() => ToolResult::err(e.to_string()),
            Err(e) => {
                error!("vector search failed: {e}");
                ToolResult::err(format!("An error occurred during vector search: {e}"))
            }
        }
    }
}

#[async_trait]
impl Tool for EncyclopediaSearch {
    fn name(&self) -> &str {
        ENCYCLOPEDIA_SEARCH
    }

    fn description(&self) -> &str {
        "Searches the encyclopedia for passages about planets, moons, stars and \
         other celestial objects. Use it whenever a question needs facts about \
         a place or body in space."
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new()
            .with_input(
                ToolInput::required(
                    "message",
                    DataType::String,
                    "The question or topic to look up",
                )
                .with_constraints(InputConstraints::min_length(1)),
            )
            .with_input(
                ToolInput::optional(
                    "top_k",
                    DataType::Integer,
                    format!("Number of passages to return, at most {MAX_TOP_K}"),
                )
                .with_default(json!(DEFAULT_TOP_K)),
            )
    }

    async fn call(&self, input: Value) -> ToolResult<Value> {
        match parse_args::<SearchArgs>(&self.spec(), input) {
            Ok(args) => self.search(&args.message, args.top_k).await.into_value(),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}
