//! Dispatch through a registry holding every tool the agent is offered.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use winston_embeddings::{EmbeddingProvider, EmbeddingRequest, VectorIndex, VectorSearchConfig};
use winston_tools::{EncyclopediaSearch, Tool, ToolRegistry};

struct KeywordProvider;

#[async_trait]
impl EmbeddingProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keyword"
    }

    fn model(&self) -> &str {
        "keyword-model"
    }

    async fn embed(&self, request: EmbeddingRequest) -> winston_embeddings::Result<Vec<f32>> {
        let text = request.text.to_lowercase();
        Ok(vec![
            if text.contains("ring") { 1.0 } else { 0.0 },
            if text.contains("moon") { 1.0 } else { 0.0 },
            0.1,
        ])
    }
}

async fn full_registry(dir: &tempfile::TempDir) -> ToolRegistry {
    let config = VectorSearchConfig::new()
        .with_dimension(3)
        .with_snapshot_path(dir.path().join("datasets/embeddings.json"));
    let index = VectorIndex::new(config, Arc::new(KeywordProvider)).unwrap();
    let search = EncyclopediaSearch::new(Arc::new(index));

    let source = dir.path().join("encyclopedia.md");
    std::fs::write(
        &source,
        "Saturn has the most prominent rings.\n\nEuropa is an icy moon of Jupiter.\n",
    )
    .unwrap();
    assert!(search.initialize(&source, false).await.is_ok());

    let mut registry = ToolRegistry::new().with_space_calculator().unwrap();
    registry.register(Arc::new(search)).unwrap();
    registry
}

#[tokio::test]
async fn test_definitions_cover_every_tool() {
    let dir = tempfile::tempdir().unwrap();
    let registry = full_registry(&dir).await;

    let names: Vec<Value> = registry
        .definitions()
        .into_iter()
        .map(|definition| definition["function"]["name"].clone())
        .collect();
    assert_eq!(
        names,
        vec![
            json!("space_calculator-calculate_distance"),
            json!("space_calculator-calculate_gravity"),
            json!("space_calculator-calculate_travel_time"),
            json!("vector_search-encyclopedia_search"),
        ]
    );
}

#[tokio::test]
async fn test_dispatch_search_and_calculation() {
    let dir = tempfile::tempdir().unwrap();
    let registry = full_registry(&dir).await;

    let search = registry
        .dispatch(
            "vector_search-encyclopedia_search",
            json!({ "message": "Which planet has rings?", "top_k": 1 }),
        )
        .await;
    assert_eq!(
        search.data,
        Some(json!([{
            "text": "Saturn has the most prominent rings.",
            "chunk_id": 0,
            "score": search.data.as_ref().unwrap()[0]["score"].clone(),
        }]))
    );

    let distance = registry
        .dispatch(
            "space_calculator-calculate_distance",
            json!({
                "current_coordinates": { "x": 0, "y": 0, "z": 0 },
                "object_coordinates": { "x": 149597870.7, "y": 0, "z": 0 },
                "unit": "au"
            }),
        )
        .await;
    assert_eq!(distance.data.unwrap()["distance"], json!(1.0));
}

#[tokio::test]
async fn test_failures_stay_inside_the_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let registry = full_registry(&dir).await;

    let too_many = registry
        .dispatch(
            "vector_search-encyclopedia_search",
            json!({ "message": "moons", "top_k": 30 }),
        )
        .await;
    assert!(!too_many.is_ok());

    let wrong_type = registry
        .dispatch(
            "space_calculator-calculate_gravity",
            json!({ "spacecraft_mass": "heavy", "object_mass": 1, "distance": 1 }),
        )
        .await;
    assert_eq!(
        wrong_type.error.as_deref(),
        Some("invalid input: Invalid type for spacecraft_mass: expected number")
    );

    let serialized = serde_json::to_value(&wrong_type).unwrap();
    assert_eq!(serialized["success"], json!(false));
    assert!(serialized.get("data").is_none());
}

#[tokio::test]
async fn test_search_tool_is_usable_directly() {
    let dir = tempfile::tempdir().unwrap();
    let registry = full_registry(&dir).await;

    let tool = registry.get("vector_search-encyclopedia_search").unwrap();
    let result = tool.call(json!({ "message": "an icy moon" })).await;
    let hits = result.data.unwrap();
    assert_eq!(hits[0]["text"], json!("Europa is an icy moon of Jupiter."));
    assert_eq!(hits[0]["chunk_id"], json!(1));
}
