//! End-to-end tests: build from a document, persist, reload and search
//! through the HTTP provider.

use std::path::PathBuf;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use winston_embeddings::{
    LoadOutcome, ProviderConfig, SearchOutcome, TitanProvider, VectorIndex, VectorSearchConfig,
};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};


async fn mount_vector(server: &MockServer, text: &str, vector: [f32; 3]) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "inputText": text, "dimensions": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddingsByType": { "float": vector }
        })))
        .mount(server)
        .await;
}

fn config(server: &MockServer, dir: &tempfile::TempDir) -> VectorSearchConfig {
    VectorSearchConfig::new()
        .with_dimension(3)
        .with_max_workers(4)
        .with_snapshot_path(dir.path().join("objects/datasets/embeddings.json"))
        .with_provider(ProviderConfig {
            base_url: server.uri(),
            request_timeout_secs: Some(5),
            ..ProviderConfig::default()
        })
}

fn open_index(server: &MockServer, dir: &tempfile::TempDir) -> VectorIndex {
    let config = config(server, dir);
    let provider = TitanProvider::from_config(&config.provider)
        .unwrap()
        .with_api_key("test-token");
    VectorIndex::new(config, Arc::new(provider)).unwrap()
}

fn write_source(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("encyclopedia.md");
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_build_persist_and_search() {
    let server = MockServer::start().await;
    mount_vector(&server, "Mars", [0.9, 0.1, 0.0]).await;
    mount_vector(&server, "Venus", [0.1, 0.9, 0.0]).await;
    mount_vector(&server, "red planet", [1.0, 0.0, 0.0]).await;

    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "Mars\n\nVenus\n");
    let index = open_index(&server, &dir);

    let outcome = index.load_or_build(&source, false).await.unwrap();
    let LoadOutcome::Rebuilt(summary) = outcome else {
        panic!("expected a rebuild on first load");
    };
    assert_eq!(summary.total_chunks, 2);
    assert_eq!(summary.embedded, 2);
    assert!(summary.failed_chunk_ids.is_empty());
    assert!(index.config().snapshot_path.exists());

    let SearchOutcome::Matches(results) = index.search("red planet", 1).await.unwrap() else {
        panic!("expected matches");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk_id, 0);
    assert_eq!(results[0].text, "Mars");
}

#[tokio::test]
async fn test_reload_from_snapshot_skips_provider() {
    let server = MockServer::start().await;
    mount_vector(&server, "Mars", [0.9, 0.1, 0.0]).await;
    mount_vector(&server, "Venus", [0.1, 0.9, 0.0]).await;

    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "Mars\nVenus\n");

    let first = open_index(&server, &dir);
    first.load_or_build(&source, false).await.unwrap();
    let requests_after_build = server.received_requests().await.unwrap().len();
    assert_eq!(requests_after_build, 2);

    let second = open_index(&server, &dir);
    let outcome = second.load_or_build(&source, false).await.unwrap();

    assert_eq!(outcome, LoadOutcome::LoadedFromCache { total_entries: 2 });
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_partial_build_keeps_successful_chunks() {
    let server = MockServer::start().await;
    mount_vector(&server, "Mars", [0.9, 0.1, 0.0]).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "inputText": "Pluto" })))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("x-amzn-ErrorType", "ValidationException")
                .set_body_json(json!({ "message": "Malformed input request" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "Mars\nPluto\n");
    let index = open_index(&server, &dir);

    let summary = index.build(&source).await.unwrap();
    assert_eq!(summary.embedded, 1);
    assert_eq!(summary.failed_chunk_ids, vec![1]);
    assert!(summary.is_partial());
    assert_eq!(index.store().len().await, 1);
}
