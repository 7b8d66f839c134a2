//! HTTP client behavior against mocked embedding, generation, and vector
//! store services.

mod common;

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use common::test_config;
use ragloom::embeddings::{EmbeddingProvider, OllamaEmbedder};
use ragloom::generation::{Generator, OllamaGenerator};
use ragloom::stores::{IndexRecord, PineconeStore, RecordMetadata, VectorStore};
use ragloom::types::RagError;

fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

// ---------------------------------------------------------------------------
// Embedding client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn embedder_posts_batch_and_normalizes_vectors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/embed")
                .json_body(json!({"model": "all-minilm", "input": ["hello"]}));
            then.status(200)
                .json_body(json!({"embeddings": [[3.0, 4.0, 0.0, 0.0]]}));
        })
        .await;

    let embedder = OllamaEmbedder::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let vectors = embedder.embed(&["hello".to_string()]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(vectors.len(), 1);
    let expected = [0.6_f32, 0.8, 0.0, 0.0];
    for (got, want) in vectors[0].iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
    }
}

#[tokio::test]
async fn embedder_rejects_dimension_mismatch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({"embeddings": [[1.0, 0.0]]}));
        })
        .await;

    let embedder = OllamaEmbedder::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let err = embedder.embed(&["hello".to_string()]).await.unwrap_err();
    match err {
        RagError::ModelUnavailable(message) => assert!(message.contains("dimension mismatch")),
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn embedder_rejects_count_mismatch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({"embeddings": [[1.0, 0.0, 0.0, 0.0]]}));
        })
        .await;

    let embedder = OllamaEmbedder::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let err = embedder
        .embed(&["one".to_string(), "two".to_string()])
        .await
        .unwrap_err();
    match err {
        RagError::ModelUnavailable(message) => assert!(message.contains("count mismatch")),
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn embedder_reports_service_failure_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(500);
        })
        .await;

    let embedder = OllamaEmbedder::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let err = embedder.embed(&["hello".to_string()]).await.unwrap_err();
    assert!(matches!(err, RagError::ModelUnavailable(_)));
}

#[tokio::test]
async fn embedder_reports_unreachable_service() {
    let embedder =
        OllamaEmbedder::new(http_client(), &test_config("http://127.0.0.1:1", 4)).unwrap();
    let err = embedder.embed(&["hello".to_string()]).await.unwrap_err();
    match err {
        RagError::ModelUnavailable(message) => assert!(message.contains("cannot reach")),
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn embedding_no_texts_skips_the_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({"embeddings": []}));
        })
        .await;

    let embedder = OllamaEmbedder::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let vectors = embedder.embed(&[]).await.unwrap();
    assert!(vectors.is_empty());
    assert_eq!(mock.hits_async().await, 0);
}

// ---------------------------------------------------------------------------
// Generation client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generator_sends_non_streaming_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate").json_body(json!({
                "model": "test-model",
                "prompt": "a grounded prompt",
                "stream": false,
            }));
            then.status(200).json_body(json!({"response": "  an answer  "}));
        })
        .await;

    let generator =
        OllamaGenerator::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    let raw = generator.generate("a grounded prompt").await.unwrap();

    mock.assert_async().await;
    // The generator hands back the raw text; trimming happens at answer
    // assembly.
    assert_eq!(raw, "  an answer  ");
}

#[tokio::test]
async fn generator_distinguishes_bad_status_from_unreachable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(503);
        })
        .await;

    let generator =
        OllamaGenerator::new(http_client(), &test_config(&server.base_url(), 4)).unwrap();
    match generator.generate("prompt").await.unwrap_err() {
        RagError::GenerationUnavailable(message) => {
            assert!(message.contains("returned status 503"));
        }
        other => panic!("expected GenerationUnavailable, got {other:?}"),
    }

    let unreachable =
        OllamaGenerator::new(http_client(), &test_config("http://127.0.0.1:1", 4)).unwrap();
    match unreachable.generate("prompt").await.unwrap_err() {
        RagError::GenerationUnavailable(message) => {
            assert!(message.contains("cannot reach"));
        }
        other => panic!("expected GenerationUnavailable, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Vector store client
// ---------------------------------------------------------------------------

fn existing_index_body(server: &MockServer) -> serde_json::Value {
    json!({
        "indexes": [{
            "name": "test-index",
            "host": server.base_url(),
            "status": {"ready": true},
        }]
    })
}

#[tokio::test]
async fn connect_reuses_an_existing_index() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(existing_index_body(&server));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/indexes");
            then.status(201);
        })
        .await;

    PineconeStore::connect(&test_config(&server.base_url(), 4), http_client())
        .await
        .unwrap();

    list.assert_async().await;
    assert_eq!(create.hits_async().await, 0, "existing index is not recreated");
}

#[tokio::test]
async fn connect_creates_and_awaits_a_missing_index() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(json!({"indexes": []}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/indexes").json_body_partial(
                r#"{"name": "test-index", "dimension": 4, "metric": "cosine"}"#,
            );
            then.status(201);
        })
        .await;
    let describe = server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes/test-index");
            then.status(200).json_body(json!({
                "name": "test-index",
                "host": server.base_url(),
                "status": {"ready": true},
            }));
        })
        .await;

    PineconeStore::connect(&test_config(&server.base_url(), 4), http_client())
        .await
        .unwrap();

    create.assert_async().await;
    assert!(describe.hits_async().await >= 1);
}

#[tokio::test]
async fn readiness_polling_fails_at_the_deadline() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(json!({"indexes": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/indexes");
            then.status(201);
        })
        .await;
    let describe = server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes/test-index");
            then.status(200).json_body(json!({
                "name": "test-index",
                "host": server.base_url(),
                "status": {"ready": false},
            }));
        })
        .await;

    let mut config = test_config(&server.base_url(), 4);
    config.index_ready_timeout = Duration::from_millis(600);

    let err = PineconeStore::connect(&config, http_client())
        .await
        .unwrap_err();
    match err {
        RagError::IndexUnavailable(message) => assert!(message.contains("not ready")),
        other => panic!("expected IndexUnavailable, got {other:?}"),
    }
    assert!(describe.hits_async().await >= 1);
}

#[tokio::test]
async fn missing_credential_fails_before_any_network_call() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(json!({"indexes": []}));
        })
        .await;

    let mut config = test_config(&server.base_url(), 4);
    config.api_key = None;

    let err = PineconeStore::connect(&config, http_client())
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Configuration(_)));
    assert_eq!(list.hits_async().await, 0);
}

#[tokio::test]
async fn query_normalizes_matches_and_defaults_missing_metadata() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(existing_index_body(&server));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(200).json_body(json!({
                "matches": [
                    {
                        "id": "full",
                        "score": 0.9,
                        "metadata": {"text": "a passage", "source": "notes.md"},
                    },
                    {"id": "bare", "score": 0.5},
                ]
            }));
        })
        .await;

    let store = PineconeStore::connect(&test_config(&server.base_url(), 4), http_client())
        .await
        .unwrap();
    let matches = store.query(&[1.0, 0.0, 0.0, 0.0], 2).await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].metadata.source, "notes.md");
    assert_eq!(matches[1].metadata.text, "");
    assert_eq!(matches[1].metadata.source, "unknown");
}

#[tokio::test]
async fn upsert_forwards_records_and_skips_empty_batches() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes");
            then.status(200).json_body(existing_index_body(&server));
        })
        .await;
    let upsert = server
        .mock_async(|when, then| {
            when.method(POST).path("/vectors/upsert");
            then.status(200).json_body(json!({"upsertedCount": 1}));
        })
        .await;

    let store = PineconeStore::connect(&test_config(&server.base_url(), 4), http_client())
        .await
        .unwrap();

    store.upsert(Vec::new()).await.unwrap();
    assert_eq!(upsert.hits_async().await, 0);

    store
        .upsert(vec![IndexRecord {
            id: "id-1".to_string(),
            values: vec![1.0, 0.0, 0.0, 0.0],
            metadata: RecordMetadata {
                text: "chunk".to_string(),
                source: "notes.md".to_string(),
            },
        }])
        .await
        .unwrap();
    assert_eq!(upsert.hits_async().await, 1);
}

#[tokio::test]
async fn unreachable_store_surfaces_before_operations() {
    let err = PineconeStore::connect(&test_config("http://127.0.0.1:1", 4), http_client())
        .await
        .unwrap_err();
    match err {
        RagError::IndexUnavailable(message) => {
            assert!(message.contains("control plane"));
        }
        other => panic!("expected IndexUnavailable, got {other:?}"),
    }
}
