// HTTP Server Integration Tests
// Tests the complete HTTP API with real HTTP requests against a real server
// on a random port.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use typeahead::{
    start_server, IndexBuilder, InMemoryQueryFrequencyStore, LiveIndex, MeteredCache,
    QueryFrequencyStore, QueryRecord, SuggestionService, TrieSuggestionCache,
    TypeaheadConfigBuilder,
};

struct TestServer {
    port: u16,
    builder: Arc<IndexBuilder>,
    store: Arc<InMemoryQueryFrequencyStore>,
    _handle: tokio::task::JoinHandle<Result<()>>,
}

/// Start a server on a random available port, without the background worker
/// so tests control reload timing themselves.
async fn start_test_server() -> TestServer {
    let config = TypeaheadConfigBuilder::new()
        .max_suggestions(2)
        .max_query_length(10)
        .reload_interval(Duration::from_secs(3600))
        .build()
        .expect("valid test config");

    let store = Arc::new(InMemoryQueryFrequencyStore::new());
    let live = Arc::new(LiveIndex::new(config.clone()));
    let builder = Arc::new(IndexBuilder::new(
        Arc::clone(&store) as _,
        Arc::clone(&live),
        config.clone(),
    ));
    let cache = Arc::new(MeteredCache::new(TrieSuggestionCache::new(live), "trie"));
    let service = Arc::new(SuggestionService::new(
        cache,
        Arc::clone(&store) as _,
        config,
    ));

    // Use port 0 to find a free port, then release it for the server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let handle = tokio::spawn(async move { start_server(service, port).await });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        port,
        builder,
        store,
        _handle: handle,
    }
}

#[tokio::test]
async fn test_health_check_endpoint() -> Result<()> {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", server.port))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_suggestion_read_path() -> Result<()> {
    let server = start_test_server().await;
    let client = Client::new();

    for (text, frequency) in [("cat", 5), ("car", 3), ("cats", 10), ("dog", 1)] {
        server.store.save(QueryRecord::new(text, frequency)?).await?;
    }
    server.builder.reload().await?;

    let response = client
        .get(format!(
            "http://127.0.0.1:{}/search/suggestion?query=ca",
            server.port
        ))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    let suggestions = body.as_array().expect("JSON array body");
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["suggestion"], "cats");
    assert_eq!(suggestions[0]["frequency"], 10);
    assert_eq!(suggestions[1]["suggestion"], "cat");
    assert_eq!(suggestions[1]["frequency"], 5);

    // Unknown prefix: empty array, still 200
    let response = client
        .get(format!(
            "http://127.0.0.1:{}/search/suggestion?query=z",
            server.port
        ))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert!(body.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_validation_failures_return_400() -> Result<()> {
    let server = start_test_server().await;
    let client = Client::new();
    let base = format!("http://127.0.0.1:{}", server.port);

    // Missing, empty, invalid characters, oversized
    for query_string in [
        "".to_string(),
        "?query=".to_string(),
        "?query=Hello".to_string(),
        "?query=he%20llo".to_string(),
        format!("?query={}", "a".repeat(11)),
    ] {
        let response = client
            .get(format!("{base}/search/suggestion{query_string}"))
            .send()
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "read path accepted {query_string:?}"
        );

        let response = client
            .post(format!("{base}/search/query{query_string}"))
            .send()
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "write path accepted {query_string:?}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_write_then_reload_then_read() -> Result<()> {
    let server = start_test_server().await;
    let client = Client::new();
    let base = format!("http://127.0.0.1:{}", server.port);

    for _ in 0..2 {
        let response = client
            .post(format!("{base}/search/query?query=hello"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.text().await?.is_empty());
    }

    // Not visible until the next reload
    let body: Value = client
        .get(format!("{base}/search/suggestion?query=he"))
        .send()
        .await?
        .json()
        .await?;
    assert!(body.as_array().unwrap().is_empty());

    server.builder.reload().await?;

    let body: Value = client
        .get(format!("{base}/search/suggestion?query=he"))
        .send()
        .await?
        .json()
        .await?;
    let suggestions = body.as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["suggestion"], "hello");
    assert_eq!(suggestions[0]["frequency"], 2);
    Ok(())
}

#[tokio::test]
async fn test_stats_endpoint() -> Result<()> {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/stats", server.port))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert!(body["counters"]["lookups"].is_u64());
    assert!(body["counters"]["reloads"].is_u64());
    Ok(())
}
