//! Integration tests for the cache server
//!
//! Spawns the real router on an ephemeral port and queries it with an HTTP
//! client, covering the exact-shape 200 path and the 404 rejections.

use std::sync::Arc;

use tempfile::TempDir;

use adrmirror::cache::ArchiveStore;
use adrmirror::query::{NAMESPACES, REQUIRED_PARAMS};
use adrmirror::server;

/// Spawns the server over `store` and returns its base URL
async fn spawn_server(store: ArchiveStore) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener should have an address");

    tokio::spawn(async move {
        axum::serve(listener, server::router(Arc::new(store)))
            .await
            .expect("Server should not fail");
    });

    format!("http://{}", addr)
}

/// The full required parameter set, as a fetcher replay would send it
fn required_params() -> Vec<(String, String)> {
    REQUIRED_PARAMS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn setup_store() -> (ArchiveStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = ArchiveStore::new(temp_dir.path());
    (store, temp_dir)
}

#[tokio::test]
async fn test_serves_cached_page_for_resume_token() {
    let (store, _temp_dir) = setup_store();
    store.write_page("A", b"{\"x\":1}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let mut params = required_params();
    params.push(("adrcontinue".to_string(), "A".to_string()));

    let response = reqwest::Client::new()
        .get(&base)
        .query(&params)
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .expect("Content type should be set"),
        "application/json"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"{\"x\":1}");
}

#[tokio::test]
async fn test_serves_first_page_without_resume_token() {
    let (store, _temp_dir) = setup_store();
    store.write_page("", b"{\"first\":true}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let response = reqwest::Client::new()
        .get(&base)
        .query(&required_params())
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"{\"first\":true}");
}

#[tokio::test]
async fn test_repeated_requests_return_identical_bytes() {
    let (store, _temp_dir) = setup_store();
    store.write_page("A", b"{\"x\":1}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let mut params = required_params();
    params.push(("adrcontinue".to_string(), "A".to_string()));
    let client = reqwest::Client::new();

    let first = client.get(&base).query(&params).send().await.unwrap();
    let second = client.get(&base).query(&params).send().await.unwrap();

    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);
    assert_eq!(
        first.bytes().await.unwrap(),
        second.bytes().await.unwrap(),
        "The handler is read-only and idempotent"
    );
}

#[tokio::test]
async fn test_missing_adrprop_is_rejected_with_empty_404() {
    let (store, _temp_dir) = setup_store();
    store.write_page("", b"{}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let params: Vec<(String, String)> = required_params()
        .into_iter()
        .filter(|(k, _)| k != "adrprop")
        .collect();

    let response = reqwest::Client::new()
        .get(&base)
        .query(&params)
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 404);
    assert!(response.bytes().await.unwrap().is_empty(), "404 body must be empty");
}

#[tokio::test]
async fn test_wrong_literal_value_is_rejected() {
    let (store, _temp_dir) = setup_store();
    store.write_page("", b"{}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let params: Vec<(String, String)> = required_params()
        .into_iter()
        .map(|(k, v)| {
            if k == "adrdir" {
                (k, "older".to_string())
            } else {
                (k, v)
            }
        })
        .collect();

    let response = reqwest::Client::new()
        .get(&base)
        .query(&params)
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_resume_token_is_a_cache_miss() {
    let (store, _temp_dir) = setup_store();
    let base = spawn_server(store).await;

    let mut params = required_params();
    params.push(("adrcontinue".to_string(), "never-fetched".to_string()));

    let response = reqwest::Client::new()
        .get(&base)
        .query(&params)
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 404);
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_get_requests_are_rejected() {
    let (store, _temp_dir) = setup_store();
    store.write_page("", b"{}").expect("Write should succeed");
    let base = spawn_server(store).await;

    let response = reqwest::Client::new()
        .post(&base)
        .query(&required_params())
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 404, "Only GET is handled");
}

#[tokio::test]
async fn test_extra_fetcher_parameters_do_not_break_cache_hits() {
    let (store, _temp_dir) = setup_store();
    store.write_page("", b"{\"first\":true}").expect("Write should succeed");
    let base = spawn_server(store).await;

    // A replayed fetcher URL also carries the listing-only parameters.
    let mut params = required_params();
    params.push(("adrnamespace".to_string(), NAMESPACES.to_string()));
    params.push(("adrslots".to_string(), "main".to_string()));
    params.push(("adrlimit".to_string(), "max".to_string()));

    let response = reqwest::Client::new()
        .get(&base)
        .query(&params)
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(response.status(), 200);
}
