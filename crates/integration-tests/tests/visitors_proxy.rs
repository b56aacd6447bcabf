//! Integration tests for the visitor CRUD relay.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use brightlane_integration_tests::{
    TEST_TOKEN, spawn_site, spawn_upstream, test_config, test_config_without_tokens,
};

/// A visitor upstream that records hits and echoes back what it saw.
async fn visitor_upstream(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route(
            "/api/visitor",
            get(
                |State(hits): State<Arc<AtomicUsize>>,
                 headers: HeaderMap,
                 RawQuery(query): RawQuery| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "authorization": headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok()),
                        "query": query,
                        "visitors": [],
                    }))
                },
            )
            .post(
                |State(hits): State<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (
                        axum::http::StatusCode::CREATED,
                        Json(json!({ "success": true, "echo": body })),
                    )
                },
            ),
        )
        .route(
            "/api/visitor/{id}",
            put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({ "success": true, "id": id, "echo": body }))
            })
            .delete(|Path(id): Path<String>| async move {
                Json(json!({ "success": true, "id": id }))
            }),
        )
        .with_state(hits);
    spawn_upstream(app).await
}

#[tokio::test]
async fn test_list_forwards_token_and_query() {
    let hits = Arc::new(AtomicUsize::new(0));
    let visitors_url = visitor_upstream(Arc::clone(&hits)).await;
    let site = spawn_site(test_config(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .get(site.url("/api/visitors?status=client&limit=5"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["authorization"], format!("Bearer {TEST_TOKEN}"));
    assert_eq!(reply["query"], "status=client&limit=5");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_without_token_fails_before_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let visitors_url = visitor_upstream(Arc::clone(&hits)).await;
    let site = spawn_site(test_config_without_tokens(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .get(site.url("/api/visitors"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(
        reply["error"],
        "Missing VISITORS_API_TOKEN. Please set it in the environment."
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_relays_body_and_status() {
    let hits = Arc::new(AtomicUsize::new(0));
    let visitors_url = visitor_upstream(Arc::clone(&hits)).await;
    let site = spawn_site(test_config(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .post(site.url("/api/visitors"))
        .json(&json!({ "fullName": "Ada Lovelace" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["echo"]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn test_create_rejects_invalid_json_locally() {
    let hits = Arc::new(AtomicUsize::new(0));
    let visitors_url = visitor_upstream(Arc::clone(&hits)).await;
    let site = spawn_site(test_config(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .post(site.url("/api/visitors"))
        .header("content-type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["error"], "Invalid JSON body");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_update_and_delete_relay_verbatim() {
    let hits = Arc::new(AtomicUsize::new(0));
    let visitors_url = visitor_upstream(Arc::clone(&hits)).await;
    let site = spawn_site(test_config(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .put(site.url("/api/visitors/v_42"))
        .json(&json!({ "status": "client" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["id"], "v_42");
    assert_eq!(reply["echo"]["status"], "client");

    let resp = site
        .client
        .delete(site.url("/api/visitors/v_42"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["id"], "v_42");
}

#[tokio::test]
async fn test_mutations_report_transport_failure_as_500() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let site = spawn_site(test_config(&dead_url, &dead_url)).await;

    let resp = site
        .client
        .put(site.url("/api/visitors/v_42"))
        .json(&json!({ "status": "client" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["success"], false);
    assert_eq!(reply["status"], 500);
    assert_eq!(reply["message"], "Failed to update visitor");

    let resp = site
        .client
        .delete(site.url("/api/visitors/v_42"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["message"], "Failed to delete visitor");
}

#[tokio::test]
async fn test_list_and_create_report_transport_failure_as_502() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let site = spawn_site(test_config(&dead_url, &dead_url)).await;

    let resp = site
        .client
        .get(site.url("/api/visitors"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["error"], "Failed to fetch visitors from upstream API");

    let resp = site
        .client
        .post(site.url("/api/visitors"))
        .json(&json!({ "fullName": "Ada Lovelace" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["error"], "Failed to register visitor with upstream API");
}

#[tokio::test]
async fn test_upstream_4xx_relayed_verbatim() {
    let app = Router::new().route(
        "/api/visitor",
        get(|| async {
            (
                axum::http::StatusCode::FORBIDDEN,
                Json(json!({ "error": "Bad token" })),
            )
        }),
    );
    let visitors_url = spawn_upstream(app).await;
    let site = spawn_site(test_config(&visitors_url, &visitors_url)).await;

    let resp = site
        .client
        .get(site.url("/api/visitors"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["error"], "Bad token");
}
