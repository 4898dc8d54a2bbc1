mod common;

use axum_test::TestServer;
use serde_json::json;
use shortify::routes::app_router;
use shortify::state::AppState;
use std::sync::Arc;

fn test_server(state: AppState) -> TestServer {
    let app = app_router(state).layer(common::MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

async fn shorten(server: &TestServer, url: &str, ttl_days: i32) -> String {
    let response = server
        .post("/api/shorten")
        .json(&json!({ "urls": [{ "url": url, "ttl_days": ttl_days }] }))
        .await;

    let json = response.json::<serde_json::Value>();
    json["items"][0]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_stats_fresh_link() {
    let server = test_server(common::create_test_state());
    let code = shorten(&server, "https://example.com/page", 0).await;

    let response = server.get(&format!("/api/stats/{code}")).await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], code);
    assert_eq!(json["target_url"], "https://example.com/page");
    assert_eq!(json["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["visits"], 0);
    assert_eq!(json["expired"], false);
    assert!(json["created_at"].is_string());
    assert!(json["expires_at"].is_null());
}

#[tokio::test]
async fn test_stats_counts_redirects() {
    let server = test_server(common::create_test_state());
    let code = shorten(&server, "https://example.com/page", 0).await;

    for _ in 0..3 {
        server.get(&format!("/{code}")).await;
    }

    let response = server.get(&format!("/api/stats/{code}")).await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["visits"], 3);
}

#[tokio::test]
async fn test_stats_does_not_count_as_visit() {
    let server = test_server(common::create_test_state());
    let code = shorten(&server, "https://example.com/page", 0).await;
    server.get(&format!("/{code}")).await;

    server.get(&format!("/api/stats/{code}")).await;
    let response = server.get(&format!("/api/stats/{code}")).await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["visits"], 1);
}

#[tokio::test]
async fn test_stats_not_found() {
    let server = test_server(common::create_test_state());

    let response = server.get("/api/stats/doesnotexist").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_stats_expired_link_still_reported() {
    let server = test_server(common::create_state_with(Arc::new(
        common::BackdatedStore::default(),
    )));
    let code = shorten(&server, "https://example.com/old", 1).await;

    let response = server.get(&format!("/api/stats/{code}")).await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expired"], true);
    assert!(json["expires_at"].is_string());
    assert_eq!(json["visits"], 0);
}

#[tokio::test]
async fn test_stats_short_path_alias() {
    let server = test_server(common::create_test_state());
    let code = shorten(&server, "https://example.com/page", 0).await;
    server.get(&format!("/{code}")).await;

    let response = server.get(&format!("/{code}/stats")).await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], code);
    assert_eq!(json["visits"], 1);
}

#[tokio::test]
async fn test_stats_short_path_alias_not_found() {
    let server = test_server(common::create_test_state());

    let response = server.get("/doesnotexist/stats").await;

    response.assert_status_not_found();
}
