//! Shared helpers for tests that talk to a stubbed engine over HTTP.

use serde_json::json;
use sqlview::api::HttpEngineClient;
use sqlview::config::ApiConfig;
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL of the engine API served by `server`.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Builds a client pointed at `server`.
pub fn client_for(server: &MockServer, timeout_secs: u64) -> HttpEngineClient {
    HttpEngineClient::new(&ApiConfig {
        url: api_url(server),
        timeout_secs,
    })
    .unwrap()
}

pub fn json_reply(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

/// Expects exactly one `POST /api/query` carrying `sql`.
pub async fn expect_query(server: &MockServer, sql: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_json(json!({ "query": sql })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Expects exactly one `GET /api/tables`.
pub async fn expect_tables(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/tables"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Expects exactly one `POST /api/batch` carrying `queries`.
pub async fn expect_batch(server: &MockServer, queries: &[String], response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/batch"))
        .and(body_json(json!({ "queries": queries })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Returns a URL on which nothing is listening.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
