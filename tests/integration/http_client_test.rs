//! HTTP client tests.
//!
//! Checks request shapes and how each kind of response is classified.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use sqlview::api::{EngineApi, HttpEngineClient};
use sqlview::config::ApiConfig;
use sqlview::error::ConsoleError;
use sqlview::result::{ColumnMeta, QueryResult, StatusOutcome, Value};
use wiremock::{MockServer, ResponseTemplate};

use super::common::{
    client_for, expect_batch, expect_query, expect_tables, json_reply, unused_url,
};

#[tokio::test]
async fn test_query_posts_json_and_classifies_rows() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT * FROM Restaurantes;",
        json_reply(
            200,
            json!({
                "status": "success",
                "columns": [{"name": "id", "type": "INT"}, {"name": "nombre", "type": "VARCHAR"}],
                "records": [[1, "El Buen Sabor"], [2, null]],
                "table_name": "Restaurantes"
            }),
        ),
    )
    .await;

    let result = client_for(&server, 5)
        .query("SELECT * FROM Restaurantes;")
        .await
        .unwrap();

    let tabular = result.as_tabular().expect("tabular result");
    assert_eq!(
        tabular.columns,
        vec![ColumnMeta::new("id", "INT"), ColumnMeta::new("nombre", "VARCHAR")]
    );
    assert_eq!(tabular.records[1], vec![Value::Int(2), Value::Null]);
    assert_eq!(tabular.table_name.as_deref(), Some("Restaurantes"));
}

#[tokio::test]
async fn test_status_payload_without_records() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "INSERT INTO T VALUES (1)",
        json_reply(200, json!({"status": "success", "message": "Inserted 1 record"})),
    )
    .await;

    let result = client_for(&server, 5)
        .query("INSERT INTO T VALUES (1)")
        .await
        .unwrap();
    assert_eq!(result, QueryResult::success("Inserted 1 record"));
}

#[tokio::test]
async fn test_ok_response_with_error_status_is_application_error() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELEC * FROM T",
        json_reply(200, json!({"status": "error", "message": "syntax error"})),
    )
    .await;

    let err = client_for(&server, 5).query("SELEC * FROM T").await.unwrap_err();
    assert_eq!(err, ConsoleError::application("syntax error"));
}

#[tokio::test]
async fn test_error_detail_is_kept_verbatim() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "INSERT INTO T VALUES (1)",
        json_reply(
            200,
            json!({
                "status": "error",
                "message": "Insert failed",
                "error": "ValueError: time data '2024-13-01'\n  at column fechaRegistro"
            }),
        ),
    )
    .await;

    let err = client_for(&server, 5)
        .query("INSERT INTO T VALUES (1)")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Insert failed");
    assert_eq!(
        err.detail(),
        Some("ValueError: time data '2024-13-01'\n  at column fechaRegistro")
    );
}

#[tokio::test]
async fn test_non_2xx_uses_body_message() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT 1",
        json_reply(400, json!({"error": "Query is required"})),
    )
    .await;

    let err = client_for(&server, 5).query("SELECT 1").await.unwrap_err();
    assert_eq!(err, ConsoleError::application("Query is required"));
}

#[tokio::test]
async fn test_unparseable_body_reports_status_code() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT 1",
        ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"),
    )
    .await;

    let err = client_for(&server, 5).query("SELECT 1").await.unwrap_err();
    assert_eq!(err, ConsoleError::malformed(500));
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_ragged_records_are_rejected() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT * FROM T",
        json_reply(
            200,
            json!({
                "columns": [{"name": "id", "type": "INT"}],
                "records": [[1, "extra", "more"], []]
            }),
        ),
    )
    .await;

    let err = client_for(&server, 5).query("SELECT * FROM T").await.unwrap_err();
    assert_eq!(err, ConsoleError::ragged_record(0, 3, 1));
    assert_eq!(err.category(), "Response Error");
}

#[tokio::test]
async fn test_unreachable_engine_gets_guidance_message() {
    let url = unused_url().await;
    let client = HttpEngineClient::new(&ApiConfig {
        url: url.clone(),
        timeout_secs: 5,
    })
    .unwrap();

    let err = client.query("SELECT 1").await.unwrap_err();
    assert_eq!(err, ConsoleError::unreachable(&url));
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn test_slow_engine_times_out() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT 1",
        json_reply(200, json!({"status": "success"})).set_delay(Duration::from_secs(5)),
    )
    .await;

    let err = client_for(&server, 1).query("SELECT 1").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_tables() {
    let server = MockServer::start().await;
    expect_tables(&server, json_reply(200, json!({"tables": ["cancer", "cars"]}))).await;

    let tables = client_for(&server, 5).list_tables().await.unwrap();
    assert_eq!(tables, vec!["cancer".to_string(), "cars".to_string()]);
}

#[tokio::test]
async fn test_list_tables_failure_message() {
    let server = MockServer::start().await;
    expect_tables(
        &server,
        json_reply(500, json!({"message": "Could not read data directory"})),
    )
    .await;

    let err = client_for(&server, 5).list_tables().await.unwrap_err();
    assert_eq!(err, ConsoleError::application("Could not read data directory"));
}

#[tokio::test]
async fn test_list_tables_without_field_is_malformed() {
    let server = MockServer::start().await;
    expect_tables(&server, json_reply(200, json!({"status": "success"}))).await;

    let err = client_for(&server, 5).list_tables().await.unwrap_err();
    assert_eq!(err, ConsoleError::malformed(200));
}

#[tokio::test]
async fn test_batch_classifies_each_entry() {
    let queries = vec![
        "CREATE TABLE T (id INT KEY);".to_string(),
        "SELECT * FROM T;".to_string(),
        "SELEC".to_string(),
    ];
    let server = MockServer::start().await;
    expect_batch(
        &server,
        &queries,
        json_reply(
            200,
            json!({"results": [
                {
                    "query": "CREATE TABLE T (id INT KEY);",
                    "status": "success",
                    "result": {"status": "success", "message": "Table T created"}
                },
                {
                    "query": "SELECT * FROM T;",
                    "status": "success",
                    "result": {"status": "success", "records": [], "columns": [{"name": "id", "type": "INT"}]}
                },
                {
                    "query": "SELEC",
                    "status": "error",
                    "error": "Parse error: unexpected token"
                }
            ]}),
        ),
    )
    .await;

    let entries = client_for(&server, 5).batch(&queries).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].result, QueryResult::success("Table T created"));
    assert!(entries[1].result.as_tabular().unwrap().is_empty());
    let failed = entries[2].result.as_status().unwrap();
    assert_eq!(failed.outcome, StatusOutcome::Error);
    assert_eq!(failed.message, "Parse error: unexpected token");
}
