//! End-to-end flows: submission, classification, pagination and the table
//! directory refresh.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use sqlview::api::{EngineApi, MockEngine};
use sqlview::catalog::ExampleCatalog;
use sqlview::controller::{ExecutionState, QueryController};
use sqlview::directory::{select_statement, DirectoryState, TableDirectory};
use sqlview::error::ConsoleError;
use sqlview::pagination::Nav;
use sqlview::render;
use sqlview::result::{QueryPayload, Value};

use wiremock::MockServer;

use super::common::{client_for, expect_query, json_reply};

#[tokio::test]
async fn test_select_three_rows_fits_one_page() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT * FROM T",
        json_reply(
            200,
            json!({"columns": [{"name": "id", "type": "INT"}], "records": [[1], [2], [3]]}),
        ),
    )
    .await;
    let mut controller = QueryController::new(Arc::new(client_for(&server, 5)), 10);

    let state = controller.execute("SELECT * FROM T").await;
    assert!(matches!(state, ExecutionState::Succeeded(_)));

    let page = controller.results_page().expect("tabular page");
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_pages(), 1);
    assert_eq!(page.range_label(), "1 to 3 of 3");
    assert!(!page.can_prev);
    assert!(!page.can_next);

    let lines = render::render_state(controller.state(), controller.results_cursor());
    assert_eq!(lines.last().unwrap(), "Showing 1 to 3 of 3 | Page 1 of 1");
}

#[tokio::test]
async fn test_application_error_never_yields_rows() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT * FROM",
        json_reply(200, json!({"status": "error", "message": "syntax error", "records": [[1]]})),
    )
    .await;
    let mut controller = QueryController::new(Arc::new(client_for(&server, 5)), 10);

    let state = controller.execute("SELECT * FROM").await;
    assert_eq!(
        state,
        &ExecutionState::Failed(ConsoleError::application("syntax error"))
    );
    assert!(controller.results_page().is_none());
}

#[tokio::test]
async fn test_ragged_rows_fail_instead_of_rendering() {
    let server = MockServer::start().await;
    expect_query(
        &server,
        "SELECT * FROM T",
        json_reply(
            200,
            json!({"columns": [{"name": "id", "type": "INT"}], "records": [[1, "extra", "more"], []]}),
        ),
    )
    .await;
    let mut controller = QueryController::new(Arc::new(client_for(&server, 5)), 10);

    let state = controller.execute("SELECT * FROM T").await;
    assert_eq!(
        state,
        &ExecutionState::Failed(ConsoleError::ragged_record(0, 3, 1))
    );
    assert!(controller.results_page().is_none());
    assert_eq!(
        render::render_state(controller.state(), controller.results_cursor()),
        vec!["✗ Response Error: Row 1 has 3 values but 1 columns were returned"]
    );
}

#[tokio::test]
async fn test_paging_through_results_reconstructs_rows() {
    let engine = Arc::new(MockEngine::new());
    let rows: Vec<Vec<Value>> = (0..23).map(|i| vec![Value::Int(i)]).collect();
    engine.push_payload(QueryPayload {
        records: Some(rows.clone()),
        ..Default::default()
    });

    let mut controller = QueryController::new(engine, 10);
    controller.execute("SELECT * FROM numbers").await;

    let mut seen = Vec::new();
    loop {
        let page = controller.results_page().unwrap();
        seen.extend_from_slice(page.items);
        if !controller.navigate_results(Nav::Next) {
            break;
        }
    }
    assert_eq!(seen, rows);
    assert_eq!(controller.results_page().unwrap().range_label(), "21 to 23 of 23");
}

#[tokio::test]
async fn test_create_table_refreshes_directory() {
    let engine = Arc::new(MockEngine::with_tables(["cars"]));
    let mut controller = QueryController::new(engine.clone(), 10);
    let mut directory = TableDirectory::new(engine.clone(), 5)
        .spawn(controller.subscribe_refresh())
        .updates;

    directory.changed().await.unwrap();
    assert_eq!(
        *directory.borrow_and_update(),
        DirectoryState::Loaded(vec!["cars".to_string()])
    );

    controller.execute("SELECT * FROM cars").await;
    assert_eq!(controller.refresh_token().value(), 0);

    controller
        .execute("create table Restaurantes (id INT KEY INDEX BPlusTree);")
        .await;
    assert_eq!(controller.refresh_token().value(), 1);

    directory.changed().await.unwrap();
    assert_eq!(
        *directory.borrow_and_update(),
        DirectoryState::Loaded(vec!["cars".to_string(), "Restaurantes".to_string()])
    );
    assert_eq!(engine.table_calls(), 2);
}

#[tokio::test]
async fn test_directory_failure_is_shown_until_next_refresh() {
    let engine = Arc::new(MockEngine::with_tables(["cars"]));
    engine.fail_tables(Some(ConsoleError::unreachable(engine.api_url())));

    let controller = QueryController::new(engine.clone(), 10);
    let mut refresh = controller.subscribe_refresh();
    let mut directory = TableDirectory::new(engine.clone(), 5);

    directory.sync(&mut refresh).await;
    assert!(matches!(directory.state(), DirectoryState::Failed(ConsoleError::Transport(_))));

    engine.fail_tables(None);
    assert!(!directory.sync(&mut refresh).await);
    assert!(matches!(directory.state(), DirectoryState::Failed(_)));

    controller.refresh_token().bump();
    assert!(directory.sync(&mut refresh).await);
    assert_eq!(directory.tables(), ["cars".to_string()]);
}

#[tokio::test]
async fn test_selecting_table_and_example_overwrites_query_text() {
    let engine = Arc::new(MockEngine::with_tables(["Restaurantes"]));
    let mut controller = QueryController::new(engine.clone(), 10);
    let mut directory = TableDirectory::new(engine.clone(), 5);
    directory.fetch().await;

    let name = directory.page().items[0].clone();
    controller.set_query_text(select_statement(&name));
    assert_eq!(controller.query_text(), "SELECT * FROM Restaurantes;");

    let catalog = ExampleCatalog::new(3);
    assert!(catalog.select(0, |sql| controller.set_query_text(sql)));
    assert!(controller.query_text().contains('\n'));

    controller.submit().await;
    assert!(controller.refresh_token().value() == 1);
    assert_eq!(engine.submitted().len(), 1);
    assert!(engine.submitted()[0].starts_with("CREATE TABLE Restaurantes"));
}
