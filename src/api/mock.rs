//! Mock engine for testing.
//!
//! Keeps a tiny in-memory table catalog so that `CREATE TABLE` / `DROP TABLE`
//! statements change what `/tables` returns, and lets tests script the next
//! responses, inject failures and add latency.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::{application_error, classify_checked, BatchEntry, EngineApi};
use crate::error::{ConsoleError, Result};
use crate::result::{ColumnMeta, QueryPayload, QueryResult, Value};

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*CREATE\s+TABLE\s+(\w+)").expect("valid regex"));

static DROP_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*DROP\s+TABLE\s+(\w+)").expect("valid regex"));

/// Base URL reported by the mock.
pub const MOCK_API_URL: &str = "mock://engine";

/// An in-memory engine that answers with predefined results.
#[derive(Debug, Default)]
pub struct MockEngine {
    tables: Mutex<Vec<String>>,
    scripted: Mutex<VecDeque<Result<QueryResult>>>,
    tables_error: Mutex<Option<ConsoleError>>,
    latency: Option<Duration>,
    submitted: Mutex<Vec<String>>,
    query_calls: AtomicUsize,
    table_calls: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockEngine {
    /// Creates a mock engine with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock engine that already knows the given tables.
    pub fn with_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = Self::new();
        *lock(&engine.tables) = tables.into_iter().map(Into::into).collect();
        engine
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues a raw payload; it is classified like an engine response would be.
    pub fn push_payload(&self, payload: QueryPayload) {
        let outcome = if payload.is_error_flagged() {
            let (message, detail) = payload.message_and_detail();
            Err(application_error(200, message, detail))
        } else {
            classify_checked(payload)
        };
        lock(&self.scripted).push_back(outcome);
    }

    /// Queues an error for the next query.
    pub fn push_error(&self, error: ConsoleError) {
        lock(&self.scripted).push_back(Err(error));
    }

    /// Makes every `/tables` call fail with `error` until cleared.
    pub fn fail_tables(&self, error: Option<ConsoleError>) {
        *lock(&self.tables_error) = error;
    }

    /// Number of `query` calls received.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_tables` calls received.
    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    /// Statements received so far, in order.
    pub fn submitted(&self) -> Vec<String> {
        lock(&self.submitted).clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Default behaviour when nothing is scripted.
    fn respond(&self, sql: &str) -> QueryResult {
        let sql_upper = sql.trim_start().to_uppercase();

        if sql_upper.starts_with("SELECT") {
            return QueryResult::tabular(
                vec![ColumnMeta::new("result", "VARCHAR")],
                vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            );
        }

        let mut tables = lock(&self.tables);
        if let Some(caps) = CREATE_TABLE.captures(sql) {
            tables.push(caps[1].to_string());
            return QueryResult::success(format!("Table {} created successfully", &caps[1]));
        }
        if let Some(caps) = DROP_TABLE.captures(sql) {
            tables.retain(|t| !t.eq_ignore_ascii_case(&caps[1]));
            return QueryResult::success(format!("Table {} dropped successfully", &caps[1]));
        }

        QueryResult::success(crate::result::DEFAULT_SUCCESS_MESSAGE)
    }
}

#[async_trait]
impl EngineApi for MockEngine {
    fn api_url(&self) -> &str {
        MOCK_API_URL
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.submitted).push(sql.to_string());
        self.simulate_latency().await;

        let scripted = lock(&self.scripted).pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => Ok(self.respond(sql)),
        }
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = lock(&self.tables_error).clone() {
            return Err(err);
        }
        Ok(lock(&self.tables).clone())
    }

    async fn batch(&self, queries: &[String]) -> Result<Vec<BatchEntry>> {
        let mut entries = Vec::with_capacity(queries.len());
        for query in queries {
            let result = match self.query(query).await {
                Ok(result) => result,
                Err(e) => QueryResult::Status(crate::result::StatusResult {
                    outcome: crate::result::StatusOutcome::Error,
                    message: e.to_string(),
                    detail: e.detail().map(str::to_string),
                }),
            };
            entries.push(BatchEntry {
                query: query.clone(),
                result,
            });
        }
        Ok(entries)
    }
}
