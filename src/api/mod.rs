//! Engine API layer for sqlview.
//!
//! Provides a trait-based interface to the remote query engine so the
//! controller and the table directory can run against the HTTP client or an
//! in-memory mock interchangeably.

mod http;
mod mock;

pub use http::HttpEngineClient;
pub use mock::MockEngine;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConsoleError, Result};
use crate::result::{classify, QueryPayload, QueryResult, StatusOutcome, StatusResult};

/// Trait defining the operations the engine exposes.
///
/// Implementations classify responses before returning them: callers only
/// ever see a [`QueryResult`] or a [`ConsoleError`](crate::error::ConsoleError).
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Base URL the engine is expected at, used in guidance messages.
    fn api_url(&self) -> &str;

    /// Executes one statement.
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Lists the names of all tables.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Executes several statements in one request; each is classified on its own.
    async fn batch(&self, queries: &[String]) -> Result<Vec<BatchEntry>>;
}

/// One statement of a batch together with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub query: String,
    pub result: QueryResult,
}

/// Builds the application error for a failed response.
pub(crate) fn application_error(
    status_code: u16,
    message: Option<String>,
    detail: Option<String>,
) -> ConsoleError {
    ConsoleError::Application {
        message: message
            .unwrap_or_else(|| format!("Request failed with status code {status_code}")),
        detail,
    }
}

/// Classifies a successful payload, rejecting records whose width does not
/// match the columns.
pub(crate) fn classify_checked(payload: QueryPayload) -> Result<QueryResult> {
    if let Some((row, width, expected)) = payload.ragged_record() {
        warn!(row, width, expected, "record width does not match columns");
        return Err(ConsoleError::ragged_record(row, width, expected));
    }
    Ok(classify(payload))
}

/// Body of a `/tables` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TablesPayload {
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub queries: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponse {
    #[serde(default)]
    pub results: Vec<BatchItemPayload>,
}

/// One element of a `/batch` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchItemPayload {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<QueryPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchItemPayload {
    /// Classifies the entry. A failed entry becomes an error status carrying
    /// the engine's message; a successful one goes through [`classify`].
    pub fn into_entry(self) -> BatchEntry {
        let result = if self.status.as_deref() == Some("error") {
            QueryResult::Status(StatusResult {
                outcome: StatusOutcome::Error,
                message: self
                    .error
                    .unwrap_or_else(|| crate::result::DEFAULT_ERROR_MESSAGE.to_string()),
                detail: None,
            })
        } else {
            classify_checked(self.result.unwrap_or_default()).unwrap_or_else(|e| {
                QueryResult::Status(StatusResult {
                    outcome: StatusOutcome::Error,
                    message: e.to_string(),
                    detail: None,
                })
            })
        };
        BatchEntry {
            query: self.query,
            result,
        }
    }
}
