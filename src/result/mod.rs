//! Result classification and value formatting.
//!
//! Response payloads are turned into a [`QueryResult`] exactly once, at the
//! network boundary. Everything downstream matches on the tagged result.

mod format;
mod types;

pub use format::{format_value, TIMESTAMP_RANGE};
pub use types::{
    ColumnMeta, QueryResult, Record, StatusOutcome, StatusResult, TabularResult, Value,
};

use serde::{Deserialize, Serialize};

/// Message used for status payloads that report success without one.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// Message used for status payloads that report failure without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Operation failed";

/// Body of a `/query` response as sent by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnMeta>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryPayload {
    /// Returns true when the payload carries the application-level error flag.
    pub fn is_error_flagged(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Summary message plus optional raw diagnostic.
    ///
    /// `message` wins over `error`; when both are present `error` becomes the
    /// diagnostic.
    pub fn message_and_detail(&self) -> (Option<String>, Option<String>) {
        match (&self.message, &self.error) {
            (Some(m), Some(e)) if m != e => (Some(m.clone()), Some(e.clone())),
            (Some(m), _) => (Some(m.clone()), None),
            (None, Some(e)) => (Some(e.clone()), None),
            (None, None) => (None, None),
        }
    }

    /// Finds the first record whose width differs from the column count.
    ///
    /// Without column metadata the first record sets the expected width.
    /// Returns `(row_index, width, expected)`.
    pub fn ragged_record(&self) -> Option<(usize, usize, usize)> {
        let records = self.records.as_ref()?;
        let expected = match &self.columns {
            Some(columns) if !columns.is_empty() => columns.len(),
            _ => records.first()?.len(),
        };
        records
            .iter()
            .position(|r| r.len() != expected)
            .map(|i| (i, records[i].len(), expected))
    }
}

/// Classifies a response payload.
///
/// A payload is tabular iff it carries a non-null `records` field. Otherwise
/// it is a status result, successful when `status` is `"success"` or absent.
pub fn classify(payload: QueryPayload) -> QueryResult {
    let succeeded = matches!(payload.status.as_deref(), None | Some("success"));
    let (message, detail) = payload.message_and_detail();

    match payload.records {
        Some(records) => {
            let mut tabular = TabularResult::new(payload.columns.unwrap_or_default(), records);
            tabular.table_name = payload.table_name;
            QueryResult::Tabular(tabular)
        }
        None => {
            let (outcome, fallback) = if succeeded {
                (StatusOutcome::Success, DEFAULT_SUCCESS_MESSAGE)
            } else {
                (StatusOutcome::Error, DEFAULT_ERROR_MESSAGE)
            };
            QueryResult::Status(StatusResult {
                outcome,
                message: message.unwrap_or_else(|| fallback.to_string()),
                detail,
            })
        }
    }
}
