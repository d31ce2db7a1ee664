//! Query result types for sqlview.
//!
//! Defines the structures used to represent results returned by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a query, decided once when the response payload is classified.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Column metadata plus row data.
    Tabular(TabularResult),
    /// Success or failure of a statement that produced no rows.
    Status(StatusResult),
}

impl QueryResult {
    /// Creates a tabular result with the given columns and records.
    pub fn tabular(columns: Vec<ColumnMeta>, records: Vec<Record>) -> Self {
        Self::Tabular(TabularResult::new(columns, records))
    }

    /// Creates a successful status result.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Status(StatusResult {
            outcome: StatusOutcome::Success,
            message: message.into(),
            detail: None,
        })
    }

    /// Returns the tabular payload, if any.
    pub fn as_tabular(&self) -> Option<&TabularResult> {
        match self {
            Self::Tabular(t) => Some(t),
            Self::Status(_) => None,
        }
    }

    /// Returns the status payload, if any.
    pub fn as_status(&self) -> Option<&StatusResult> {
        match self {
            Self::Status(s) => Some(s),
            Self::Tabular(_) => None,
        }
    }
}

/// Rows returned by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnMeta>,

    /// Rows of data, each as long as `columns`.
    pub records: Vec<Record>,

    /// Table the rows were read from, when the engine reports it.
    pub table_name: Option<String>,
}

impl TabularResult {
    /// Creates a tabular result.
    ///
    /// When no column metadata is supplied but rows are, placeholder columns
    /// `column_1..column_n` are synthesized from the widest row.
    pub fn new(mut columns: Vec<ColumnMeta>, records: Vec<Record>) -> Self {
        if columns.is_empty() {
            let width = records.iter().map(Vec::len).max().unwrap_or(0);
            columns = (1..=width)
                .map(|i| ColumnMeta::new(format!("column_{i}"), "unknown"))
                .collect();
        }
        Self {
            columns,
            records,
            table_name: None,
        }
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Whether a status result reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Success,
    Error,
}

/// A non-tabular outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub outcome: StatusOutcome,
    pub message: String,
    /// Raw diagnostic shown verbatim beneath the message.
    pub detail: Option<String>,
}

impl StatusResult {
    pub fn is_success(&self) -> bool {
        self.outcome == StatusOutcome::Success
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name.
    pub name: String,

    /// Column data type as declared by the engine.
    #[serde(rename = "type", default)]
    pub data_type: String,
}

impl ColumnMeta {
    /// Creates a new column with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Record = Vec<Value>;

/// A single value inside a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer that fits in an i64.
    Int(i64),

    /// Any other number.
    Float(f64),

    /// Text value.
    String(String),

    /// JSON array or object, kept opaque.
    Object(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::format_value(self))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Object(other),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Value::from(f),
            Value::String(s) => serde_json::Value::String(s),
            Value::Object(o) => o,
        }
    }
}
