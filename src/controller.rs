//! Query submission controller.
//!
//! Owns the query text, the execution state and the refresh token. Each
//! submission is an *attempt* with its own id and cancellation token; only
//! the current, uncancelled attempt may settle into state.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::EngineApi;
use crate::error::{ConsoleError, Result};
use crate::pagination::{Nav, Page, PageCursor};
use crate::result::{QueryResult, Record, TabularResult};

/// Statements after which the table directory must be re-fetched.
static REFRESH_TRIGGERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)CREATE TABLE|DROP TABLE|DELETE FROM").expect("valid regex")
});

/// Returns true if a successful `sql` should trigger a table directory refresh.
pub fn should_refresh_tables(sql: &str) -> bool {
    REFRESH_TRIGGERS.is_match(sql)
}

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExecutionState {
    #[default]
    Idle,
    Loading,
    Succeeded(QueryResult),
    Failed(ConsoleError),
}

impl ExecutionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            Self::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ConsoleError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Monotonic counter whose increment tells dependents to re-fetch.
#[derive(Debug)]
pub struct RefreshToken {
    tx: watch::Sender<u64>,
}

impl RefreshToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    /// Current value.
    pub fn value(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Returns a receiver that observes every increment.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Increments the counter and returns the new value.
    pub fn bump(&self) -> u64 {
        self.tx.send_modify(|v| *v += 1);
        self.value()
    }
}

impl Default for RefreshToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of one submission.
pub type AttemptId = u64;

/// A submission that has been started but not settled.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub id: AttemptId,
    pub sql: String,
    pub cancel: CancellationToken,
}

impl Attempt {
    /// Sends the attempt to the engine, resolving early if it is cancelled.
    pub async fn run(&self, api: &dyn EngineApi) -> Result<QueryResult> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(ConsoleError::Cancelled),
            outcome = api.query(&self.sql) => outcome,
        }
    }
}

/// Owns query text and execution state for one console.
pub struct QueryController {
    api: Arc<dyn EngineApi>,
    query_text: String,
    state: ExecutionState,
    refresh: RefreshToken,
    results_cursor: PageCursor,
    result_generation: u64,
    next_attempt: AttemptId,
    in_flight: Option<Attempt>,
}

impl QueryController {
    /// Creates an idle controller whose results view shows `page_size` rows.
    pub fn new(api: Arc<dyn EngineApi>, page_size: usize) -> Self {
        Self {
            api,
            query_text: String::new(),
            state: ExecutionState::Idle,
            refresh: RefreshToken::new(),
            results_cursor: PageCursor::new(page_size),
            result_generation: 0,
            next_attempt: 1,
            in_flight: None,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Replaces the query text (used by the table directory and the catalog).
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh
    }

    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    pub fn results_cursor(&self) -> &PageCursor {
        &self.results_cursor
    }

    /// Starts an attempt for `sql`.
    ///
    /// Returns `None` without touching state when `sql` is blank or an
    /// attempt is already loading. Otherwise the previous result or error is
    /// dropped and the state becomes `Loading`.
    pub fn begin(&mut self, sql: &str) -> Option<Attempt> {
        if sql.trim().is_empty() {
            debug!("ignoring blank submission");
            return None;
        }
        if self.state.is_loading() {
            debug!("ignoring submission while loading");
            return None;
        }

        self.state = ExecutionState::Loading;
        self.replace_results_source();

        let attempt = Attempt {
            id: self.next_attempt,
            sql: sql.to_string(),
            cancel: CancellationToken::new(),
        };
        self.next_attempt += 1;
        self.in_flight = Some(attempt.clone());
        Some(attempt)
    }

    /// Settles attempt `id` with `outcome`.
    ///
    /// Returns `false` and leaves state untouched when `id` is not the
    /// current attempt or the attempt was cancelled.
    pub fn settle(&mut self, id: AttemptId, outcome: Result<QueryResult>) -> bool {
        let attempt = match self.in_flight.take() {
            Some(a) if a.id == id && !a.cancel.is_cancelled() => a,
            other => {
                debug!(attempt = id, "dropping stale outcome");
                self.in_flight = other;
                return false;
            }
        };

        self.replace_results_source();
        match outcome {
            Ok(result) => {
                self.state = ExecutionState::Succeeded(result);
                if should_refresh_tables(&attempt.sql) {
                    let token = self.refresh.bump();
                    info!(token, "table directory refresh requested");
                }
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "query failed");
                self.state = ExecutionState::Failed(e);
            }
        }
        true
    }

    /// Cancels the in-flight attempt and returns to `Idle`.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(attempt) => {
                attempt.cancel.cancel();
                self.state = ExecutionState::Idle;
                debug!(attempt = attempt.id, "attempt cancelled");
                true
            }
            None => false,
        }
    }

    /// Submits `sql` and waits for it to settle.
    pub async fn execute(&mut self, sql: &str) -> &ExecutionState {
        if let Some(attempt) = self.begin(sql) {
            let api = Arc::clone(&self.api);
            let outcome = attempt.run(api.as_ref()).await;
            self.settle(attempt.id, outcome);
        }
        &self.state
    }

    /// Submits the owned query text.
    pub async fn submit(&mut self) -> &ExecutionState {
        let sql = self.query_text.clone();
        self.execute(&sql).await
    }

    /// Current page of the tabular result, if the last attempt produced one.
    pub fn results_page(&self) -> Option<Page<'_, Record>> {
        let tabular = self.state.result()?.as_tabular()?;
        Some(self.results_cursor.page(&tabular.records))
    }

    /// Moves the results cursor. Returns `false` when nothing moved.
    pub fn navigate_results(&mut self, nav: Nav) -> bool {
        let total = self.result_rows();
        self.results_cursor.go(nav, total)
    }

    /// Jumps the results cursor to `page_index`, clamped into range.
    pub fn go_to_results_page(&mut self, page_index: usize) -> bool {
        let total = self.result_rows();
        self.results_cursor.go_to(page_index, total)
    }

    fn result_rows(&self) -> usize {
        self.state
            .result()
            .and_then(QueryResult::as_tabular)
            .map_or(0, TabularResult::row_count)
    }

    fn replace_results_source(&mut self) {
        self.result_generation += 1;
        self.results_cursor.sync_source(self.result_generation);
    }
}
