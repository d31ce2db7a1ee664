//! Table directory fetcher.
//!
//! Lists the engine's tables and re-fetches whenever the controller's
//! refresh token changes. A failed fetch replaces the list with an error
//! that stays until the next refresh.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::EngineApi;
use crate::error::ConsoleError;
use crate::pagination::{Nav, Page, PageCursor};

/// Statement placed in the query box when a table is selected.
///
/// The name is inserted as-is; rejecting malformed identifiers is left to the
/// engine.
pub fn select_statement(table: &str) -> String {
    format!("SELECT * FROM {table};")
}

/// What the directory currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DirectoryState {
    #[default]
    Loading,
    Loaded(Vec<String>),
    Failed(ConsoleError),
}

/// Table list with its own page cursor.
pub struct TableDirectory {
    api: Arc<dyn EngineApi>,
    state: DirectoryState,
    cursor: PageCursor,
    generation: u64,
}

/// A directory running in its own task.
pub struct DirectoryHandle {
    pub task: JoinHandle<()>,
    pub updates: watch::Receiver<DirectoryState>,
}

impl TableDirectory {
    pub fn new(api: Arc<dyn EngineApi>, page_size: usize) -> Self {
        Self {
            api,
            state: DirectoryState::Loading,
            cursor: PageCursor::new(page_size),
            generation: 0,
        }
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    /// Table names, empty unless loaded.
    pub fn tables(&self) -> &[String] {
        match &self.state {
            DirectoryState::Loaded(tables) => tables,
            _ => &[],
        }
    }

    /// Fetches the table list, replacing whatever was shown before.
    pub async fn fetch(&mut self) -> &DirectoryState {
        self.state = DirectoryState::Loading;
        self.state = match self.api.list_tables().await {
            Ok(tables) => {
                debug!(count = tables.len(), "table list loaded");
                DirectoryState::Loaded(tables)
            }
            Err(e) => {
                warn!(error = %e, "failed to load tables");
                DirectoryState::Failed(e)
            }
        };
        self.generation += 1;
        self.cursor.sync_source(self.generation);
        &self.state
    }

    /// Fetches if `refresh` holds a value this directory has not seen yet.
    pub async fn sync(&mut self, refresh: &mut watch::Receiver<u64>) -> bool {
        if !refresh.has_changed().unwrap_or(false) && self.generation > 0 {
            return false;
        }
        let _ = refresh.borrow_and_update();
        self.fetch().await;
        true
    }

    /// Current page of table names.
    pub fn page(&self) -> Page<'_, String> {
        self.cursor.page(self.tables())
    }

    /// Moves the page cursor. Returns `false` when nothing moved.
    pub fn navigate(&mut self, nav: Nav) -> bool {
        let total = self.tables().len();
        self.cursor.go(nav, total)
    }

    /// Jumps to `page_index`, clamped into range.
    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        let total = self.tables().len();
        self.cursor.go_to(page_index, total)
    }

    /// Runs the directory as a subscriber of `refresh`: one fetch for the
    /// initial value, then one per observed change. Increments that arrive
    /// while a fetch is running are coalesced into the next fetch.
    pub fn spawn(mut self, mut refresh: watch::Receiver<u64>) -> DirectoryHandle {
        let (tx, updates) = watch::channel(DirectoryState::Loading);
        let task = tokio::spawn(async move {
            loop {
                let token = *refresh.borrow_and_update();
                debug!(token, "fetching table list");
                let state = self.fetch().await.clone();
                if tx.send(state).is_err() {
                    break;
                }
                if refresh.changed().await.is_err() {
                    break;
                }
            }
        });
        DirectoryHandle { task, updates }
    }
}
