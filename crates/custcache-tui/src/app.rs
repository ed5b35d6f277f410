//! Application state for the terminal UI.
//!
//! `App` owns the `CustomerBoard` and the view model the board draws into.
//! The dataset fetch runs on a background task; its result comes back over a
//! channel and is applied on the UI loop, so the board only ever has one
//! owner.

use custcache_core::api::ApiError;
use custcache_core::{CustomerBoard, DisplaySink, LoadState, Record, Table};
use tokio::sync::mpsc;
use tracing::{debug, error};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the fetch result channel. Only one fetch runs at a time.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum length for the search query.
const MAX_SEARCH_LENGTH: usize = 100;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

type FetchResult = Result<Vec<Record>, ApiError>;

/// What the board has asked us to display.
#[derive(Debug, Default)]
pub struct TableView {
    pub status: String,
    /// `None` until the board renders for the first time.
    pub table: Option<Table>,
}

impl TableView {
    /// Number of selectable data rows. The informational row of an empty
    /// table is not selectable.
    pub fn data_row_count(&self) -> usize {
        match self.table {
            Some(ref table) if !table.is_placeholder() => table.rows.len(),
            _ => 0,
        }
    }
}

impl DisplaySink for TableView {
    fn report_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn render_rows(&mut self, headers: &[String], rows: &[Vec<String>]) {
        self.table = Some(Table {
            headers: headers.to_vec(),
            rows: rows.to_vec(),
        });
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub board: CustomerBoard,
    pub view: TableView,

    pub state: AppState,
    pub search_query: String,
    pub selection: usize,

    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
    loading: bool,
}

impl App {
    pub fn new(board: CustomerBoard) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            board,
            view: TableView::default(),
            state: AppState::Normal,
            search_query: String::new(),
            selection: 0,
            fetch_rx,
            fetch_tx,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Spawn a background fetch. Ignored while one is already running.
    pub fn start_load(&mut self) {
        if self.is_loading() {
            debug!("Load already in progress");
            return;
        }
        self.loading = true;
        self.board.begin_load(&mut self.view);

        let client = self.board.client().clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch().await;
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });
    }

    /// Apply any finished fetch.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.loading = false;
            let state = self.board.complete_load(result, &mut self.view);
            debug!(?state, "Load finished");
            self.clamp_selection();
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.board.state()
    }

    pub fn status_text(&self) -> &str {
        &self.view.status
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn push_search_char(&mut self, c: char) {
        if can_add_search_char(self.search_query.chars().count(), c) {
            self.search_query.push(c);
            self.apply_search();
        }
    }

    pub fn pop_search_char(&mut self) {
        if self.search_query.pop().is_some() {
            self.apply_search();
        }
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.apply_search();
    }

    /// Re-run the search on every change; there is no debounce.
    fn apply_search(&mut self) {
        self.board.search(&self.search_query, &mut self.view);
        self.selection = 0;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select_next(&mut self, step: usize) {
        let count = self.view.data_row_count();
        if count > 0 {
            self.selection = (self.selection + step).min(count - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.view.data_row_count().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.view.data_row_count();
        self.selection = self.selection.min(count.saturating_sub(1));
    }

    /// Label for the title bar describing the active user scope.
    pub fn scope_label(&self) -> String {
        match self.board.active_user_code() {
            Some(code) if !code.trim().is_empty() => format!("User {}", code.trim()),
            _ => "All users".to_string(),
        }
    }
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a search character should be accepted
pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    use custcache_core::api::DatasetClient;
    use custcache_core::board::{DataSource, STATUS_LOADING};
    use custcache_core::cache::CacheManager;
    use custcache_core::prefs::PreferenceStore;
    use tempfile::TempDir;

    pub(crate) fn test_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let client = DatasetClient::new(None, Duration::from_secs(1)).unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();
        let prefs = PreferenceStore::new(dir.path().join("config"));
        let board = CustomerBoard::new(client, cache, prefs, "Cody Code");
        (dir, App::new(board))
    }

    pub(crate) fn customers() -> Vec<Record> {
        ["Alpha", "Bravo", "Charlie", "Delta"]
            .iter()
            .map(|name| Record::new().with("Name", *name).with("Cody Code", "X1"))
            .collect()
    }

    pub(crate) async fn deliver(app: &mut App, result: FetchResult) {
        app.fetch_tx.send(result).await.unwrap();
        app.check_background_tasks();
    }

    #[tokio::test]
    async fn test_fetch_result_is_applied() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        assert_eq!(app.load_state(), LoadState::Loaded(DataSource::Online));
        assert_eq!(app.view.data_row_count(), 4);
        assert_eq!(app.status_text(), "Data loaded (4 customers)");
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Err(ApiError::NotConfigured)).await;

        assert_eq!(app.load_state(), LoadState::Empty);
        assert!(app.view.table.is_none());
        assert_eq!(app.view.data_row_count(), 0);
    }

    #[tokio::test]
    async fn test_keyless_first_record_rows_are_selectable() {
        let (_dir, mut app) = test_app();
        let rows = vec![Record::new(), Record::new().with("Name", "Bob")];
        deliver(&mut app, Ok(rows)).await;

        assert_eq!(app.view.data_row_count(), 2);
        app.select_last();
        assert_eq!(app.selection, 1);
    }

    #[tokio::test]
    async fn test_start_load_reports_loading() {
        let (_dir, mut app) = test_app();
        app.start_load();
        assert!(app.is_loading());
        assert_eq!(app.status_text(), STATUS_LOADING);
        assert_eq!(app.load_state(), LoadState::Fetching);
    }

    #[tokio::test]
    async fn test_search_updates_on_every_keystroke() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        app.push_search_char('a');
        assert_eq!(app.view.data_row_count(), 4);
        app.push_search_char('l');
        assert_eq!(app.view.data_row_count(), 1);
        app.pop_search_char();
        assert_eq!(app.view.data_row_count(), 4);

        app.push_search_char('z');
        assert_eq!(app.view.data_row_count(), 0);
        assert!(app.view.table.as_ref().unwrap().is_placeholder());

        app.clear_search();
        assert_eq!(app.view.data_row_count(), 4);
    }

    #[tokio::test]
    async fn test_selection_bounds() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        app.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(app.selection, 3);
        app.select_prev(1);
        assert_eq!(app.selection, 2);
        app.select_prev(PAGE_SCROLL_SIZE);
        assert_eq!(app.selection, 0);
        app.select_last();
        assert_eq!(app.selection, 3);
        app.select_first();
        assert_eq!(app.selection, 0);
    }

    #[tokio::test]
    async fn test_selection_clamped_after_reload() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;
        app.select_last();

        deliver(&mut app, Ok(customers()[..2].to_vec())).await;
        assert_eq!(app.selection, 1);
    }

    #[test]
    fn test_scope_label() {
        let (dir, app) = test_app();
        assert_eq!(app.scope_label(), "All users");

        PreferenceStore::new(dir.path().join("config"))
            .set_active_user_code(" X1 ")
            .unwrap();
        assert_eq!(app.scope_label(), "User X1");
    }

    #[test]
    fn test_can_add_search_char() {
        assert!(can_add_search_char(0, 'a'));
        assert!(can_add_search_char(99, ' '));
        assert!(!can_add_search_char(100, 'a'));
        assert!(!can_add_search_char(0, '\n'));
        assert!(!can_add_search_char(0, '\x1b'));
    }
}
