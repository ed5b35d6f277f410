//! Load orchestration and application state.
//!
//! `CustomerBoard` owns the full dataset and the active search term. Loading
//! follows a fixed sequence:
//!
//! ```text
//! Idle -> Fetching -> Loaded(Online)
//!                  -> RestoringCache -> Loaded(Offline)
//!                                    -> Empty
//! ```
//!
//! A successful fetch is written to the cache before it is shown. A failed
//! fetch falls back to the cached snapshot. Whatever is shown is always the
//! user-scoped dataset narrowed by the search term.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiError, DatasetClient};
use crate::cache::{CacheEntry, CacheManager};
use crate::config::Config;
use crate::filter::{search, user_filter};
use crate::models::Record;
use crate::prefs::PreferenceStore;
use crate::sink::DisplaySink;
use crate::table::Table;

pub const STATUS_LOADING: &str = "Loading data...";
pub const STATUS_NO_DATA: &str = "No data available offline yet";

/// Where the displayed dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Fetching,
    RestoringCache,
    Loaded(DataSource),
    Empty,
}

pub struct CustomerBoard {
    client: DatasetClient,
    cache: CacheManager,
    prefs: PreferenceStore,
    identity_field: String,

    state: LoadState,
    all_customers: Vec<Record>,
    search_term: String,
}

impl CustomerBoard {
    pub fn new(
        client: DatasetClient,
        cache: CacheManager,
        prefs: PreferenceStore,
        identity_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache,
            prefs,
            identity_field: identity_field.into(),
            state: LoadState::Idle,
            all_customers: Vec::new(),
            search_term: String::new(),
        }
    }

    /// Wire up a board from configuration and the standard directories.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = DatasetClient::from_config(config)?;

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");
        let cache = CacheManager::new(cache_dir)?;

        let prefs = PreferenceStore::open_default()?;

        Ok(Self::new(client, cache, prefs, config.identity_field.clone()))
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn client(&self) -> &DatasetClient {
        &self.client
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn all_customers(&self) -> &[Record] {
        &self.all_customers
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    /// Read fresh from the preference store on every call.
    pub fn active_user_code(&self) -> Option<String> {
        self.prefs.active_user_code()
    }

    /// The dataset restricted to the active user.
    pub fn scope(&self) -> Vec<&Record> {
        let identity = self.active_user_code();
        user_filter(&self.all_customers, identity.as_deref(), &self.identity_field)
    }

    /// The records currently on display: scope narrowed by the search term.
    pub fn visible(&self) -> Vec<&Record> {
        search(self.scope(), &self.search_term)
    }

    pub fn table(&self) -> Table {
        Table::build(self.visible())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Run the whole load sequence: fetch, then persist or fall back.
    pub async fn load(&mut self, sink: &mut dyn DisplaySink) -> LoadState {
        self.begin_load(sink);
        let result = self.client.fetch().await;
        self.complete_load(result, sink)
    }

    /// Enter `Fetching`. Callers that run the fetch themselves (for example
    /// on a background task) call this, then `complete_load` with the result.
    pub fn begin_load(&mut self, sink: &mut dyn DisplaySink) {
        info!(url = ?self.client.data_url(), "Loading dataset");
        self.state = LoadState::Fetching;
        sink.report_status(STATUS_LOADING);
    }

    /// Apply the outcome of a fetch.
    pub fn complete_load(
        &mut self,
        result: Result<Vec<Record>, ApiError>,
        sink: &mut dyn DisplaySink,
    ) -> LoadState {
        match result {
            Ok(data) => {
                if let Err(e) = self.cache.put(&data) {
                    warn!(error = %e, "Failed to cache dataset");
                }
                let count = data.len();
                self.all_customers = data;
                self.state = LoadState::Loaded(DataSource::Online);
                self.render(sink);
                sink.report_status(&format!("Data loaded ({} customers)", count));
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed, falling back to offline cache");
                self.state = LoadState::RestoringCache;

                match self.restore_from_cache() {
                    Some(entry) => {
                        let age = entry.age_display();
                        info!(count = entry.customers.len(), age = %age, "Restored dataset from cache");
                        self.all_customers = entry.customers;
                        self.state = LoadState::Loaded(DataSource::Offline);
                        self.render(sink);
                        sink.report_status(&format!(
                            "Offline mode - using last saved data (saved {})",
                            age
                        ));
                    }
                    None => {
                        info!("No offline data available");
                        self.state = LoadState::Empty;
                        sink.report_status(STATUS_NO_DATA);
                    }
                }
            }
        }
        self.state
    }

    /// The cached snapshot if it holds any records. Cache errors count as
    /// "no offline data".
    fn restore_from_cache(&self) -> Option<CacheEntry> {
        match self.cache.get() {
            Ok(Some(entry)) if !entry.customers.is_empty() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Offline cache unavailable");
                None
            }
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Set the search term and redraw. Always starts from the full scoped
    /// dataset, never from what is currently shown.
    pub fn search(&mut self, term: &str, sink: &mut dyn DisplaySink) {
        self.search_term = term.to_string();
        self.render(sink);
    }

    fn render(&self, sink: &mut dyn DisplaySink) {
        let table = self.table();
        sink.render_rows(&table.headers, &table.rows);
    }
}

// ============================================================================
// Tests
// ============================================================================
