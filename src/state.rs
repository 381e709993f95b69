use std::{sync::Arc, time::Duration};

use crate::{
    catalog::CatalogStore,
    config::AppConfig,
    orders::OrderGateway,
    persistence::SnapshotStore,
    search::{
        LocalSearch, NavigationSink, RemoteSearch, SearchMode, SearchSession, SearchStrategy,
        UrlSync,
    },
    session::{SessionLimits, SessionRegistry},
    storage::PublicUrls,
};

/// Tunables that shape the state but not its adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateOptions {
    pub search_mode: SearchMode,
    pub search_retries: u32,
    pub url_sync_debounce: Duration,
    pub session_limits: SessionLimits,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::Remote,
            search_retries: 2,
            url_sync_debounce: Duration::from_millis(300),
            session_limits: SessionLimits::default(),
        }
    }
}

impl StateOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            search_mode: config.search_mode,
            search_retries: config.search_retries,
            url_sync_debounce: config.url_sync_debounce,
            session_limits: config.session_limits,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderGateway>,
    pub sessions: SessionRegistry,
    pub search: Arc<dyn SearchStrategy>,
    pub urls: PublicUrls,
    pub url_sync_debounce: Duration,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderGateway>,
        snapshots: Arc<dyn SnapshotStore>,
        urls: PublicUrls,
        options: StateOptions,
    ) -> Self {
        let search: Arc<dyn SearchStrategy> = match options.search_mode {
            SearchMode::Remote => Arc::new(RemoteSearch::new(
                catalog.clone(),
                urls.clone(),
                options.search_retries,
            )),
            SearchMode::Local => Arc::new(LocalSearch::new(catalog.clone(), urls.clone())),
        };
        Self {
            catalog,
            orders,
            sessions: SessionRegistry::new(snapshots).with_limits(options.session_limits),
            search,
            urls,
            url_sync_debounce: options.url_sync_debounce,
        }
    }

    /// Search screen restored from a shared URL, rewriting that URL through
    /// `sink` once edits settle for the configured debounce.
    pub fn search_session(&self, query: &str, sink: Arc<dyn NavigationSink>) -> SearchSession {
        SearchSession::from_query_string(self.search.clone(), query)
            .with_url_sync(UrlSync::spawn(self.url_sync_debounce, sink))
    }
}
