use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::catalog::CatalogError;

use super::{SearchFilterState, SearchOutcome, SearchStrategy, UrlSync};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// The response matched the current state and replaced the results.
    Applied(SearchOutcome),
    /// A newer request or a state change superseded this response.
    Stale,
}

/// Search screen state: current filters, latest results and the guard that
/// keeps a slow response from overwriting a newer one.
pub struct SearchSession {
    strategy: Arc<dyn SearchStrategy>,
    url_sync: Option<UrlSync>,
    filters: Mutex<SearchFilterState>,
    outcome: Mutex<SearchOutcome>,
    latest_request: AtomicU64,
}

impl SearchSession {
    pub fn new(strategy: Arc<dyn SearchStrategy>, initial: SearchFilterState) -> Self {
        Self {
            strategy,
            url_sync: None,
            filters: Mutex::new(initial),
            outcome: Mutex::new(SearchOutcome::Inactive),
            latest_request: AtomicU64::new(0),
        }
    }

    /// Restore the state a shared URL describes.
    pub fn from_query_string(strategy: Arc<dyn SearchStrategy>, query: &str) -> Self {
        Self::new(strategy, SearchFilterState::from_query_string(query))
    }

    pub fn with_url_sync(mut self, url_sync: UrlSync) -> Self {
        self.url_sync = Some(url_sync);
        self
    }

    pub fn filters(&self) -> SearchFilterState {
        self.filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the filters and schedule the URL rewrite.
    pub fn update(&self, filters: SearchFilterState) {
        if let Some(url_sync) = &self.url_sync {
            url_sync.schedule(filters.clone());
        }
        *self.filters.lock().unwrap_or_else(PoisonError::into_inner) = filters;
    }

    /// Run the strategy for the current filters and apply the response only
    /// if it is still the latest request and the filters have not moved on.
    pub async fn refresh(&self) -> Result<SearchStatus, CatalogError> {
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = self.filters();

        let outcome = self.strategy.search(&requested).await?;

        if self.latest_request.load(Ordering::SeqCst) != request || self.filters() != requested {
            tracing::debug!(request, "discarding stale search response");
            return Ok(SearchStatus::Stale);
        }
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = outcome.clone();
        Ok(SearchStatus::Applied(outcome))
    }
}
