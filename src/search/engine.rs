use std::{cmp::Reverse, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    catalog::{CatalogError, CatalogStore},
    display::Priced,
    money::parse_bound,
    storage::PublicUrls,
};

use super::{ProductSummary, SearchFilterState, SortBy, project};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Nothing to search for; no request was made.
    Inactive,
    Results(Vec<ProductSummary>),
}

impl SearchOutcome {
    pub fn results(&self) -> &[ProductSummary] {
        match self {
            SearchOutcome::Inactive => &[],
            SearchOutcome::Results(results) => results,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SearchOutcome::Results(_))
    }
}

#[async_trait]
pub trait SearchStrategy: Send + Sync {
    async fn search(&self, filters: &SearchFilterState) -> Result<SearchOutcome, CatalogError>;
}

/// Delegates matching, filtering and ordering to the catalog.
pub struct RemoteSearch {
    catalog: Arc<dyn CatalogStore>,
    urls: PublicUrls,
    retries: u32,
    retry_delay: Duration,
}

impl RemoteSearch {
    pub fn new(catalog: Arc<dyn CatalogStore>, urls: PublicUrls, retries: u32) -> Self {
        Self {
            catalog,
            urls,
            retries,
            retry_delay: Duration::from_millis(100),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

#[async_trait]
impl SearchStrategy for RemoteSearch {
    async fn search(&self, filters: &SearchFilterState) -> Result<SearchOutcome, CatalogError> {
        let Some(params) = filters.to_product_search() else {
            return Ok(SearchOutcome::Inactive);
        };

        let mut attempt = 0;
        let records = loop {
            match self.catalog.search_products(&params).await {
                Ok(records) => break records,
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "search failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    tracing::error!(error = %err, attempts = attempt + 1, "search failed");
                    return Err(err);
                }
            }
        };

        let results = records
            .into_iter()
            .map(|record| project(record, &self.urls))
            .collect();
        Ok(SearchOutcome::Results(results))
    }
}

/// Filters and sorts the full product collection in memory.
pub struct LocalSearch {
    catalog: Arc<dyn CatalogStore>,
    urls: PublicUrls,
}

impl LocalSearch {
    pub fn new(catalog: Arc<dyn CatalogStore>, urls: PublicUrls) -> Self {
        Self { catalog, urls }
    }
}

#[async_trait]
impl SearchStrategy for LocalSearch {
    async fn search(&self, filters: &SearchFilterState) -> Result<SearchOutcome, CatalogError> {
        let products: Vec<ProductSummary> = self
            .catalog
            .list_products()
            .await?
            .into_iter()
            .map(|record| project(record, &self.urls))
            .collect();
        Ok(SearchOutcome::Results(filter_and_sort(&products, filters)))
    }
}

fn matches(product: &ProductSummary, filters: &SearchFilterState, needle: &str) -> bool {
    let min_price = parse_bound(&filters.min_price);
    let max_price = parse_bound(&filters.max_price);

    (needle.is_empty() || product.name.to_lowercase().contains(needle))
        && filters.gender.is_none_or(|gender| {
            product
                .gender
                .as_deref()
                .is_some_and(|g| g.eq_ignore_ascii_case(gender.as_str()))
        })
        && (!filters.on_sale || product.on_sale)
        && (!filters.free_shipping || product.free_shipping)
        && min_price.is_none_or(|min| product.price >= min)
        && max_price.is_none_or(|max| product.price <= max)
}

/// Conjunctive filtering followed by a stable sort.
pub fn filter_and_sort(
    products: &[ProductSummary],
    filters: &SearchFilterState,
) -> Vec<ProductSummary> {
    let needle = filters.query.trim().to_lowercase();
    let mut found: Vec<ProductSummary> = products
        .iter()
        .filter(|p| matches(p, filters, &needle))
        .cloned()
        .collect();

    match filters.sort_by {
        SortBy::Newest => found.sort_by_key(|p| Reverse((p.created_at, p.id))),
        SortBy::PriceLowHigh => found.sort_by_key(|p| p.display_price()),
        SortBy::PriceHighLow => found.sort_by_key(|p| Reverse(p.display_price())),
        SortBy::Recommended => {}
    }
    found
}
