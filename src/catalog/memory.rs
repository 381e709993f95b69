use std::{
    cmp::Reverse,
    sync::{
        RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{
    CatalogError, CatalogStore, CategoryRecord, ProductRecord, ProductSearch, ReviewRecord,
    SortToken, ValidReview,
};

/// In-process catalog with the same query semantics as the database one.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    categories: Vec<CategoryRecord>,
    products: Vec<ProductRecord>,
    reviews: RwLock<Vec<ReviewRecord>>,
    failing_searches: AtomicU32,
}

impl MemoryCatalog {
    pub fn new(categories: Vec<CategoryRecord>, products: Vec<ProductRecord>) -> Self {
        Self {
            categories,
            products,
            ..Self::default()
        }
    }

    pub fn with_reviews(self, reviews: Vec<ReviewRecord>) -> Self {
        Self {
            reviews: RwLock::new(reviews),
            ..self
        }
    }

    /// Make the next `count` searches fail, to exercise retries.
    pub fn fail_next_searches(&self, count: u32) {
        self.failing_searches.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.failing_searches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

fn matches(product: &ProductRecord, search: &ProductSearch) -> bool {
    if let Some(text) = search.text.as_deref() {
        let needle = text.to_lowercase();
        if !contains_ci(Some(&product.name), &needle)
            && !contains_ci(product.description.as_deref(), &needle)
        {
            return false;
        }
    }
    if search.on_sale && !product.discounted_price.is_some_and(|d| d > Decimal::ZERO) {
        return false;
    }
    if search.free_shipping && !product.free_shipping {
        return false;
    }
    if let Some(gender) = search.gender.as_deref() {
        if !product
            .gender
            .as_deref()
            .is_some_and(|g| g.eq_ignore_ascii_case(gender))
        {
            return false;
        }
    }
    if search.min_price.is_some_and(|min| product.price < min) {
        return false;
    }
    if search.max_price.is_some_and(|max| product.price > max) {
        return false;
    }
    true
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        Ok(self.categories.clone())
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, CatalogError> {
        Ok(self.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.category_slug.as_deref() == Some(slug))
            .cloned()
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self.products.clone())
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        if self.take_failure() {
            return Err(CatalogError::Unavailable("simulated outage".into()));
        }
        let mut found: Vec<ProductRecord> = self
            .products
            .iter()
            .filter(|p| matches(p, search))
            .cloned()
            .collect();
        match search.sort {
            Some(SortToken::PriceAsc) => found.sort_by_key(|p| p.price),
            Some(SortToken::PriceDesc) => found.sort_by_key(|p| Reverse(p.price)),
            Some(SortToken::Newest) => found.sort_by_key(|p| Reverse(p.created_at)),
            None => {}
        }
        Ok(found)
    }

    async fn product(&self, id: i64) -> Result<Option<ProductRecord>, CatalogError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_reviews(&self, product_id: i64) -> Result<Vec<ReviewRecord>, CatalogError> {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| CatalogError::Unavailable("review store poisoned".into()))?;
        let mut found: Vec<ReviewRecord> = reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| Reverse((r.created_at, r.id)));
        Ok(found)
    }

    async fn create_review(
        &self,
        product_id: i64,
        review: ValidReview,
    ) -> Result<ReviewRecord, CatalogError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| CatalogError::Unavailable("review store poisoned".into()))?;
        let id = reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = ReviewRecord {
            id,
            product_id,
            reviewer_name: review.reviewer_name,
            reviewer_image_url: review.reviewer_image_url,
            review_text: review.review_text,
            rating: review.rating,
            created_at: Utc::now(),
        };
        reviews.push(record.clone());
        Ok(record)
    }
}
