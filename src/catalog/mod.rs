//! Remote catalog collaborator: categories, products and reviews.

mod memory;
mod orm;

pub use memory::MemoryCatalog;
pub use orm::OrmCatalog;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::display::Priced;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog query failed")]
    Query(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Validation(String),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Storage path inside the category bucket.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductSize {
    pub value: String,
    pub label: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    /// Storage path of the primary image inside the product bucket.
    pub image_url: Option<String>,
    /// Extra image paths. Skipped when empty so detail views can replace it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
    pub category_slug: Option<String>,
    pub gender: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: i32,
    pub in_stock: bool,
    pub free_shipping: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Priced for ProductRecord {
    fn base_price(&self) -> Decimal {
        self.price
    }

    fn discounted_price(&self) -> Option<Decimal> {
        self.discounted_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewRecord {
    pub id: i64,
    pub product_id: i64,
    pub reviewer_name: String,
    pub reviewer_image_url: Option<String>,
    pub review_text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewReview {
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub reviewer_image_url: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
}

/// A review whose required fields are known to be present.
#[derive(Debug, Clone)]
pub struct ValidReview {
    pub reviewer_name: String,
    pub reviewer_image_url: Option<String>,
    pub review_text: String,
    pub rating: i32,
}

impl NewReview {
    pub fn validate(self) -> Result<ValidReview, CatalogError> {
        let reviewer_name = self.reviewer_name.filter(|n| !n.trim().is_empty());
        let review_text = self.review_text.filter(|t| !t.trim().is_empty());
        let rating = self.rating.filter(|r| *r != 0);
        let (Some(reviewer_name), Some(review_text), Some(rating)) =
            (reviewer_name, review_text, rating)
        else {
            return Err(CatalogError::Validation("Missing required fields".into()));
        };
        if !(1..=5).contains(&rating) {
            return Err(CatalogError::Validation(
                "rating must be between 1 and 5".into(),
            ));
        }
        Ok(ValidReview {
            reviewer_name,
            reviewer_image_url: self.reviewer_image_url.filter(|u| !u.trim().is_empty()),
            review_text,
            rating,
        })
    }
}

/// Backend sort tokens understood by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortToken {
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortToken::PriceAsc => "price_asc",
            SortToken::PriceDesc => "price_desc",
            SortToken::Newest => "newest",
        }
    }
}

/// Parameters of a single remote product search. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductSearch {
    pub text: Option<String>,
    pub on_sale: bool,
    pub free_shipping: bool,
    /// Already lower-cased.
    pub gender: Option<String>,
    pub sort: Option<SortToken>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError>;

    async fn category_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, CatalogError>;

    async fn products_by_category(&self, slug: &str) -> Result<Vec<ProductRecord>, CatalogError>;

    /// The whole product collection in natural order.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError>;

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, CatalogError>;

    /// Case-insensitive substring match on name and description, threshold
    /// filters on the base price and ordering by `sort`.
    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductRecord>, CatalogError>;

    async fn product(&self, id: i64) -> Result<Option<ProductRecord>, CatalogError>;

    /// Newest first.
    async fn list_reviews(&self, product_id: i64) -> Result<Vec<ReviewRecord>, CatalogError>;

    async fn create_review(
        &self,
        product_id: i64,
        review: ValidReview,
    ) -> Result<ReviewRecord, CatalogError>;
}
