use serde::Serialize;
use utoipa::ToSchema;

use crate::{catalog::ReviewRecord, models::Category, search::ProductSummary};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub reviews: Vec<ReviewRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedReview {
    pub review: ReviewRecord,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductSummary>)]
    pub items: Vec<ProductSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
