use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{CategoryRecord, ProductRecord};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    #[serde(flatten)]
    pub category: CategoryRecord,
    /// Public URL of `image_url`.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub display_price: rust_decimal::Decimal,
    pub on_sale: bool,
    pub image: Option<String>,
    /// Primary image first, then the extra images.
    pub images: Vec<String>,
}
