use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::ProductRecord,
    display::{Priced, sanitize_image_url},
    money::is_on_sale,
    storage::PublicUrls,
};

/// Display record shown on product cards and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub display_price: Decimal,
    pub image: String,
    /// Stored as received; compared case-insensitively.
    pub gender: Option<String>,
    pub on_sale: bool,
    pub free_shipping: bool,
    pub in_stock: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Priced for ProductSummary {
    fn base_price(&self) -> Decimal {
        self.price
    }

    fn discounted_price(&self) -> Option<Decimal> {
        self.discounted_price
    }
}

pub fn project(record: ProductRecord, urls: &PublicUrls) -> ProductSummary {
    let image = sanitize_image_url(urls.product_image(record.image_url.as_deref()).as_deref());
    ProductSummary {
        display_price: record.display_price(),
        on_sale: is_on_sale(record.discounted_price),
        id: record.id,
        name: record.name,
        description: record.description,
        price: record.price,
        discounted_price: record.discounted_price,
        image,
        gender: record.gender,
        free_shipping: record.free_shipping,
        in_stock: record.in_stock,
        created_at: record.created_at,
    }
}
