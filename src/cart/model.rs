use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::money::effective_price;

const DEFAULT_VARIANT: &str = "default";

/// Composite identity of a cart line: product, color and size, with
/// `default` standing in for a missing color or size.
pub fn line_id(product_id: i64, color: Option<&str>, size: Option<&str>) -> String {
    let color = color.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_VARIANT);
    let size = size.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_VARIANT);
    format!("{product_id}-{color}-{size}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLineItem {
    pub id: String,
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub image: String,
    pub color: Option<String>,
    pub color_hex: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub in_stock: bool,
}

impl CartLineItem {
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.price, self.discounted_price)
    }

    /// Saturates at `Decimal::MAX` rather than overflowing.
    pub fn line_total(&self) -> Decimal {
        self.effective_price()
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// A line as requested by the shopper, before it has an identity.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCartItem {
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discounted_price: Option<Decimal>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    pub in_stock: bool,
}

impl NewCartItem {
    pub fn line_id(&self) -> String {
        line_id(self.product_id, self.color.as_deref(), self.size.as_deref())
    }

    /// Requested quantity, where a missing or zero quantity means one.
    pub fn requested_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    pub(crate) fn into_line(self) -> CartLineItem {
        let id = self.line_id();
        let quantity = self.requested_quantity();
        CartLineItem {
            id,
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            discounted_price: self.discounted_price,
            image: self.image,
            color: self.color,
            color_hex: self.color_hex,
            size: self.size,
            quantity,
            in_stock: self.in_stock,
        }
    }
}

/// Persisted cart shape. Totals are derived and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    #[serde(default, rename = "isOpen")]
    pub is_open: bool,
}
