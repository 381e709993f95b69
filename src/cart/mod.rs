mod model;
mod store;

pub use model::{CartLineItem, CartState, NewCartItem, line_id};
pub use store::CartStore;

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest unit price accepted into the cart.
pub fn max_unit_price() -> Decimal {
    Decimal::from(1_000_000_000)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Product is out of stock")]
    OutOfStock,

    #[error("Quantity cannot exceed {max}")]
    QuantityLimit { max: u32 },

    #[error("Price is out of range")]
    InvalidPrice,
}

/// Sum of quantities across all lines.
pub fn total_items(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |total, item| total.saturating_add(item.quantity))
}

/// Sum of effective price times quantity across all lines.
pub fn subtotal(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
}
