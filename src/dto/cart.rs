use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    cart::CartLineItem,
    checkout::{CartSession, FormattedPrices},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Absolute quantity; zero or less removes the line.
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub is_open: bool,
    pub total_items: u32,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub final_total: Decimal,
    pub formatted: FormattedPrices,
}

impl From<&CartSession> for CartView {
    fn from(session: &CartSession) -> Self {
        Self {
            items: session.cart.items().to_vec(),
            is_open: session.cart.is_open(),
            total_items: session.total_items(),
            subtotal: session.subtotal(),
            total: session.total(),
            final_total: session.final_total(),
            formatted: session.formatted_prices(),
        }
    }
}
