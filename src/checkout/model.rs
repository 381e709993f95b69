use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const FREE_SHIPPING_CODE: &str = "FREESHIP";

/// Discount granted by a promo code, looked up case-insensitively.
/// `FREESHIP` grants no discount; it only waives shipping.
pub fn promo_discount(code: &str) -> Option<Decimal> {
    match code.trim().to_uppercase().as_str() {
        "SAVE10" => Some(Decimal::from(10)),
        "SAVE20" => Some(Decimal::from(20)),
        FREE_SHIPPING_CODE => Some(Decimal::ZERO),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    BankTransfer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutState {
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
}
