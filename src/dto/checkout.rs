use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::checkout::{CartSession, CheckoutState, OrderSummary, PaymentMethod};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentMethodRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutView {
    #[serde(flatten)]
    pub state: CheckoutState,
    pub summary: OrderSummary,
}

impl From<&CartSession> for CheckoutView {
    fn from(session: &CartSession) -> Self {
        Self {
            state: session.checkout.state().clone(),
            summary: session.order_summary(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShippingCostRequest {
    pub shipping_cost: rust_decimal::Decimal,
}
