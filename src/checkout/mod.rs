mod facade;
mod model;
mod store;

pub use facade::{CartSession, FormattedPrices, OrderSummary};
pub use model::{CheckoutState, PaymentMethod, ShippingAddress, promo_discount};
pub use store::CheckoutStore;

use thiserror::Error;

use crate::orders::OrderError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Shipping address is required")]
    ShippingAddressRequired,

    #[error("Payment method is required")]
    PaymentMethodRequired,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid promo code")]
    InvalidPromoCode,

    #[error("Failed to create order")]
    OrderCreation(#[source] OrderError),
}
