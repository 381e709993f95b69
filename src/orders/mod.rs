//! Order creation collaborator used by checkout.

mod memory;
mod sql;

pub use memory::MemoryOrders;
pub use sql::SqlOrders;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cart::CartLineItem,
    checkout::{PaymentMethod, ShippingAddress},
};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order store error")]
    Db(#[from] sqlx::Error),

    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Everything checkout submits for a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderPayload {
    pub items: Vec<CartLineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub promo_code: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecord {
    pub id: Uuid,
    pub status: String,
    #[serde(flatten)]
    pub order: OrderPayload,
    pub created_at: DateTime<Utc>,
}

pub const PENDING: &str = "pending";

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderRecord, OrderError>;

    async fn order(&self, id: Uuid) -> Result<Option<OrderRecord>, OrderError>;
}
