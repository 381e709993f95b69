use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::{OrderError, OrderGateway, OrderPayload, OrderRecord, PENDING};

#[derive(Debug, Default)]
pub struct MemoryOrders {
    orders: DashMap<Uuid, OrderRecord>,
}

impl MemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderGateway for MemoryOrders {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderRecord, OrderError> {
        let record = OrderRecord {
            id: Uuid::new_v4(),
            status: PENDING.to_string(),
            order: payload.clone(),
            created_at: Utc::now(),
        };
        self.orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn order(&self, id: Uuid) -> Result<Option<OrderRecord>, OrderError> {
        Ok(self.orders.get(&id).map(|entry| entry.value().clone()))
    }
}
