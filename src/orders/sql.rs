use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::db::DbPool;

use super::{OrderError, OrderGateway, OrderPayload, OrderRecord, PENDING};

/// Orders table with the submitted payload kept as `jsonb`.
#[derive(Clone)]
pub struct SqlOrders {
    pool: DbPool,
}

impl SqlOrders {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    status: String,
    payload: Json<OrderPayload>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            status: row.status,
            order: row.payload.0,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl OrderGateway for SqlOrders {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderRecord, OrderError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (id, status, total, payload)
            VALUES ($1, $2, $3, $4)
            RETURNING id, status, payload, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(PENDING)
        .bind(payload.total)
        .bind(Json(payload))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn order(&self, id: Uuid) -> Result<Option<OrderRecord>, OrderError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, status, payload, created_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrderRecord::from))
    }
}
