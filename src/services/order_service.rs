use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    orders::{OrderPayload, OrderRecord},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: OrderPayload,
) -> AppResult<ApiResponse<OrderRecord>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".into()));
    }
    if payload.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::BadRequest("Order has invalid quantity".into()));
    }

    let order = state.orders.create_order(&payload).await?;
    tracing::info!(order_id = %order.id, total = %order.order.total, "order stored");

    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderRecord>> {
    let order = state.orders.order(id).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("OK", order, None))
}
