use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post, put},
};

use crate::{
    cart::NewCartItem,
    checkout::ShippingAddress,
    dto::{
        cart::{CartView, UpdateQuantityRequest},
        checkout::{CheckoutView, PaymentMethodRequest, PromoCodeRequest, ShippingCostRequest},
    },
    error::AppResult,
    orders::OrderRecord,
    response::ApiResponse,
    services::{cart_service, checkout_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/cart", get(view_cart).delete(clear_cart))
        .route("/{id}/cart/items", post(add_to_cart))
        .route(
            "/{id}/cart/items/{line_id}",
            patch(update_quantity).delete(remove_item),
        )
        .route("/{id}/cart/toggle", post(toggle_cart))
        .route("/{id}/cart/validate", post(validate_cart))
        .route("/{id}/checkout", get(view_checkout))
        .route("/{id}/checkout/address", put(set_shipping_address))
        .route("/{id}/checkout/payment", put(set_payment_method))
        .route("/{id}/checkout/shipping", put(set_shipping_cost))
        .route(
            "/{id}/checkout/promo",
            post(apply_promo_code).delete(remove_promo_code),
        )
        .route("/{id}/checkout/complete", post(complete_order))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/cart",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Cart with derived totals", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid session id"),
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cart/items",
    params(("id" = String, Path, description = "Session ID")),
    request_body = NewCartItem,
    responses(
        (status = 200, description = "Item added or merged", body = ApiResponse<CartView>),
        (status = 400, description = "Product is out of stock"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewCartItem>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_to_cart(&state, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/cart/items/{line_id}",
    params(
        ("id" = String, Path, description = "Session ID"),
        ("line_id" = String, Path, description = "Cart line ID"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_quantity(&state, &id, &line_id, payload.quantity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/cart/items/{line_id}",
    params(
        ("id" = String, Path, description = "Session ID"),
        ("line_id" = String, Path, description = "Cart line ID"),
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&state, &id, &line_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/cart",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear_cart(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cart/toggle",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Cart drawer toggled", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn toggle_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::toggle_cart(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cart/validate",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Lines refreshed from the catalog", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn validate_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::validate_cart(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/checkout",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Checkout state and order summary", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn view_checkout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::view_checkout(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/checkout/address",
    params(("id" = String, Path, description = "Session ID")),
    request_body = ShippingAddress,
    responses(
        (status = 200, description = "Address saved", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn set_shipping_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ShippingAddress>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::set_shipping_address(&state, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/checkout/payment",
    params(("id" = String, Path, description = "Session ID")),
    request_body = PaymentMethodRequest,
    responses(
        (status = 200, description = "Payment method saved", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn set_payment_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentMethodRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::set_payment_method(&state, &id, payload.payment_method).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/checkout/shipping",
    params(("id" = String, Path, description = "Session ID")),
    request_body = ShippingCostRequest,
    responses(
        (status = 200, description = "Shipping cost saved", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Negative shipping cost"),
    ),
    tag = "Checkout"
)]
pub async fn set_shipping_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ShippingCostRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::set_shipping_cost(&state, &id, payload.shipping_cost).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/checkout/promo",
    params(("id" = String, Path, description = "Session ID")),
    request_body = PromoCodeRequest,
    responses(
        (status = 200, description = "Promo code applied", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Invalid promo code"),
    ),
    tag = "Checkout"
)]
pub async fn apply_promo_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PromoCodeRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::apply_promo_code(&state, &id, &payload.code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/checkout/promo",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Promo code removed", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn remove_promo_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let resp = checkout_service::remove_promo_code(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/checkout/complete",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Order placed; cart and checkout reset", body = ApiResponse<OrderRecord>),
        (status = 400, description = "First unmet precondition"),
        (status = 502, description = "Order could not be created"),
    ),
    tag = "Checkout"
)]
pub async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    let resp = checkout_service::complete_order(&state, &id).await?;
    Ok(Json(resp))
}
