use rust_decimal::Decimal;

use crate::{
    checkout::{PaymentMethod, ShippingAddress},
    dto::checkout::CheckoutView,
    error::{AppError, AppResult},
    orders::OrderRecord,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_checkout(
    state: &AppState,
    session_id: &str,
) -> AppResult<ApiResponse<CheckoutView>> {
    let session = state.sessions.session(session_id)?;
    let session = session.lock().await;
    Ok(ApiResponse::success("OK", CheckoutView::from(&*session), None))
}

pub async fn set_shipping_address(
    state: &AppState,
    session_id: &str,
    address: ShippingAddress,
) -> AppResult<ApiResponse<CheckoutView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.checkout.set_shipping_address(address);
    Ok(ApiResponse::success(
        "Shipping address saved",
        CheckoutView::from(&*session),
        None,
    ))
}

pub async fn set_payment_method(
    state: &AppState,
    session_id: &str,
    method: PaymentMethod,
) -> AppResult<ApiResponse<CheckoutView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.checkout.set_payment_method(method);
    Ok(ApiResponse::success(
        "Payment method saved",
        CheckoutView::from(&*session),
        None,
    ))
}

pub async fn set_shipping_cost(
    state: &AppState,
    session_id: &str,
    cost: Decimal,
) -> AppResult<ApiResponse<CheckoutView>> {
    if cost.is_sign_negative() {
        return Err(AppError::BadRequest("Shipping cost cannot be negative".into()));
    }
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.checkout.set_shipping_cost(cost);
    Ok(ApiResponse::success(
        "Shipping cost saved",
        CheckoutView::from(&*session),
        None,
    ))
}

pub async fn apply_promo_code(
    state: &AppState,
    session_id: &str,
    code: &str,
) -> AppResult<ApiResponse<CheckoutView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.checkout.apply_promo_code(code)?;
    Ok(ApiResponse::success(
        "Promo code applied",
        CheckoutView::from(&*session),
        None,
    ))
}

pub async fn remove_promo_code(
    state: &AppState,
    session_id: &str,
) -> AppResult<ApiResponse<CheckoutView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.checkout.remove_promo_code();
    Ok(ApiResponse::success(
        "Promo code removed",
        CheckoutView::from(&*session),
        None,
    ))
}

pub async fn complete_order(
    state: &AppState,
    session_id: &str,
) -> AppResult<ApiResponse<OrderRecord>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    let order = session.complete_order(state.orders.as_ref()).await?;

    Ok(ApiResponse::success(
        "Order placed",
        order,
        Some(Meta::empty()),
    ))
}
