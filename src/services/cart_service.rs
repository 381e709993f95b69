use std::collections::HashMap;

use crate::{
    cart::{CartLineItem, NewCartItem},
    catalog::CatalogStore,
    display::sanitize_image_url,
    dto::cart::CartView,
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
    storage::PublicUrls,
};

pub async fn view_cart(state: &AppState, session_id: &str) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let session = session.lock().await;
    Ok(ApiResponse::success("OK", CartView::from(&*session), None))
}

pub async fn add_to_cart(
    state: &AppState,
    session_id: &str,
    payload: NewCartItem,
) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.add_to_cart(payload)?;
    Ok(ApiResponse::success(
        "Added to cart",
        CartView::from(&*session),
        Some(Meta::empty()),
    ))
}

pub async fn update_quantity(
    state: &AppState,
    session_id: &str,
    line_id: &str,
    quantity: i64,
) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.cart.update_quantity(line_id, quantity)?;
    Ok(ApiResponse::success("Updated", CartView::from(&*session), None))
}

pub async fn remove_item(
    state: &AppState,
    session_id: &str,
    line_id: &str,
) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.cart.remove_item(line_id);
    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::from(&*session),
        None,
    ))
}

pub async fn clear_cart(state: &AppState, session_id: &str) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.cart.clear();
    Ok(ApiResponse::success("Cart cleared", CartView::from(&*session), None))
}

pub async fn toggle_cart(state: &AppState, session_id: &str) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    session.cart.toggle();
    Ok(ApiResponse::success("OK", CartView::from(&*session), None))
}

pub async fn validate_cart(
    state: &AppState,
    session_id: &str,
) -> AppResult<ApiResponse<CartView>> {
    let session = state.sessions.session(session_id)?;
    let mut session = session.lock().await;
    let refreshed =
        validate_cart_items(state.catalog.as_ref(), &state.urls, session.cart.items()).await;
    session.cart.replace_items(refreshed);
    Ok(ApiResponse::success("Validated", CartView::from(&*session), None))
}

/// Refresh each line from the current catalog, dropping lines whose product is
/// gone or out of stock. When the catalog cannot be reached the lines are
/// returned unchanged.
pub async fn validate_cart_items(
    catalog: &dyn CatalogStore,
    urls: &PublicUrls,
    items: &[CartLineItem],
) -> Vec<CartLineItem> {
    if items.is_empty() {
        return Vec::new();
    }
    let ids: Vec<i64> = items.iter().map(|item| item.product_id).collect();
    let products = match catalog.products_by_ids(&ids).await {
        Ok(products) => products,
        Err(err) => {
            tracing::warn!(error = %err, "cart validation skipped");
            return items.to_vec();
        }
    };
    let products: HashMap<i64, _> = products.into_iter().map(|p| (p.id, p)).collect();

    items
        .iter()
        .filter_map(|item| {
            let product = products.get(&item.product_id).filter(|p| p.in_stock)?;
            Some(CartLineItem {
                name: product.name.clone(),
                price: product.price,
                discounted_price: product.discounted_price,
                image: sanitize_image_url(urls.product_image(product.image_url.as_deref()).as_deref()),
                in_stock: product.in_stock,
                ..item.clone()
            })
        })
        .collect()
}
