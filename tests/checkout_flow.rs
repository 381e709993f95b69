mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use storefront_api::{persistence::SnapshotStore, search::SearchMode};

use common::{app, num};

fn trail_runner(quantity: u32) -> serde_json::Value {
    json!({
        "product_id": 1,
        "name": "Trail Runner",
        "price": 120,
        "discounted_price": 99,
        "image": "https://cdn.test/trail.png",
        "color": "Black",
        "color_hex": "#000000",
        "size": "M",
        "quantity": quantity,
        "in_stock": true
    })
}

fn address() -> serde_json::Value {
    json!({
        "full_name": "Sam Doe",
        "phone": "555-0100",
        "street": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "country": "US",
        "postal_code": "62701"
    })
}

// Shopper adds items, sets address, payment and promo, then places the order.
#[tokio::test]
async fn cart_to_order_flow() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let base = "/api/sessions/shopper-1";

    let (status, body) = app.post(&format!("{base}/cart/items"), trail_runner(1)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body2) = app.post(&format!("{base}/cart/items"), trail_runner(2)).await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    let cart = &body2["data"];
    assert_eq!(cart["items"][0]["id"], "1-Black-M");
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["total_items"], 3);
    assert_eq!(num(&cart["subtotal"]), 297.0);
    assert_eq!(cart["formatted"]["subtotal"], "$297.00");

    let (status, body) = app
        .call(Method::PUT, &format!("{base}/checkout/address"), Some(address()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shipping_address"]["city"], "Springfield");

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("{base}/checkout/payment"),
            Some(json!({ "payment_method": "card" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("{base}/checkout/shipping"),
            Some(json!({ "shipping_cost": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("{base}/checkout/promo"), json!({ "code": "save10" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"]["summary"];
    assert_eq!(body["data"]["promo_code"], "SAVE10");
    assert_eq!(num(&summary["discount"]), 10.0);
    assert_eq!(num(&summary["tax"]), 0.0);
    assert_eq!(num(&summary["total"]), 292.0);
    assert_eq!(summary["item_count"], 1);

    let (status, body) = app.post(&format!("{base}/checkout/complete"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let order = &body["data"];
    assert_eq!(order["status"], "pending");
    assert_eq!(num(&order["total"]), 292.0);
    assert_eq!(order["payment_method"], "card");
    assert_eq!(app.orders.len(), 1);

    let id = order["id"].as_str().expect("order id");
    let (status, fetched) = app.get(&format!("/api/orders/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["id"], id);

    let (_, cart) = app.get(&format!("{base}/cart")).await;
    assert_eq!(cart["data"]["items"], json!([]));
    let (_, checkout) = app.get(&format!("{base}/checkout")).await;
    assert_eq!(checkout["data"]["shipping_address"], serde_json::Value::Null);
    assert_eq!(checkout["data"]["promo_code"], serde_json::Value::Null);
    assert_eq!(num(&checkout["data"]["discount_amount"]), 0.0);

    Ok(())
}

#[tokio::test]
async fn complete_reports_first_missing_precondition() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let base = "/api/sessions/shopper-2";
    app.post(&format!("{base}/cart/items"), trail_runner(1)).await;

    let (status, body) = app.post(&format!("{base}/checkout/complete"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Shipping address is required");

    app.call(Method::PUT, &format!("{base}/checkout/address"), Some(address()))
        .await;
    let (status, body) = app.post(&format!("{base}/checkout/complete"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment method is required");

    app.call(
        Method::PUT,
        &format!("{base}/checkout/payment"),
        Some(json!({ "payment_method": "paypal" })),
    )
    .await;
    app.call(Method::DELETE, &format!("{base}/cart"), None).await;
    let (status, body) = app.post(&format!("{base}/checkout/complete"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cart is empty");
    assert!(app.orders.is_empty());

    Ok(())
}

#[tokio::test]
async fn cart_line_operations() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let base = "/api/sessions/shopper-3";

    let mut out_of_stock = trail_runner(1);
    out_of_stock["in_stock"] = json!(false);
    let (status, body) = app.post(&format!("{base}/cart/items"), out_of_stock).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product is out of stock");

    app.post(&format!("{base}/cart/items"), trail_runner(1)).await;
    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("{base}/cart/items/1-Black-M"),
            Some(json!({ "quantity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 4);

    let (_, body) = app
        .call(
            Method::PATCH,
            &format!("{base}/cart/items/1-Black-M"),
            Some(json!({ "quantity": 0 })),
        )
        .await;
    assert_eq!(body["data"]["items"], json!([]));

    let (_, body) = app.post(&format!("{base}/cart/toggle"), json!({})).await;
    assert_eq!(body["data"]["is_open"], true);

    let (status, body) = app.post(&format!("{base}/checkout/promo"), json!({ "code": "NOPE" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid promo code");

    Ok(())
}

#[tokio::test]
async fn validate_refreshes_and_drops_stale_lines() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let base = "/api/sessions/shopper-4";

    let mut stale = trail_runner(2);
    stale["name"] = json!("Old name");
    stale["price"] = json!(10);
    app.post(&format!("{base}/cart/items"), stale).await;
    // Puffer is out of stock in the catalog, the cart still believes otherwise.
    app.post(
        &format!("{base}/cart/items"),
        json!({ "product_id": 4, "name": "Puffer", "price": 89, "in_stock": true }),
    )
    .await;
    app.post(
        &format!("{base}/cart/items"),
        json!({ "product_id": 99, "name": "Gone", "price": 5, "in_stock": true }),
    )
    .await;

    let (status, body) = app.post(&format!("{base}/cart/validate"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Trail Runner");
    assert_eq!(num(&items[0]["price"]), 120.0);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["image"], "https://cdn.test/storage/v1/object/public/product_images/shoes/trail.png");

    Ok(())
}

#[tokio::test]
async fn sessions_are_persisted_and_isolated() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    app.post("/api/sessions/alpha/cart/items", trail_runner(1)).await;

    let (_, other) = app.get("/api/sessions/beta/cart").await;
    assert_eq!(other["data"]["items"], json!([]));

    let saved = app
        .snapshots
        .load("alpha.shopping-cart")?
        .expect("cart snapshot");
    assert_eq!(saved["items"][0]["id"], "1-Black-M");

    let (status, _) = app.get("/api/sessions/not%20valid/cart").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn direct_order_endpoint() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let (status, _) = app
        .post(
            "/api/orders",
            json!({
                "items": [],
                "shipping_address": address(),
                "payment_method": "bank_transfer",
                "subtotal": 0,
                "shipping_cost": 0,
                "discount_amount": 0,
                "promo_code": null,
                "total": 0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get("/api/orders/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn oversized_quantities_are_rejected() -> anyhow::Result<()> {
    let app = app(SearchMode::Remote);
    let base = "/api/sessions/shopper-5";

    let (status, _) = app.post(&format!("{base}/cart/items"), trail_runner(1)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("{base}/cart/items"), trail_runner(u32::MAX))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity cannot exceed 999");

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("{base}/cart/items/1-Black-M"),
            Some(json!({ "quantity": 1_000_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = app.get(&format!("{base}/cart")).await;
    assert_eq!(cart["data"]["items"][0]["quantity"], 1);
    Ok(())
}
