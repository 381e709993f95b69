#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use storefront_api::{
    catalog::{CategoryRecord, MemoryCatalog, ProductColor, ProductRecord, ReviewRecord},
    config::BucketConfig,
    orders::MemoryOrders,
    persistence::MemorySnapshots,
    routes::create_router,
    search::SearchMode,
    state::{AppState, StateOptions},
    storage::PublicUrls,
};

pub const STORAGE: &str = "https://cdn.test";

pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub orders: Arc<MemoryOrders>,
    pub snapshots: Arc<MemorySnapshots>,
}

pub fn app(mode: SearchMode) -> TestApp {
    let catalog = Arc::new(catalog());
    let orders = Arc::new(MemoryOrders::new());
    let snapshots = Arc::new(MemorySnapshots::default());
    let state = AppState::new(
        catalog.clone(),
        orders.clone(),
        snapshots.clone(),
        PublicUrls::new(STORAGE, BucketConfig::default()),
        StateOptions {
            search_mode: mode,
            search_retries: 0,
            ..StateOptions::default()
        },
    );
    TestApp {
        router: create_router(state),
        catalog,
        orders,
        snapshots,
    }
}

impl TestApp {
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }
}

pub fn num(value: &Value) -> f64 {
    value.as_f64().expect("numeric field")
}

fn price(units: i64) -> Decimal {
    Decimal::from(units)
}

fn product(id: i64, name: &str, units: i64) -> ProductRecord {
    ProductRecord {
        id,
        name: name.into(),
        description: None,
        price: price(units),
        discounted_price: None,
        image_url: None,
        images: vec![],
        colors: vec![],
        sizes: vec![],
        category_slug: None,
        gender: None,
        rating: None,
        reviews_count: 0,
        in_stock: true,
        free_shipping: false,
        created_at: None,
    }
}

pub fn catalog() -> MemoryCatalog {
    let categories = vec![
        CategoryRecord {
            id: 1,
            name: "Shoes".into(),
            slug: "shoes".into(),
            image_url: Some("shoes.png".into()),
        },
        CategoryRecord {
            id: 2,
            name: "Jackets".into(),
            slug: "jackets".into(),
            image_url: None,
        },
    ];

    let products = vec![
        ProductRecord {
            description: Some("Grippy running shoe".into()),
            discounted_price: Some(price(99)),
            image_url: Some("shoes/trail.png".into()),
            images: vec!["shoes/trail-side.png".into(), String::new()],
            colors: vec![ProductColor {
                name: "Black".into(),
                hex: "#000000".into(),
                available: true,
            }],
            category_slug: Some("shoes".into()),
            gender: Some("men".into()),
            free_shipping: true,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..product(1, "Trail Runner", 120)
        },
        ProductRecord {
            description: Some("Washed canvas".into()),
            category_slug: Some("shoes".into()),
            gender: Some("Women".into()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            ..product(2, "Canvas Sneaker", 65)
        },
        ProductRecord {
            description: Some("Waterproof running jacket".into()),
            category_slug: Some("jackets".into()),
            gender: Some("women".into()),
            free_shipping: true,
            created_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..product(3, "Rain Shell", 150)
        },
        ProductRecord {
            discounted_price: Some(price(69)),
            category_slug: Some("jackets".into()),
            gender: Some("kids".into()),
            in_stock: false,
            created_at: Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
            ..product(4, "Puffer", 89)
        },
    ];

    let reviews = vec![
        ReviewRecord {
            id: 1,
            product_id: 1,
            reviewer_name: "Ana".into(),
            reviewer_image_url: Some("ana.png".into()),
            review_text: "Great grip".into(),
            rating: 5,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        },
        ReviewRecord {
            id: 2,
            product_id: 1,
            reviewer_name: "Ben".into(),
            reviewer_image_url: None,
            review_text: "Runs small".into(),
            rating: 3,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        },
    ];

    MemoryCatalog::new(categories, products).with_reviews(reviews)
}
