use rust_decimal::Decimal;
use serde_json::json;
use storefront_api::{config::AppConfig, db::create_pool};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    discounted_cents: Option<i64>,
    image: &'static str,
    category: &'static str,
    gender: &'static str,
    free_shipping: bool,
    in_stock: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_categories(&pool).await?;
    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Shoes", "shoes", "shoes.png"),
        ("Jackets", "jackets", "jackets.png"),
        ("Accessories", "accessories", "accessories.png"),
    ];

    for (name, slug, image) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (name, slug, image_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(image)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = [
        SeedProduct {
            name: "Trail Runner",
            description: "Lightweight running shoe with a grippy sole",
            price_cents: 12000,
            discounted_cents: Some(9900),
            image: "shoes/trail-runner.png",
            category: "shoes",
            gender: "men",
            free_shipping: true,
            in_stock: true,
        },
        SeedProduct {
            name: "Canvas Sneaker",
            description: "Everyday sneaker in washed canvas",
            price_cents: 6500,
            discounted_cents: None,
            image: "shoes/canvas-sneaker.png",
            category: "shoes",
            gender: "women",
            free_shipping: false,
            in_stock: true,
        },
        SeedProduct {
            name: "Rain Shell",
            description: "Packable waterproof jacket",
            price_cents: 15000,
            discounted_cents: None,
            image: "jackets/rain-shell.png",
            category: "jackets",
            gender: "women",
            free_shipping: true,
            in_stock: true,
        },
        SeedProduct {
            name: "Puffer Jacket",
            description: "Warm insulated jacket for kids",
            price_cents: 8900,
            discounted_cents: Some(6900),
            image: "jackets/puffer.png",
            category: "jackets",
            gender: "kids",
            free_shipping: false,
            in_stock: false,
        },
        SeedProduct {
            name: "Wool Beanie",
            description: "Ribbed merino beanie",
            price_cents: 2500,
            discounted_cents: None,
            image: "accessories/beanie.png",
            category: "accessories",
            gender: "men",
            free_shipping: false,
            in_stock: true,
        },
    ];

    for product in products {
        sqlx::query(
            r#"
            INSERT INTO products
                (name, description, price, discounted_price, image_url, images, colors, sizes,
                 category_slug, gender, in_stock, free_shipping)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            "#,
        )
        .bind(product.name)
        .bind(product.description)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(product.discounted_cents.map(|cents| Decimal::new(cents, 2)))
        .bind(product.image)
        .bind(json!([]))
        .bind(json!([
            { "name": "Black", "hex": "#000000", "available": true },
            { "name": "Navy", "hex": "#1F2A44", "available": product.in_stock },
        ]))
        .bind(json!([
            { "value": "S", "label": "Small", "available": true },
            { "value": "M", "label": "Medium", "available": true },
            { "value": "L", "label": "Large", "available": product.in_stock },
        ]))
        .bind(product.category)
        .bind(product.gender)
        .bind(product.in_stock)
        .bind(product.free_shipping)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
