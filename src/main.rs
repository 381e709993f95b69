use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{
    catalog::OrmCatalog,
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    orders::SqlOrders,
    persistence::FileSnapshots,
    routes::create_router,
    state::{AppState, StateOptions},
    storage::PublicUrls,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(&config.database_url).await?;

    let snapshots = FileSnapshots::open(&config.snapshot_dir)?;
    let urls = PublicUrls::new(config.storage_public_url.clone(), config.buckets.clone());
    let state = AppState::new(
        Arc::new(OrmCatalog::new(orm)),
        Arc::new(SqlOrders::new(pool)),
        Arc::new(snapshots),
        urls,
        StateOptions::from_config(&config),
    );
    tracing::info!(
        search_mode = ?config.search_mode,
        search_retries = config.search_retries,
        url_sync_debounce_ms = config.url_sync_debounce.as_millis() as u64,
        snapshot_dir = %config.snapshot_dir,
        session_capacity = config.session_limits.capacity,
        session_idle_secs = config.session_limits.idle.as_secs(),
        "storefront state ready"
    );

    let app = create_router(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
