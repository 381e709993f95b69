use std::{env, time::Duration};

use crate::{search::SearchMode, session::SessionLimits};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub storage_public_url: String,
    pub buckets: BucketConfig,
    pub search_mode: SearchMode,
    pub search_retries: u32,
    pub url_sync_debounce: Duration,
    pub snapshot_dir: String,
    pub session_limits: SessionLimits,
}

/// Object storage bucket names for each kind of image.
#[derive(Debug, Clone)]
pub struct BucketConfig {
    pub category: String,
    pub product: String,
    pub reviewer: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            category: "categories_images".to_string(),
            product: "product_images".to_string(),
            reviewer: "reviewer_images".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let storage_public_url = env::var("STORAGE_PUBLIC_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = BucketConfig::default();
        let buckets = BucketConfig {
            category: env::var("CATEGORY_BUCKET").unwrap_or(defaults.category),
            product: env::var("PRODUCT_BUCKET").unwrap_or(defaults.product),
            reviewer: env::var("REVIEWER_BUCKET").unwrap_or(defaults.reviewer),
        };

        let search_mode = match env::var("SEARCH_MODE") {
            Ok(raw) => raw
                .parse::<SearchMode>()
                .map_err(|_| anyhow::anyhow!("SEARCH_MODE must be `remote` or `local`, got `{raw}`"))?,
            Err(_) => SearchMode::Remote,
        };
        let search_retries = env::var("SEARCH_RETRIES")
            .ok()
            .and_then(|r| r.parse::<u32>().ok())
            .unwrap_or(2);
        let url_sync_debounce = env::var("URL_SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(300));
        let snapshot_dir =
            env::var("SNAPSHOT_DIR").unwrap_or_else(|_| "data/snapshots".to_string());

        let session_defaults = SessionLimits::default();
        let session_limits = SessionLimits {
            capacity: env::var("SESSION_CAPACITY")
                .ok()
                .and_then(|c| c.parse::<usize>().ok())
                .unwrap_or(session_defaults.capacity),
            idle: env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(session_defaults.idle),
        };

        Ok(Self {
            port,
            database_url,
            host,
            storage_public_url,
            buckets,
            search_mode,
            search_retries,
            url_sync_debounce,
            snapshot_dir,
            session_limits,
        })
    }
}
