use crate::config::BucketConfig;

/// Resolves object-storage paths into public URLs.
#[derive(Debug, Clone)]
pub struct PublicUrls {
    base: String,
    buckets: BucketConfig,
}

impl PublicUrls {
    pub fn new(base: impl Into<String>, buckets: BucketConfig) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, buckets }
    }

    /// `None` when the record carries no path.
    pub fn build_public_url(&self, bucket: &str, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        Some(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base, bucket, path
        ))
    }

    pub fn category_image(&self, path: Option<&str>) -> Option<String> {
        self.build_public_url(&self.buckets.category, path)
    }

    pub fn product_image(&self, path: Option<&str>) -> Option<String> {
        self.build_public_url(&self.buckets.product, path)
    }

    pub fn reviewer_image(&self, path: Option<&str>) -> Option<String> {
        self.build_public_url(&self.buckets.reviewer, path)
    }
}
