//! Display helpers shared by product cards and search results.

use rust_decimal::Decimal;

use crate::money::effective_price;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// Anything with a base price and an optional discounted price.
pub trait Priced {
    fn base_price(&self) -> Decimal;
    fn discounted_price(&self) -> Option<Decimal>;

    fn display_price(&self) -> Decimal {
        effective_price(self.base_price(), self.discounted_price())
    }
}

/// Keep an image URL only if a browser can load it as-is.
///
/// Absolute `http(s)` URLs and root-relative paths pass through trimmed;
/// missing, blank or bare relative paths collapse to the placeholder.
pub fn sanitize_image_url(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with('/')
    {
        return trimmed.to_string();
    }
    PLACEHOLDER_IMAGE.to_string()
}
