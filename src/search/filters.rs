use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::ToSchema;

use crate::{
    catalog::{ProductSearch, SortToken},
    money::parse_bound,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kids,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Kids => "kids",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "kids" => Ok(Gender::Kids),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Recommended,
    Newest,
    PriceLowHigh,
    PriceHighLow,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Recommended => "recommended",
            SortBy::Newest => "newest",
            SortBy::PriceLowHigh => "price-low-high",
            SortBy::PriceHighLow => "price-high-low",
        }
    }

    /// Backend sort token; `recommended` leaves ordering to the backend.
    pub fn token(&self) -> Option<SortToken> {
        match self {
            SortBy::Recommended => None,
            SortBy::Newest => Some(SortToken::Newest),
            SortBy::PriceLowHigh => Some(SortToken::PriceAsc),
            SortBy::PriceHighLow => Some(SortToken::PriceDesc),
        }
    }
}

impl FromStr for SortBy {
    type Err = ();

    /// Accepts both the UI names and the backend tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recommended" | "relevance" => Ok(SortBy::Recommended),
            "newest" => Ok(SortBy::Newest),
            "price-low-high" | "price_asc" => Ok(SortBy::PriceLowHigh),
            "price-high-low" | "price_desc" => Ok(SortBy::PriceHighLow),
            _ => Err(()),
        }
    }
}

/// Everything the shopper has typed or toggled on the search screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterState {
    pub query: String,
    pub on_sale: bool,
    pub free_shipping: bool,
    pub gender: Option<Gender>,
    pub sort_by: SortBy,
    /// Kept as typed; parsed when a search runs.
    pub min_price: String,
    pub max_price: String,
}

fn truthy(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true")
}

impl SearchFilterState {
    /// Sort order alone does not count as a filter.
    pub fn has_active_filter(&self) -> bool {
        self.on_sale
            || self.free_shipping
            || self.gender.is_some()
            || !self.min_price.trim().is_empty()
            || !self.max_price.trim().is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.query.trim().is_empty() && !self.has_active_filter()
    }

    /// Remote query parameters, or `None` when nothing would be searched for.
    pub fn to_product_search(&self) -> Option<ProductSearch> {
        if self.is_idle() {
            return None;
        }
        let text = self.query.trim();
        Some(ProductSearch {
            text: (!text.is_empty()).then(|| text.to_string()),
            on_sale: self.on_sale,
            free_shipping: self.free_shipping,
            gender: self.gender.map(|g| g.as_str().to_lowercase()),
            sort: self.sort_by.token(),
            min_price: parse_bound(&self.min_price),
            max_price: parse_bound(&self.max_price),
        })
    }

    /// Only fields that differ from their defaults, in a fixed order.
    pub fn canonical_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.query.trim().is_empty() {
            params.push(("q", self.query.clone()));
        }
        if self.on_sale {
            params.push(("onSale", "1".to_string()));
        }
        if self.free_shipping {
            params.push(("freeShipping", "1".to_string()));
        }
        if let Some(gender) = self.gender {
            params.push(("gender", gender.to_string()));
        }
        if self.sort_by != SortBy::Recommended {
            params.push(("sort", self.sort_by.as_str().to_string()));
        }
        if !self.min_price.trim().is_empty() {
            params.push(("minPrice", self.min_price.trim().to_string()));
        }
        if !self.max_price.trim().is_empty() {
            params.push(("maxPrice", self.max_price.trim().to_string()));
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.canonical_params() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Unknown keys and unparseable values fall back to defaults.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "q" | "query" => state.query = value.into_owned(),
                "onSale" => state.on_sale = truthy(&value),
                "freeShipping" => state.free_shipping = truthy(&value),
                "gender" => state.gender = value.parse().ok(),
                "sort" | "sortBy" => state.sort_by = value.parse().unwrap_or_default(),
                "minPrice" => state.min_price = value.into_owned(),
                "maxPrice" => state.max_price = value.into_owned(),
                _ => {}
            }
        }
        state
    }
}
