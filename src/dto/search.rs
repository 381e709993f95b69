use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::search::ProductSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<ProductSummary>,
    pub count: usize,
    /// Canonical query parameters: only fields that differ from their defaults.
    pub filters: BTreeMap<String, String>,
    /// False when nothing was searched for, as opposed to zero matches.
    pub active: bool,
}
