use axum::{
    Json, Router,
    extract::{RawQuery, State},
    routing::get,
};

use crate::{
    dto::search::SearchResponse,
    error::AppResult,
    response::ApiResponse,
    search::SearchFilterState,
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = Option<String>, Query, description = "Free text"),
        ("onSale" = Option<String>, Query, description = "1 or true"),
        ("freeShipping" = Option<String>, Query, description = "1 or true"),
        ("gender" = Option<String>, Query, description = "men, women or kids"),
        ("sort" = Option<String>, Query, description = "recommended, newest, price-low-high, price-high-low"),
        ("minPrice" = Option<String>, Query, description = "Lower price bound"),
        ("maxPrice" = Option<String>, Query, description = "Upper price bound"),
    ),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<SearchResponse>)
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<ApiResponse<SearchResponse>>> {
    let filters = SearchFilterState::from_query_string(query.as_deref().unwrap_or_default());
    let resp = search_service::search(&state, filters).await?;
    Ok(Json(resp))
}
