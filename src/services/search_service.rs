use crate::{
    dto::search::SearchResponse,
    error::AppResult,
    response::{ApiResponse, Meta},
    search::{SearchFilterState, SearchOutcome},
    state::AppState,
};

pub async fn search(
    state: &AppState,
    filters: SearchFilterState,
) -> AppResult<ApiResponse<SearchResponse>> {
    let outcome = state.search.search(&filters).await.inspect_err(|err| {
        tracing::warn!(error = %err, query = %filters.query, "search failed");
    })?;

    let active = outcome.is_active();
    let results = match outcome {
        SearchOutcome::Inactive => Vec::new(),
        SearchOutcome::Results(results) => results,
    };
    let filters = filters
        .canonical_params()
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    let count = results.len();
    Ok(ApiResponse::success(
        "Search results",
        SearchResponse {
            results,
            count,
            filters,
            active,
        },
        Some(Meta::total(count)),
    ))
}
