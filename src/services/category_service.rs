use crate::{
    catalog::CategoryRecord,
    dto::products::{CategoryList, ProductList},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    search::project,
    state::AppState,
    storage::PublicUrls,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = state
        .catalog
        .list_categories()
        .await?
        .into_iter()
        .map(|category| with_image(category, &state.urls))
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn get_category(state: &AppState, slug: &str) -> AppResult<ApiResponse<Category>> {
    let category = state.catalog.category_by_slug(slug).await?;
    let category = match category {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Category",
        with_image(category, &state.urls),
        None,
    ))
}

/// An unknown slug yields an empty list, not an error.
pub async fn products_by_category(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<_> = match state.catalog.products_by_category(slug).await {
        Ok(records) => records
            .into_iter()
            .map(|record| project(record, &state.urls))
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, slug, "category products unavailable");
            Vec::new()
        }
    };

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

fn with_image(category: CategoryRecord, urls: &PublicUrls) -> Category {
    Category {
        image: urls.category_image(category.image_url.as_deref()),
        category,
    }
}
