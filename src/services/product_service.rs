use crate::{
    catalog::{NewReview, ProductRecord, ReviewRecord},
    display::Priced,
    dto::products::{CreatedReview, ProductList, ReviewList},
    error::{AppError, AppResult},
    models::ProductDetail,
    money::is_on_sale,
    response::{ApiResponse, Meta},
    search::project,
    state::AppState,
    storage::PublicUrls,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<_> = state
        .catalog
        .list_products()
        .await?
        .into_iter()
        .map(|record| project(record, &state.urls))
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<ProductDetail>> {
    let product = state.catalog.product(id).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Product",
        product_detail(product, &state.urls),
        None,
    ))
}

pub async fn list_reviews(
    state: &AppState,
    product_id: i64,
) -> AppResult<ApiResponse<ReviewList>> {
    let reviews: Vec<ReviewRecord> = state
        .catalog
        .list_reviews(product_id)
        .await?
        .into_iter()
        .map(|review| resolve_reviewer_image(review, &state.urls))
        .collect();

    let meta = Meta::total(reviews.len());
    Ok(ApiResponse::success("Reviews", ReviewList { reviews }, Some(meta)))
}

pub async fn create_review(
    state: &AppState,
    product_id: i64,
    payload: NewReview,
) -> AppResult<ApiResponse<CreatedReview>> {
    let review = payload.validate()?;
    if state.catalog.product(product_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let created = state.catalog.create_review(product_id, review).await?;
    tracing::info!(product_id, review_id = created.id, "review created");

    Ok(ApiResponse::success(
        "Review created",
        CreatedReview {
            review: resolve_reviewer_image(created, &state.urls),
        },
        Some(Meta::empty()),
    ))
}

/// The raw image paths are moved out of the record and replaced by resolved URLs.
pub fn product_detail(mut product: ProductRecord, urls: &PublicUrls) -> ProductDetail {
    let image = urls.product_image(product.image_url.as_deref());
    let images = image
        .iter()
        .cloned()
        .chain(
            std::mem::take(&mut product.images)
                .iter()
                .filter_map(|path| urls.product_image(Some(path))),
        )
        .collect();

    ProductDetail {
        display_price: product.display_price(),
        on_sale: is_on_sale(product.discounted_price),
        image,
        images,
        product,
    }
}

fn resolve_reviewer_image(review: ReviewRecord, urls: &PublicUrls) -> ReviewRecord {
    let reviewer_image_url = urls.reviewer_image(review.reviewer_image_url.as_deref());
    ReviewRecord {
        reviewer_image_url,
        ..review
    }
}
