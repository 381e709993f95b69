use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
    ActiveValue::NotSet,
    sea_query::{Expr, Func, LikeExpr, extension::postgres::PgExpr},
};
use serde::de::DeserializeOwned;

use crate::entity::{
    categories::{Column as CategoryCol, Entity as Categories, Model as CategoryModel},
    products::{Column as ProductCol, Entity as Products, Model as ProductModel},
    reviews::{
        ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews, Model as ReviewModel,
    },
};

use super::{
    CatalogError, CatalogStore, CategoryRecord, ProductRecord, ProductSearch, ReviewRecord,
    SortToken, ValidReview,
};

/// Catalog backed by the Postgres data store through SeaORM.
#[derive(Clone)]
pub struct OrmCatalog {
    orm: DatabaseConnection,
}

impl OrmCatalog {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

const LIKE_ESCAPE: char = '\\';

/// Substring pattern that matches `text` literally, wildcards included.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn search_condition(search: &ProductSearch) -> Condition {
    let mut condition = Condition::all();

    if let Some(text) = search.text.as_ref().filter(|s| !s.is_empty()) {
        let pattern = like_pattern(text);
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::col(ProductCol::Name)
                        .ilike(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                )
                .add(
                    Expr::col(ProductCol::Description)
                        .ilike(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                ),
        );
    }

    if search.on_sale {
        condition = condition.add(ProductCol::DiscountedPrice.gt(Decimal::ZERO));
    }

    if search.free_shipping {
        condition = condition.add(ProductCol::FreeShipping.eq(true));
    }

    if let Some(gender) = search.gender.as_ref() {
        condition = condition
            .add(Expr::expr(Func::lower(Expr::col(ProductCol::Gender))).eq(gender.clone()));
    }

    if let Some(min_price) = search.min_price {
        condition = condition.add(ProductCol::Price.gte(min_price));
    }

    if let Some(max_price) = search.max_price {
        condition = condition.add(ProductCol::Price.lte(max_price));
    }

    condition
}

#[async_trait]
impl CatalogStore for OrmCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        let categories = Categories::find()
            .order_by_asc(CategoryCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect();
        Ok(categories)
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, CatalogError> {
        let category = Categories::find()
            .filter(CategoryCol::Slug.eq(slug))
            .one(&self.orm)
            .await?
            .map(category_from_entity);
        Ok(category)
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        let products = Products::find()
            .filter(ProductCol::CategorySlug.eq(slug))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let products = Products::find()
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, CatalogError> {
        let products = Products::find()
            .filter(ProductCol::Id.is_in(ids.iter().copied()))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        let mut finder = Products::find().filter(search_condition(search));
        finder = match search.sort {
            Some(SortToken::PriceAsc) => finder.order_by_asc(ProductCol::Price),
            Some(SortToken::PriceDesc) => finder.order_by_desc(ProductCol::Price),
            Some(SortToken::Newest) => finder.order_by_desc(ProductCol::CreatedAt),
            None => finder,
        };

        let products = finder
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }

    async fn product(&self, id: i64) -> Result<Option<ProductRecord>, CatalogError> {
        let product = Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn list_reviews(&self, product_id: i64) -> Result<Vec<ReviewRecord>, CatalogError> {
        let reviews = Reviews::find()
            .filter(ReviewCol::ProductId.eq(product_id))
            .order_by_desc(ReviewCol::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(review_from_entity)
            .collect();
        Ok(reviews)
    }

    async fn create_review(
        &self,
        product_id: i64,
        review: ValidReview,
    ) -> Result<ReviewRecord, CatalogError> {
        let active = ReviewActive {
            id: NotSet,
            product_id: Set(product_id),
            reviewer_name: Set(review.reviewer_name),
            reviewer_image_url: Set(review.reviewer_image_url),
            review_text: Set(review.review_text),
            rating: Set(review.rating),
            created_at: NotSet,
        };
        let created = active.insert(&self.orm).await?;
        Ok(review_from_entity(created))
    }
}

/// Decode a JSON column, treating malformed content as empty.
fn json_list<T: DeserializeOwned>(value: serde_json::Value, column: &str) -> Vec<T> {
    if value.is_null() {
        return Vec::new();
    }
    serde_json::from_value(value).unwrap_or_else(|err| {
        tracing::warn!(error = %err, column, "malformed product json column");
        Vec::new()
    })
}

fn category_from_entity(model: CategoryModel) -> CategoryRecord {
    CategoryRecord {
        id: model.id,
        name: model.name,
        slug: model.slug,
        image_url: model.image_url,
    }
}

fn product_from_entity(model: ProductModel) -> ProductRecord {
    ProductRecord {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        discounted_price: model.discounted_price,
        image_url: model.image_url,
        images: json_list(model.images, "images"),
        colors: json_list(model.colors, "colors"),
        sizes: json_list(model.sizes, "sizes"),
        category_slug: model.category_slug,
        gender: model.gender,
        rating: model.rating,
        reviews_count: model.reviews_count,
        in_stock: model.in_stock,
        free_shipping: model.free_shipping,
        created_at: model.created_at.map(|dt| dt.with_timezone(&Utc)),
    }
}

fn review_from_entity(model: ReviewModel) -> ReviewRecord {
    ReviewRecord {
        id: model.id,
        product_id: model.product_id,
        reviewer_name: model.reviewer_name,
        reviewer_image_url: model.reviewer_image_url,
        review_text: model.review_text,
        rating: model.rating,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
