use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{CartLineItem, NewCartItem},
    catalog::{CategoryRecord, NewReview, ProductColor, ProductRecord, ProductSize, ReviewRecord},
    checkout::{
        CheckoutState, FormattedPrices, OrderSummary, PaymentMethod, ShippingAddress,
    },
    dto::{
        cart::{CartView, UpdateQuantityRequest},
        checkout::{CheckoutView, PaymentMethodRequest, PromoCodeRequest, ShippingCostRequest},
        products::{CategoryList, CreatedReview, ProductList, ReviewList},
        search::SearchResponse,
    },
    models::{Category, ProductDetail},
    orders::{OrderPayload, OrderRecord},
    response::{ApiResponse, Meta},
    routes::{categories, health, orders, products, search, sessions},
    search::{Gender, ProductSummary, SearchFilterState, SortBy},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::list_reviews,
        products::create_review,
        categories::list_categories,
        categories::get_category,
        categories::category_products,
        search::search,
        sessions::view_cart,
        sessions::add_to_cart,
        sessions::update_quantity,
        sessions::remove_item,
        sessions::clear_cart,
        sessions::toggle_cart,
        sessions::validate_cart,
        sessions::view_checkout,
        sessions::set_shipping_address,
        sessions::set_payment_method,
        sessions::set_shipping_cost,
        sessions::apply_promo_code,
        sessions::remove_promo_code,
        sessions::complete_order,
        orders::create_order,
        orders::get_order
    ),
    components(
        schemas(
            CategoryRecord,
            Category,
            ProductRecord,
            ProductColor,
            ProductSize,
            ProductDetail,
            ProductSummary,
            ReviewRecord,
            NewReview,
            CartLineItem,
            NewCartItem,
            CartView,
            UpdateQuantityRequest,
            ShippingAddress,
            PaymentMethod,
            CheckoutState,
            CheckoutView,
            FormattedPrices,
            OrderSummary,
            PaymentMethodRequest,
            PromoCodeRequest,
            ShippingCostRequest,
            OrderPayload,
            OrderRecord,
            SearchFilterState,
            SearchResponse,
            Gender,
            SortBy,
            ProductList,
            CategoryList,
            ReviewList,
            CreatedReview,
            Meta,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutView>,
            ApiResponse<OrderRecord>,
            ApiResponse<SearchResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product detail and reviews"),
        (name = "Categories", description = "Category browsing"),
        (name = "Search", description = "Product search and filters"),
        (name = "Cart", description = "Per-session shopping cart"),
        (name = "Checkout", description = "Per-session checkout and order submission"),
        (name = "Orders", description = "Order records"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
