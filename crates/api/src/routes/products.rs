//! Route definitions for the product catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes mounted at `/products`.
///
/// ```text
/// GET    /                 -> list_products (?search, ?category_id, ?in_stock, ?limit, ?offset)
/// POST   /                 -> create_product (admin only)
/// GET    /slug/{slug}      -> get_product_by_slug (bumps view count)
/// GET    /{id}             -> get_product
/// PUT    /{id}             -> update_product (admin only)
/// DELETE /{id}             -> delete_product (admin only, soft)
/// GET    /{id}/categories  -> get_product_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route("/slug/{slug}", get(products::get_product_by_slug))
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/{id}/categories", get(products::get_product_categories))
}
