//! Route definitions for the category tree.
//!
//! All routes are mounted under `/categories`. Query endpoints are public;
//! mutations carry the admin extractor in their handlers.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /                   -> list_categories (?active=false for all)
/// POST   /                   -> create_category (admin only)
/// GET    /roots              -> list_roots
/// GET    /tree               -> get_forest (?active=false includes inactive)
/// GET    /search?q=term      -> search_categories
/// GET    /slug/{slug}        -> get_category_by_slug
/// GET    /{id}               -> get_category
/// PUT    /{id}               -> update_category (admin only)
/// DELETE /{id}               -> delete_category (admin only, ?cascade=true)
/// PATCH  /{id}/move          -> move_category (admin only)
/// DELETE /{id}/permanent     -> hard_delete_category (admin only, ?cascade=true)
/// GET    /{id}/children      -> list_children
/// GET    /{id}/descendants   -> list_descendants
/// GET    /{id}/tree          -> get_subtree
/// GET    /{id}/breadcrumb    -> get_breadcrumb
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/roots", get(categories::list_roots))
        .route("/tree", get(categories::get_forest))
        .route("/search", get(categories::search_categories))
        .route("/slug/{slug}", get(categories::get_category_by_slug))
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/{id}/move", patch(categories::move_category))
        .route("/{id}/permanent", delete(categories::hard_delete_category))
        .route("/{id}/children", get(categories::list_children))
        .route("/{id}/descendants", get(categories::list_descendants))
        .route("/{id}/tree", get(categories::get_subtree))
        .route("/{id}/breadcrumb", get(categories::get_breadcrumb))
}
