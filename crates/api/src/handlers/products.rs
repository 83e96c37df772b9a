//! Handlers for the product catalog.
//!
//! The category filter on the listing endpoint is expanded through the tree:
//! `category_id=3` matches products in category 3 or any of its descendants.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_core::slug::slugify;
use shopkit_core::types::DbId;
use shopkit_db::models::product::{CreateProduct, ProductFilterParams, UpdateProduct};
use shopkit_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reject category assignments naming ids that do not exist.
async fn validate_category_ids(pool: &sqlx::PgPool, ids: &[DbId]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let existing = CategoryRepo::existing_ids(pool, ids).await?;
    if let Some(&missing) = ids.iter().find(|id| !existing.contains(id)) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: missing,
        }));
    }
    Ok(())
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductFilterParams>,
) -> AppResult<impl IntoResponse> {
    let category_ids = match params.category_id {
        Some(id) => CategoryRepo::descendant_ids_inclusive(&state.pool, id).await?,
        None => Vec::new(),
    };
    let products = ProductRepo::list(&state.pool, &params, &category_ids).await?;
    Ok(Json(DataResponse::new(products)))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(DataResponse::new(product)))
}

/// GET /products/slug/{slug}
///
/// Storefront detail view; bumps the view counter.
pub async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with slug \"{slug}\" not found")))?;
    ProductRepo::increment_view_count(&state.pool, product.id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// GET /products/{id}/categories
pub async fn get_product_categories(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ProductRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }));
    }
    let category_ids = ProductRepo::category_ids(&state.pool, id).await?;
    Ok(Json(DataResponse::new(category_ids)))
}

/// POST /products
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let slug = match &input.slug {
        Some(s) => s.trim().to_string(),
        None => slugify(&input.name),
    };
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot derive a slug from name \"{}\"; supply one explicitly",
            input.name
        ))));
    }
    if ProductRepo::slug_exists(&state.pool, &slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Product with slug \"{slug}\" already exists"
        ))));
    }
    if let Some(ids) = &input.category_ids {
        validate_category_ids(&state.pool, ids).await?;
    }

    let product = ProductRepo::insert(&state.pool, &input, &slug).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            product,
            "Product created successfully",
        )),
    ))
}

/// PUT /products/{id}
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let slug = match &input.slug {
        Some(s) => {
            let slug = s.trim().to_string();
            if ProductRepo::slug_exists(&state.pool, &slug, Some(id)).await? {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Product with slug \"{slug}\" already exists"
                ))));
            }
            Some(slug)
        }
        None => None,
    };
    if let Some(ids) = &input.category_ids {
        validate_category_ids(&state.pool, ids).await?;
    }

    let product = ProductRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    Ok(Json(DataResponse::with_message(
        product,
        "Product updated successfully",
    )))
}

/// DELETE /products/{id}
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProductRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }));
    }
    tracing::info!(product_id = id, "Product soft-deleted");
    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "id": id }),
        "Product deleted successfully",
    )))
}
