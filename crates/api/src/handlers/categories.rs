//! Handlers for the category tree.
//!
//! Query endpoints are public; every mutation is admin-only. Precondition
//! checks (existence, name/slug uniqueness, the cycle guard, the
//! children-without-cascade gate) all run before any write, so a rejected
//! request never leaves the tree partially mutated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_core::slug::slugify;
use shopkit_core::tree::{self, Adjacency};
use shopkit_core::types::DbId;
use shopkit_db::models::category::{
    Category, CreateCategory, DeleteCategoryParams, MoveCategory, UpdateCategory,
};
use shopkit_db::repositories::{CategoryRepo, MediaRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::delete_blobs_best_effort;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Fetch a category or fail with NotFound.
async fn require_category(pool: &sqlx::PgPool, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// Resolve the slug for a create/update: explicit value wins, otherwise it
/// is derived from the name. Rejects names that normalize to nothing.
fn resolve_slug(explicit: Option<&str>, name: &str) -> AppResult<String> {
    let slug = match explicit {
        Some(s) => s.trim().to_string(),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot derive a slug from name \"{name}\"; supply one explicitly"
        ))));
    }
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Query endpoints (public)
// ---------------------------------------------------------------------------

/// Query parameters for flat and tree listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Restrict to active categories (default true for storefront views).
    pub active: Option<bool>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// GET /categories
///
/// Flat listing across all depths: active categories in display order, or
/// every category (newest first) when `active=false`.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let categories = if params.active.unwrap_or(true) {
        CategoryRepo::find_all_active(&state.pool).await?
    } else {
        CategoryRepo::find_all(&state.pool).await?
    };
    Ok(Json(DataResponse::new(categories)))
}

/// GET /categories/roots
pub async fn list_roots(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roots = CategoryRepo::find_roots(&state.pool).await?;
    Ok(Json(DataResponse::new(roots)))
}

/// GET /categories/tree
///
/// The full forest: every root expanded into its descendant tree.
/// `active=false` includes inactive categories (admin view).
pub async fn get_forest(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let forest = CategoryRepo::full_forest(&state.pool, params.active.unwrap_or(true)).await?;
    Ok(Json(DataResponse::new(forest)))
}

/// GET /categories/search?q=term
pub async fn search_categories(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let results = CategoryRepo::search(&state.pool, &params.q).await?;
    Ok(Json(DataResponse::new(results)))
}

/// GET /categories/slug/{slug}
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with slug \"{slug}\" not found")))?;
    Ok(Json(DataResponse::new(category)))
}

/// GET /categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = require_category(&state.pool, id).await?;
    Ok(Json(DataResponse::new(category)))
}

/// GET /categories/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let children = CategoryRepo::find_children(&state.pool, Some(id)).await?;
    Ok(Json(DataResponse::new(children)))
}

/// GET /categories/{id}/descendants
///
/// Flat transitive closure below `id`. Unknown ids yield an empty list by
/// design; this endpoint is the "set of descendant ids" the product catalog
/// filters by.
pub async fn list_descendants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let descendants = CategoryRepo::find_descendants(&state.pool, id).await?;
    Ok(Json(DataResponse::new(descendants)))
}

/// GET /categories/{id}/tree
///
/// The subtree rooted at `id` as a nested structure.
pub async fn get_subtree(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tree = CategoryRepo::find_descendants_as_tree(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse::new(tree)))
}

/// GET /categories/{id}/breadcrumb
///
/// Root-first ancestor path. Unlike the descendant queries, an unknown id
/// here is NotFound: a breadcrumb for a nonexistent page is a caller bug.
pub async fn get_breadcrumb(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let chain = CategoryRepo::breadcrumb(&state.pool, id).await?;
    if chain.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    Ok(Json(DataResponse::new(chain)))
}

// ---------------------------------------------------------------------------
// Mutation endpoints (admin only)
// ---------------------------------------------------------------------------

/// POST /categories
pub async fn create_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if CategoryRepo::active_name_exists(&state.pool, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category with name \"{}\" already exists",
            input.name
        ))));
    }

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    if CategoryRepo::slug_exists(&state.pool, &slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category with slug \"{slug}\" already exists"
        ))));
    }

    // Level is derived from the parent at creation time; roots sit at 0.
    let level = match input.parent_id {
        Some(parent_id) => require_category(&state.pool, parent_id).await?.level + 1,
        None => 0,
    };

    let category = CategoryRepo::insert(&state.pool, &input, &slug, level).await?;

    tracing::info!(
        category_id = category.id,
        name = %category.name,
        level = category.level,
        "Category created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            category,
            "Category created successfully",
        )),
    ))
}

/// PUT /categories/{id}
///
/// Field updates only; re-parenting goes through the move endpoint so the
/// level cascade always runs.
pub async fn update_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = require_category(&state.pool, id).await?;

    if let Some(name) = &input.name {
        if name != &existing.name
            && CategoryRepo::active_name_exists(&state.pool, name, Some(id)).await?
        {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Category with name \"{name}\" already exists"
            ))));
        }
    }

    let slug = match &input.slug {
        Some(slug) => {
            let slug = slug.trim().to_string();
            if slug != existing.slug && CategoryRepo::slug_exists(&state.pool, &slug, Some(id)).await?
            {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Category with slug \"{slug}\" already exists"
                ))));
            }
            Some(slug)
        }
        None => None,
    };

    let updated = CategoryRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    Ok(Json(DataResponse::with_message(
        updated,
        "Category updated successfully",
    )))
}

/// PATCH /categories/{id}/move
///
/// Re-parent a category (`parent_id: null` makes it a root). The cycle
/// guard rejects moves under the target itself or any of its descendants;
/// on success the whole subtree's levels are recomputed transactionally.
pub async fn move_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MoveCategory>,
) -> AppResult<impl IntoResponse> {
    require_category(&state.pool, id).await?;

    let new_level = match input.parent_id {
        Some(parent_id) => require_category(&state.pool, parent_id).await?.level + 1,
        None => 0,
    };

    // The subtree snapshot doubles as the cycle guard's descendant set and
    // the level-cascade input. It spans inactive rows too: a cycle through
    // a soft-deleted node is still a cycle.
    let subtree = CategoryRepo::collect_subtree(&state.pool, id).await?;
    let adj = Adjacency::build(&subtree);
    if adj.would_create_cycle(id, input.parent_id) {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot move a category under itself or its own descendant".into(),
        )));
    }

    let plan = adj.level_plan(id, new_level);
    CategoryRepo::move_subtree(&state.pool, id, input.parent_id, &plan).await?;

    tracing::info!(
        category_id = id,
        new_parent_id = ?input.parent_id,
        relevelled = plan.len(),
        "Category moved",
    );

    let moved = require_category(&state.pool, id).await?;
    Ok(Json(DataResponse::with_message(
        moved,
        "Category moved successfully",
    )))
}

/// DELETE /categories/{id}?cascade=true
///
/// Soft delete: marks the target (and, with cascade, every descendant)
/// inactive. No rows are removed.
pub async fn delete_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteCategoryParams>,
) -> AppResult<impl IntoResponse> {
    require_category(&state.pool, id).await?;

    if !params.cascade && CategoryRepo::has_children(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Category has subcategories; delete them first or pass cascade=true".into(),
        )));
    }

    let ids: Vec<DbId> = if params.cascade {
        CategoryRepo::collect_subtree(&state.pool, id)
            .await?
            .iter()
            .map(|c| c.id)
            .collect()
    } else {
        vec![id]
    };

    let deactivated = CategoryRepo::soft_delete_many(&state.pool, &ids).await?;
    tracing::info!(category_id = id, deactivated, "Category soft-deleted");

    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "deactivated": deactivated }),
        "Category deleted successfully",
    )))
}

/// DELETE /categories/{id}/permanent?cascade=true
///
/// Irreversible row removal. With cascade, the whole subtree is collected
/// up front; attached media blobs are batch-deleted from storage
/// (best-effort), then rows are removed deepest level first so the
/// self-referencing foreign key never blocks a delete.
pub async fn hard_delete_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteCategoryParams>,
) -> AppResult<impl IntoResponse> {
    let target = require_category(&state.pool, id).await?;

    if !params.cascade && CategoryRepo::has_children(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Category has subcategories; delete them first or pass cascade=true".into(),
        )));
    }

    let doomed: Vec<Category> = if params.cascade {
        CategoryRepo::collect_subtree(&state.pool, id).await?
    } else {
        vec![target]
    };

    // Resolve attached media to storage paths before the rows disappear,
    // then drop the media rows themselves (the category FK is SET NULL).
    let media_ids: Vec<DbId> = doomed.iter().filter_map(|c| c.media_id).collect();
    if !media_ids.is_empty() {
        let media = MediaRepo::find_by_ids(&state.pool, &media_ids).await?;
        let urls: Vec<String> = media.into_iter().map(|m| m.file_url).collect();
        delete_blobs_best_effort(state.storage.as_ref(), &urls).await;
        MediaRepo::hard_delete_many(&state.pool, &media_ids).await?;
    }

    let levelled: Vec<(DbId, i32)> = doomed.iter().map(|c| (c.id, c.level)).collect();
    let order = tree::deepest_first(&levelled);
    let deleted = CategoryRepo::hard_delete_ordered(&state.pool, &order).await?;

    tracing::info!(category_id = id, deleted, "Category hard-deleted");

    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "deleted": deleted }),
        "Category permanently deleted",
    )))
}
