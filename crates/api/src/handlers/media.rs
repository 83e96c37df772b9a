//! Handlers for the media library.
//!
//! Records describe objects that were already uploaded to storage; creating
//! one registers the URL, hard-deleting one also removes the blob
//! (best-effort). The orphan-cleanup endpoint sweeps records attached to
//! neither a product nor a category.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_core::types::DbId;
use shopkit_db::models::media::{
    file_name_from_url, CreateMedia, MediaFilterParams, MediaType, UpdateMedia,
};
use shopkit_db::repositories::MediaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::delete_blobs_best_effort;

/// GET /media
pub async fn list_media(
    State(state): State<AppState>,
    Query(params): Query<MediaFilterParams>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(media)))
}

/// GET /media/{id}
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;
    Ok(Json(DataResponse::new(media)))
}

/// GET /media/orphans
///
/// Media attached to neither a product nor any category; candidates for
/// cleanup.
pub async fn list_orphans(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let orphans = MediaRepo::find_orphans(&state.pool).await?;
    Ok(Json(DataResponse::new(orphans)))
}

/// POST /media
///
/// Registers an already-uploaded object. File name and media kind default
/// from the URL when the caller omits them.
pub async fn create_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMedia>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let file_name = input
        .file_name
        .clone()
        .unwrap_or_else(|| file_name_from_url(&input.file_url));
    let media_type = input
        .media_type
        .unwrap_or_else(|| MediaType::from_url(&input.file_url));

    let media = MediaRepo::insert(&state.pool, &input, &file_name, media_type).await?;
    tracing::info!(media_id = media.id, file_name = %media.file_name, "Media registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            media,
            "Media created successfully",
        )),
    ))
}

/// PUT /media/{id}
pub async fn update_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedia>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let media = MediaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;
    Ok(Json(DataResponse::with_message(
        media,
        "Media updated successfully",
    )))
}

/// DELETE /media/{id}
///
/// Soft delete; the blob stays in storage until a permanent delete or an
/// orphan sweep.
pub async fn delete_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MediaRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Media", id }));
    }
    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "id": id }),
        "Media deleted successfully",
    )))
}

/// DELETE /media/{id}/permanent
pub async fn hard_delete_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;

    delete_blobs_best_effort(state.storage.as_ref(), &[media.file_url.clone()]).await;
    MediaRepo::hard_delete(&state.pool, id).await?;

    tracing::info!(media_id = id, "Media permanently deleted");
    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "id": id }),
        "Media permanently deleted",
    )))
}

/// POST /media/cleanup
///
/// Removes every orphaned media record and its blob.
pub async fn cleanup_orphans(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let orphans = MediaRepo::find_orphans(&state.pool).await?;
    if orphans.is_empty() {
        return Ok(Json(DataResponse::with_message(
            serde_json::json!({ "removed": 0 }),
            "No orphaned media found",
        )));
    }

    let urls: Vec<String> = orphans.iter().map(|m| m.file_url.clone()).collect();
    delete_blobs_best_effort(state.storage.as_ref(), &urls).await;

    let ids: Vec<DbId> = orphans.iter().map(|m| m.id).collect();
    let removed = MediaRepo::hard_delete_many(&state.pool, &ids).await?;

    tracing::info!(removed, "Orphaned media cleaned up");
    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "removed": removed }),
        "Orphaned media cleaned up",
    )))
}
