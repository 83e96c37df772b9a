//! Route definitions for the media library.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Media routes mounted at `/media`.
///
/// ```text
/// GET    /                 -> list_media (?media_type, ?product_id, ?search)
/// POST   /                 -> create_media (admin only)
/// GET    /orphans          -> list_orphans (admin only)
/// POST   /cleanup          -> cleanup_orphans (admin only)
/// GET    /{id}             -> get_media
/// PUT    /{id}             -> update_media (admin only)
/// DELETE /{id}             -> delete_media (admin only, soft)
/// DELETE /{id}/permanent   -> hard_delete_media (admin only, removes blob)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list_media).post(media::create_media))
        .route("/orphans", get(media::list_orphans))
        .route("/cleanup", post(media::cleanup_orphans))
        .route(
            "/{id}",
            get(media::get_media)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        .route("/{id}/permanent", delete(media::hard_delete_media))
}
