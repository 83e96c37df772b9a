//! Route definitions for contact-form intake and triage.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::contacts;
use crate::state::AppState;

/// Contact routes mounted at `/contacts`.
///
/// ```text
/// POST   /               -> create_contact (public intake)
/// GET    /               -> list_contacts (admin only, ?status)
/// GET    /{id}           -> get_contact (admin only)
/// DELETE /{id}           -> delete_contact (admin only)
/// PATCH  /{id}/status    -> update_contact_status (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/{id}",
            get(contacts::get_contact).delete(contacts::delete_contact),
        )
        .route("/{id}/status", patch(contacts::update_contact_status))
}
