//! Route definitions for the company profile.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes mounted at `/profile` (all admin only).
///
/// ```text
/// GET  /                 -> get_profile
/// PUT  /                 -> update_profile
/// POST /change-password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/change-password", post(profile::change_password))
}
