pub mod auth;
pub mod categories;
pub mod contacts;
pub mod health;
pub mod media;
pub mod products;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login             login (public)
/// /auth/me                current profile (requires auth)
///
/// /categories             tree queries (public), mutations (admin only)
/// /products               catalog queries (public), mutations (admin only)
/// /media                  library queries (public), mutations (admin only)
/// /contacts               intake (public), triage (admin only)
/// /profile                company profile and credentials (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/media", media::router())
        .nest("/contacts", contacts::router())
        .nest("/profile", profile::router())
}
