//! Handlers for the company profile and admin credentials.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_db::models::profile::{ChangePasswordRequest, UpdateProfile};
use shopkit_db::repositories::ProfileRepo;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /profile
pub async fn get_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_id(&state.pool, admin.profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: admin.profile_id,
        }))?;
    Ok(Json(DataResponse::new(profile)))
}

/// PUT /profile
pub async fn update_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let profile = ProfileRepo::update(&state.pool, admin.profile_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: admin.profile_id,
        }))?;
    Ok(Json(DataResponse::with_message(
        profile,
        "Profile updated successfully",
    )))
}

/// POST /profile/change-password
///
/// Requires the current password before accepting the new one.
pub async fn change_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let profile = ProfileRepo::find_by_id(&state.pool, admin.profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: admin.profile_id,
        }))?;

    let matches = verify_password(&input.current_password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !matches {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    ProfileRepo::set_password_hash(&state.pool, admin.profile_id, &new_hash).await?;

    tracing::info!(profile_id = admin.profile_id, "Password changed");
    Ok(Json(DataResponse::with_message(
        serde_json::json!({}),
        "Password changed successfully",
    )))
}
