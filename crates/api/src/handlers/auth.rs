//! Authentication handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_db::models::profile::{LoginRequest, Profile};
use shopkit_db::repositories::ProfileRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Login response body: the access token plus the authenticated profile.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub profile: Profile,
}

/// POST /auth/login
///
/// Username lookup and password verification both collapse into the same
/// "invalid credentials" rejection so the response does not reveal which
/// part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let profile = ProfileRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&input.password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?
    {
        return Err(invalid());
    }

    let access_token = generate_token(profile.id, profile.role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(profile_id = profile.id, "Login successful");
    Ok(Json(DataResponse::new(LoginResponse {
        access_token,
        profile,
    })))
}

/// GET /auth/me
pub async fn me(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.profile_id,
        }))?;
    Ok(Json(DataResponse::new(profile)))
}
