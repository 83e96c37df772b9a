//! Handlers for contact-form intake and triage.
//!
//! Intake is the one public mutation in the API; everything else on this
//! resource is admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use shopkit_core::error::CoreError;
use shopkit_core::types::DbId;
use shopkit_db::models::contact::{ContactFilterParams, CreateContact, UpdateContactStatus};
use shopkit_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /contacts (public)
pub async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let contact = ContactRepo::insert(&state.pool, &input).await?;
    tracing::info!(contact_id = contact.id, "Contact request received");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            contact,
            "Contact request submitted",
        )),
    ))
}

/// GET /contacts
pub async fn list_contacts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContactFilterParams>,
) -> AppResult<impl IntoResponse> {
    let contacts = ContactRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(contacts)))
}

/// GET /contacts/{id}
pub async fn get_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(Json(DataResponse::new(contact)))
}

/// PATCH /contacts/{id}/status
pub async fn update_contact_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContactStatus>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(Json(DataResponse::with_message(
        contact,
        "Contact status updated",
    )))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }));
    }
    Ok(Json(DataResponse::with_message(
        serde_json::json!({ "id": id }),
        "Contact deleted",
    )))
}
