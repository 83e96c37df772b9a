//! Contact-form entity models and DTOs.

use serde::{Deserialize, Serialize};
use shopkit_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Processing state of a contact request, stored as the `contact_status`
/// Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Processing,
    Completed,
    Cancelled,
}

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub status: ContactStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the public contact-form intake.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
}

/// DTO for admin status transitions.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContactStatus {
    pub status: ContactStatus,
}

/// Query parameters for contact listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilterParams {
    pub status: Option<ContactStatus>,
}
