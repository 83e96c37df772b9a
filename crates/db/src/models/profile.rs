//! Admin profile entity models and DTOs.
//!
//! The back-office is single-tenant: one profile row carries both the
//! company details shown on the storefront and the admin credentials.

use serde::{Deserialize, Serialize};
use shopkit_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Role of a profile, stored as the `user_role` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

/// A row from the `profiles` table.
///
/// The password hash never leaves the server: it is skipped during
/// serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating the company-facing profile fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub logo_url: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Password-change request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}
