//! Repository for the single-tenant admin profile.

use sqlx::PgPool;

use shopkit_core::types::DbId;

use crate::models::profile::{Profile, UpdateProfile};

/// Column list for `profiles` queries.
const PROFILE_COLUMNS: &str = "\
    id, company_name, phone, address, email, logo_url, \
    username, password_hash, role, is_active, created_at, updated_at";

/// Provides lookups and updates for the admin profile.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active profile by username, for login.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE username = $1 AND is_active = TRUE"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Update the company-facing profile fields. Only non-`None` fields are
    /// applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                company_name = COALESCE($2, company_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                email = COALESCE($5, email),
                logo_url = COALESCE($6, logo_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.email)
            .bind(&input.logo_url)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored password hash. Returns `true` if a row was
    /// updated.
    pub async fn set_password_hash(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
