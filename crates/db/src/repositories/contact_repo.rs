//! Repository for contact-form submissions.

use sqlx::PgPool;

use shopkit_core::types::DbId;

use crate::models::contact::{Contact, ContactFilterParams, ContactStatus, CreateContact};

/// Column list for `contacts` queries.
const CONTACT_COLUMNS: &str =
    "id, name, phone, address, message, status, created_at, updated_at";

/// Provides intake and admin operations for contact requests.
pub struct ContactRepo;

impl ContactRepo {
    /// Find a contact request by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contact requests, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        params: &ContactFilterParams,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE ($1::contact_status IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(params.status)
            .fetch_all(pool)
            .await
    }

    /// Record a new contact request from the public form.
    pub async fn insert(pool: &PgPool, input: &CreateContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, phone, address, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {CONTACT_COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.address.as_deref())
            .bind(input.message.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Transition a contact request to a new status. Returns `None` if no
    /// row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ContactStatus,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {CONTACT_COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Remove a contact request. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
