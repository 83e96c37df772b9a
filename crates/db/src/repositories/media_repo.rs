//! Repository for the media library.

use sqlx::PgPool;

use shopkit_core::types::DbId;

use crate::models::media::{CreateMedia, Media, MediaFilterParams, MediaType, UpdateMedia};

/// Column list for `media` queries.
const MEDIA_COLUMNS: &str = "\
    id, file_name, file_url, media_type, mime_type, file_size, \
    width, height, alt_text, description, sort_order, product_id, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for media records.
pub struct MediaRepo;

impl MediaRepo {
    /// Find a media record by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find several media records by ID. Missing ids are simply absent from
    /// the result.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ANY($1)");
        sqlx::query_as::<_, Media>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List media with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &MediaFilterParams,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} FROM media
             WHERE ($1::media_type IS NULL OR media_type = $1)
               AND ($2::BIGINT IS NULL OR product_id = $2)
               AND ($3::TEXT IS NULL OR file_name ILIKE $3 OR alt_text ILIKE $3)
             ORDER BY created_at DESC"
        );
        let pattern = params.search.as_ref().map(|s| format!("%{s}%"));
        sqlx::query_as::<_, Media>(&query)
            .bind(params.media_type)
            .bind(params.product_id)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Media attached to neither a product nor any category.
    pub async fn find_orphans(pool: &PgPool) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} FROM media m
             WHERE m.product_id IS NULL
               AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.media_id = m.id)
             ORDER BY m.created_at DESC"
        );
        sqlx::query_as::<_, Media>(&query).fetch_all(pool).await
    }

    /// Insert a new media record. `file_name` and `media_type` are resolved
    /// by the caller when the DTO omits them.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateMedia,
        file_name: &str,
        media_type: MediaType,
    ) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media
                (file_name, file_url, media_type, mime_type, file_size,
                 width, height, alt_text, description, sort_order, product_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {MEDIA_COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(file_name)
            .bind(&input.file_url)
            .bind(media_type)
            .bind(input.mime_type.as_deref())
            .bind(input.file_size)
            .bind(input.width)
            .bind(input.height)
            .bind(input.alt_text.as_deref())
            .bind(input.description.as_deref())
            .bind(input.sort_order.unwrap_or(0))
            .bind(input.product_id)
            .fetch_one(pool)
            .await
    }

    /// Update a media record. Only non-`None` fields are applied. Returns
    /// `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedia,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET
                file_name = COALESCE($2, file_name),
                alt_text = COALESCE($3, alt_text),
                description = COALESCE($4, description),
                sort_order = COALESCE($5, sort_order),
                product_id = COALESCE($6, product_id),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {MEDIA_COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.file_name)
            .bind(&input.alt_text)
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.product_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a media record. Returns `true` if a row was marked
    /// inactive.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE media SET is_active = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove a media record. Returns `true` if a row was
    /// deleted.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove several media records. Returns the number of rows
    /// deleted.
    pub async fn hard_delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
