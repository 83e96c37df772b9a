//! Repository for the product catalog.
//!
//! Category filtering takes a pre-expanded id set ("category including
//! subcategories") produced by the category tree queries, and matches it
//! against the `product_categories` join table.

use sqlx::PgPool;

use shopkit_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductFilterParams, UpdateProduct};

/// Column list for `products` queries.
const PRODUCT_COLUMNS: &str = "\
    id, name, slug, sku, price, short_description, description, \
    specifications, tags, view_count, is_active, in_stock, \
    created_at, updated_at";

/// Default page size for product listing.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for product listing.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD and filtered listing for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Find a product by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active product by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
        let query =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1 AND is_active = TRUE");
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any product already uses this slug.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM products
             WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             LIMIT 1",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// List active products with optional filters and pagination.
    ///
    /// `category_ids`, when non-empty, is the pre-expanded descendant set of
    /// the requested category.
    pub async fn list(
        pool: &PgPool,
        params: &ProductFilterParams,
        category_ids: &[DbId],
    ) -> Result<Vec<Product>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);
        let pattern = params.search.as_ref().map(|s| format!("%{s}%"));

        let query = format!(
            "SELECT DISTINCT p.id, p.name, p.slug, p.sku, p.price,
                    p.short_description, p.description, p.specifications,
                    p.tags, p.view_count, p.is_active, p.in_stock,
                    p.created_at, p.updated_at
             FROM products p
             LEFT JOIN product_categories pc ON pc.product_id = p.id
             WHERE p.is_active = TRUE
               AND ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
               AND ($2::BOOLEAN IS NULL OR p.in_stock = $2)
               AND (CARDINALITY($3::BIGINT[]) = 0 OR pc.category_id = ANY($3))
             ORDER BY p.created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(pattern)
            .bind(params.in_stock)
            .bind(category_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Category ids currently assigned to a product.
    pub async fn category_ids(pool: &PgPool, product_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT category_id FROM product_categories WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new product and its category assignments in one transaction.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateProduct,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products
                (name, slug, sku, price, short_description, description,
                 specifications, tags, in_stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(input.sku.as_deref())
            .bind(input.price)
            .bind(input.short_description.as_deref())
            .bind(input.description.as_deref())
            .bind(&input.specifications)
            .bind(&input.tags)
            .bind(input.in_stock.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        if let Some(category_ids) = &input.category_ids {
            for &category_id in category_ids {
                sqlx::query(
                    "INSERT INTO product_categories (product_id, category_id)
                     VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(product.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Update a product. Only non-`None` fields are applied; a present
    /// `category_ids` replaces the full assignment. Returns `None` if no row
    /// with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
        slug: Option<&str>,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                sku = COALESCE($4, sku),
                price = COALESCE($5, price),
                short_description = COALESCE($6, short_description),
                description = COALESCE($7, description),
                specifications = COALESCE($8, specifications),
                tags = COALESCE($9, tags),
                is_active = COALESCE($10, is_active),
                in_stock = COALESCE($11, in_stock),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        let Some(product) = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.sku)
            .bind(input.price)
            .bind(&input.short_description)
            .bind(&input.description)
            .bind(&input.specifications)
            .bind(&input.tags)
            .bind(input.is_active)
            .bind(input.in_stock)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(category_ids) = &input.category_ids {
            sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for &category_id in category_ids {
                sqlx::query(
                    "INSERT INTO product_categories (product_id, category_id)
                     VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    /// Increment the public view counter.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE products SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft-delete a product. Returns `true` if a row was marked inactive.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove a product. The join table and attached media rows
    /// go with it via `ON DELETE CASCADE`. Returns `true` if a row was
    /// deleted.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
