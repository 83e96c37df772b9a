//! Repository for the category tree.
//!
//! Tree walks never query row-by-row: each operation fetches one ordered
//! snapshot of the table, builds an [`Adjacency`] index over it, and runs
//! the walk in memory. Mutations that touch a whole subtree (the move level
//! cascade, hard-delete row removal) run inside a single transaction.

use std::collections::HashMap;

use sqlx::PgPool;

use shopkit_core::tree::{self, Adjacency, Subtree};
use shopkit_core::types::DbId;

use crate::models::category::{Category, CategoryTree, CreateCategory, UpdateCategory};

/// Column list for `categories` queries.
const CATEGORY_COLUMNS: &str = "\
    id, name, slug, description, parent_id, media_id, \
    sort_order, level, is_active, created_at, updated_at";

/// Sibling display ordering used by every tree-facing query.
const SIBLING_ORDER: &str = "sort_order ASC, name ASC";

/// Provides persistence and tree queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // Row lookups
    // -----------------------------------------------------------------------

    /// Find a category by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1 AND is_active = TRUE"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All categories for admin listings, newest first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Whether an active category already uses this name.
    ///
    /// Name uniqueness is an application-level rule over active rows only;
    /// `exclude_id` lets updates skip the row being updated.
    pub async fn active_name_exists(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM categories
             WHERE name = $1 AND is_active = TRUE AND ($2::BIGINT IS NULL OR id <> $2)
             LIMIT 1",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// Whether any category (active or not) already uses this slug.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM categories
             WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             LIMIT 1",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// The subset of `ids` that exist, in no particular order. Used to
    /// validate product category assignments before writing.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM categories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Number of direct children, counting inactive rows too -- the delete
    /// gates must see soft-deleted children that still reference the parent.
    pub async fn count_children(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Whether the category has any direct children.
    pub async fn has_children(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(Self::count_children(pool, id).await? > 0)
    }

    // -----------------------------------------------------------------------
    // Tree queries
    // -----------------------------------------------------------------------

    /// Fetch the snapshot every tree walk runs over, in sibling display
    /// order. `active_only` restricts to active rows (the storefront view);
    /// mutation cascades always work on the full table.
    async fn snapshot(pool: &PgPool, active_only: bool) -> Result<Vec<Category>, sqlx::Error> {
        let filter = if active_only {
            "WHERE is_active = TRUE"
        } else {
            ""
        };
        let query =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories {filter} ORDER BY {SIBLING_ORDER}");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Every active category, whatever its depth, in sibling display order.
    pub async fn find_all_active(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        Self::snapshot(pool, true).await
    }

    /// Active root categories in sibling display order.
    pub async fn find_roots(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        Self::find_children(pool, None).await
    }

    /// Active direct children of `parent_id` (`None` = roots), in sibling
    /// display order.
    pub async fn find_children(
        pool: &PgPool,
        parent_id: Option<DbId>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE parent_id IS NOT DISTINCT FROM $1::BIGINT AND is_active = TRUE
             ORDER BY {SIBLING_ORDER}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Every active transitive descendant of `id`, excluding `id` itself.
    /// Unknown ids yield an empty list.
    pub async fn find_descendants(pool: &PgPool, id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let rows = Self::snapshot(pool, true).await?;
        let adj = Adjacency::build(&rows);
        let ids = adj.descendant_ids(id);
        Ok(Self::pick(rows, &ids))
    }

    /// Active descendant ids of `id` including `id` itself -- the set the
    /// product catalog filters by for "category including subcategories".
    pub async fn descendant_ids_inclusive(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows = Self::snapshot(pool, true).await?;
        let adj = Adjacency::build(&rows);
        let mut ids = vec![id];
        ids.extend(adj.descendant_ids(id));
        Ok(ids)
    }

    /// The subtree rooted at `id` as a nested structure, restricted to
    /// active rows. `None` when `id` is unknown or inactive.
    pub async fn find_descendants_as_tree(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryTree>, sqlx::Error> {
        let rows = Self::snapshot(pool, true).await?;
        let adj = Adjacency::build(&rows);
        let Some(sub) = adj.subtree(id) else {
            return Ok(None);
        };
        let mut by_id = Self::index_rows(rows);
        Ok(Self::materialize(sub, &mut by_id))
    }

    /// The chain from `id` up to its root, inclusive: `[id, ..., root]`.
    ///
    /// Walks the full table so an inactive ancestor never breaks the chain.
    /// Unknown ids yield an empty list.
    pub async fn find_ancestors(pool: &PgPool, id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let rows = Self::snapshot(pool, false).await?;
        let adj = Adjacency::build(&rows);
        let ids = adj.ancestor_ids(id);
        Ok(Self::pick(rows, &ids))
    }

    /// Root-first ancestor path for navigational display: `[root, ..., id]`.
    /// Unknown ids yield an empty list; the handler turns that into NotFound.
    pub async fn breadcrumb(pool: &PgPool, id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let mut chain = Self::find_ancestors(pool, id).await?;
        chain.reverse();
        Ok(chain)
    }

    /// Every root expanded into its full descendant tree. `active_only`
    /// restricts both roots and descendants to active rows.
    pub async fn full_forest(
        pool: &PgPool,
        active_only: bool,
    ) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let rows = Self::snapshot(pool, active_only).await?;
        let adj = Adjacency::build(&rows);
        let subtrees = adj.forest();
        let mut by_id = Self::index_rows(rows);
        Ok(subtrees
            .into_iter()
            .filter_map(|sub| Self::materialize(sub, &mut by_id))
            .collect())
    }

    /// Case-insensitive substring search over name and description among
    /// active categories.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<Category>, sqlx::Error> {
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE is_active = TRUE AND (name ILIKE $1 OR description ILIKE $1)
             ORDER BY {SIBLING_ORDER}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// The target row plus every transitive descendant, active or not --
    /// the working set for delete cascades and the move cycle guard.
    /// Empty when `id` is unknown.
    pub async fn collect_subtree(pool: &PgPool, id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let rows = Self::snapshot(pool, false).await?;
        let adj = Adjacency::build(&rows);
        if !adj.contains(id) {
            return Ok(Vec::new());
        }
        let mut ids = vec![id];
        ids.extend(adj.descendant_ids(id));
        Ok(Self::pick(rows, &ids))
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert a new category. `slug` and `level` are computed by the caller
    /// (slug derivation and parent lookup happen before any write).
    pub async fn insert(
        pool: &PgPool,
        input: &CreateCategory,
        slug: &str,
        level: i32,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories
                (name, slug, description, parent_id, media_id, sort_order, level, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(input.description.as_deref())
            .bind(input.parent_id)
            .bind(input.media_id)
            .bind(input.sort_order.unwrap_or(0))
            .bind(level)
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// Update a category's fields. Only non-`None` fields are applied, so
    /// nullable columns cannot be cleared here (see
    /// [`UpdateCategory`](crate::models::category::UpdateCategory)).
    /// Never touches `parent_id` or `level`; that is [`Self::move_subtree`]'s
    /// job. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
        slug: Option<&str>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                media_id = COALESCE($5, media_id),
                sort_order = COALESCE($6, sort_order),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.media_id)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Re-parent `id` and apply the level cascade for its whole subtree in
    /// one transaction.
    ///
    /// `plan` comes from [`Adjacency::level_plan`] and is ordered
    /// parent-before-child, so each row's level is written after its
    /// parent's.
    pub async fn move_subtree(
        pool: &PgPool,
        id: DbId,
        new_parent_id: Option<DbId>,
        plan: &[(DbId, i32)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE categories SET parent_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(new_parent_id)
            .execute(&mut *tx)
            .await?;

        for &(node_id, level) in plan {
            sqlx::query("UPDATE categories SET level = $2 WHERE id = $1")
                .bind(node_id)
                .bind(level)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    /// Soft-delete a set of categories. Returns the number of rows marked
    /// inactive.
    pub async fn soft_delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET is_active = FALSE, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete rows in the given order inside one transaction.
    ///
    /// Callers pass ids ordered deepest level first (see
    /// [`tree::deepest_first`]) so the self-referencing foreign key never
    /// blocks a delete.
    pub async fn hard_delete_ordered(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut deleted = 0;
        for &id in ids {
            let result = sqlx::query("DELETE FROM categories WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            deleted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Snapshot helpers
    // -----------------------------------------------------------------------

    fn index_rows(rows: Vec<Category>) -> HashMap<DbId, Category> {
        rows.into_iter().map(|c| (c.id, c)).collect()
    }

    /// Select rows by id, in the order of `ids`.
    fn pick(rows: Vec<Category>, ids: &[DbId]) -> Vec<Category> {
        let mut by_id = Self::index_rows(rows);
        ids.iter().filter_map(|id| by_id.remove(id)).collect()
    }

    /// Turn an id [`Subtree`] into a [`CategoryTree`] carrying full rows.
    ///
    /// Iterative like the walks in `shopkit_core::tree`: flatten to
    /// pre-order, then assemble bottom-up.
    fn materialize(sub: Subtree, by_id: &mut HashMap<DbId, Category>) -> Option<CategoryTree> {
        let root_id = sub.id;

        let mut order: Vec<(DbId, Vec<DbId>)> = Vec::new();
        let mut stack = vec![sub];
        while let Some(node) = stack.pop() {
            let child_ids: Vec<DbId> = node.children.iter().map(|c| c.id).collect();
            order.push((node.id, child_ids));
            for child in node.children.into_iter().rev() {
                stack.push(child);
            }
        }

        let mut built: HashMap<DbId, CategoryTree> = HashMap::with_capacity(order.len());
        for (id, child_ids) in order.iter().rev() {
            let children = child_ids.iter().filter_map(|c| built.remove(c)).collect();
            let category = by_id.remove(id)?;
            built.insert(*id, CategoryTree { category, children });
        }
        built.remove(&root_id)
    }
}
