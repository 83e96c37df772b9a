//! Category entity models and DTOs.
//!
//! Categories form a forest: `parent_id` is a nullable self-reference and
//! `level` caches the depth from the root (root = 0). `level` is derived
//! state -- it is assigned on create and recomputed for a whole subtree on
//! move, never written directly by callers.

use serde::{Deserialize, Serialize};
use shopkit_core::tree;
use shopkit_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub media_id: Option<DbId>,
    pub sort_order: i32,
    pub level: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl tree::Node for Category {
    fn id(&self) -> DbId {
        self.id
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
}

/// A category with its materialized children, for nested tree responses.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryTree>,
}

/// DTO for creating a new category.
///
/// `slug` is derived from `name` when omitted; `level` is always computed
/// from the parent and cannot be supplied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub media_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating an existing category.
///
/// Parentage is deliberately absent: re-parenting goes through the move
/// operation so the level cascade always runs.
///
/// `None` means "leave unchanged", which makes clearing a nullable field
/// (`description`, `media_id`) impossible through an update; callers that
/// need to detach media or blank a description must write a replacement
/// value. Supporting an explicit clear would take a double-`Option` here
/// and in the repository's COALESCE query.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub media_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for moving a category to a new parent (`None` = make it a root).
#[derive(Debug, Clone, Deserialize)]
pub struct MoveCategory {
    pub parent_id: Option<DbId>,
}

/// Query parameters for delete endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteCategoryParams {
    #[serde(default)]
    pub cascade: bool,
}
