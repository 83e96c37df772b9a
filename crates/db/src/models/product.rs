//! Product entity models and DTOs.
//!
//! Products link to categories through the `product_categories` join table.
//! Prices are stored in minor currency units (`BIGINT`).

use serde::{Deserialize, Serialize};
use shopkit_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub sku: Option<String>,
    pub price: Option<i64>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub view_count: i32,
    pub is_active: bool,
    pub in_stock: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub in_stock: Option<bool>,
    /// Categories to assign the product to.
    pub category_ids: Option<Vec<DbId>>,
}

/// DTO for updating an existing product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub in_stock: Option<bool>,
    /// Replaces the full category assignment when present.
    pub category_ids: Option<Vec<DbId>>,
}

/// Query parameters for product listing.
///
/// `category_id` matches products in that category or any of its
/// descendants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilterParams {
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub in_stock: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
