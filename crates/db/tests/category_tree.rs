//! Integration tests for category tree persistence and walks.
//!
//! Exercises the repository layer against a real database:
//! - Sibling ordering for roots/children
//! - Descendant, ancestor, and breadcrumb walks
//! - Nested tree materialization and the forest view
//! - Move with level cascade and the cycle guard
//! - Cascade soft delete and ordered hard delete
//! - Search escaping and uniqueness helpers

use sqlx::PgPool;

use shopkit_core::tree::{self, Adjacency};
use shopkit_core::types::DbId;
use shopkit_db::models::category::{Category, CreateCategory, UpdateCategory};
use shopkit_db::repositories::CategoryRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str, parent_id: Option<DbId>, sort_order: i32) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        slug: None,
        description: None,
        parent_id,
        media_id: None,
        sort_order: Some(sort_order),
        is_active: None,
    }
}

/// Insert a category the way the handler does: slug from the name, level
/// from the parent.
async fn insert(pool: &PgPool, name: &str, parent_id: Option<DbId>, sort_order: i32) -> Category {
    let input = new_category(name, parent_id, sort_order);
    let slug = shopkit_core::slug::slugify(name);
    let level = match parent_id {
        Some(pid) => {
            CategoryRepo::find_by_id(pool, pid)
                .await
                .unwrap()
                .unwrap()
                .level
                + 1
        }
        None => 0,
    };
    CategoryRepo::insert(pool, &input, &slug, level).await.unwrap()
}

/// Seeded fixture:
///
/// ```text
/// Electronics (0)
/// ├── Laptops (1)        sort_order 2
/// └── Phones (1)         sort_order 1
///     └── Smartphones (2)
/// Clothing (0)
/// ```
struct Fixture {
    electronics: Category,
    phones: Category,
    laptops: Category,
    smartphones: Category,
    clothing: Category,
}

async fn seed(pool: &PgPool) -> Fixture {
    let electronics = insert(pool, "Electronics", None, 1).await;
    let clothing = insert(pool, "Clothing", None, 2).await;
    let phones = insert(pool, "Phones", Some(electronics.id), 1).await;
    let laptops = insert(pool, "Laptops", Some(electronics.id), 2).await;
    let smartphones = insert(pool, "Smartphones", Some(phones.id), 1).await;
    Fixture {
        electronics,
        phones,
        laptops,
        smartphones,
        clothing,
    }
}

fn ids(rows: &[Category]) -> Vec<DbId> {
    rows.iter().map(|c| c.id).collect()
}

// ---------------------------------------------------------------------------
// Test: roots and children ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_roots_and_children_in_display_order(pool: PgPool) {
    let f = seed(&pool).await;

    let roots = CategoryRepo::find_roots(&pool).await.unwrap();
    assert_eq!(ids(&roots), vec![f.electronics.id, f.clothing.id]);

    let children = CategoryRepo::find_children(&pool, Some(f.electronics.id))
        .await
        .unwrap();
    assert_eq!(ids(&children), vec![f.phones.id, f.laptops.id]);

    // Leaf nodes have no children.
    let none = CategoryRepo::find_children(&pool, Some(f.smartphones.id))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_flat_active_listing_spans_all_depths(pool: PgPool) {
    let f = seed(&pool).await;

    // Every active row regardless of depth, still in sibling display order.
    let all = CategoryRepo::find_all_active(&pool).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(ids(&all).contains(&f.smartphones.id));

    CategoryRepo::soft_delete_many(&pool, &[f.laptops.id])
        .await
        .unwrap();
    let all = CategoryRepo::find_all_active(&pool).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(!ids(&all).contains(&f.laptops.id));
}

// ---------------------------------------------------------------------------
// Test: descendants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_descendants_exclude_self_and_inactive(pool: PgPool) {
    let f = seed(&pool).await;

    let descendants = CategoryRepo::find_descendants(&pool, f.electronics.id)
        .await
        .unwrap();
    let got = ids(&descendants);
    assert_eq!(got.len(), 3);
    assert!(!got.contains(&f.electronics.id));
    assert!(got.contains(&f.phones.id));
    assert!(got.contains(&f.laptops.id));
    assert!(got.contains(&f.smartphones.id));

    // Deactivating a mid-chain node hides it (and its subtree) from the
    // active-only walk.
    CategoryRepo::soft_delete_many(&pool, &[f.phones.id])
        .await
        .unwrap();
    let descendants = CategoryRepo::find_descendants(&pool, f.electronics.id)
        .await
        .unwrap();
    assert_eq!(ids(&descendants), vec![f.laptops.id]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_id_yields_empty_descendants(pool: PgPool) {
    seed(&pool).await;
    let descendants = CategoryRepo::find_descendants(&pool, 999_999).await.unwrap();
    assert!(descendants.is_empty());
}

// ---------------------------------------------------------------------------
// Test: ancestors and breadcrumb
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_ancestors_and_breadcrumb(pool: PgPool) {
    let f = seed(&pool).await;

    let ancestors = CategoryRepo::find_ancestors(&pool, f.smartphones.id)
        .await
        .unwrap();
    assert_eq!(
        ids(&ancestors),
        vec![f.smartphones.id, f.phones.id, f.electronics.id]
    );

    let breadcrumb = CategoryRepo::breadcrumb(&pool, f.smartphones.id)
        .await
        .unwrap();
    assert_eq!(
        ids(&breadcrumb),
        vec![f.electronics.id, f.phones.id, f.smartphones.id]
    );

    // An inactive ancestor never breaks the chain.
    CategoryRepo::soft_delete_many(&pool, &[f.phones.id])
        .await
        .unwrap();
    let breadcrumb = CategoryRepo::breadcrumb(&pool, f.smartphones.id)
        .await
        .unwrap();
    assert_eq!(
        ids(&breadcrumb),
        vec![f.electronics.id, f.phones.id, f.smartphones.id]
    );

    // Unknown ids yield an empty chain.
    let empty = CategoryRepo::breadcrumb(&pool, 999_999).await.unwrap();
    assert!(empty.is_empty());
}

// ---------------------------------------------------------------------------
// Test: nested tree and forest
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_subtree_materializes_nested(pool: PgPool) {
    let f = seed(&pool).await;

    let tree = CategoryRepo::find_descendants_as_tree(&pool, f.electronics.id)
        .await
        .unwrap()
        .expect("electronics subtree");
    assert_eq!(tree.category.id, f.electronics.id);
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[0].category.id, f.phones.id);
    assert_eq!(tree.children[0].children[0].category.id, f.smartphones.id);
    assert_eq!(tree.children[1].category.id, f.laptops.id);
    assert!(tree.children[1].children.is_empty());

    let missing = CategoryRepo::find_descendants_as_tree(&pool, 999_999)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_forest_respects_active_flag(pool: PgPool) {
    let f = seed(&pool).await;
    CategoryRepo::soft_delete_many(&pool, &[f.clothing.id])
        .await
        .unwrap();

    let active = CategoryRepo::full_forest(&pool, true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].category.id, f.electronics.id);

    let all = CategoryRepo::full_forest(&pool, false).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: move with level cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_move_recomputes_subtree_levels(pool: PgPool) {
    let f = seed(&pool).await;

    // Move Phones (level 1, one child at level 2) under Clothing.
    let subtree = CategoryRepo::collect_subtree(&pool, f.phones.id)
        .await
        .unwrap();
    let adj = Adjacency::build(&subtree);
    assert!(!adj.would_create_cycle(f.phones.id, Some(f.clothing.id)));

    let new_level = f.clothing.level + 1;
    let plan = adj.level_plan(f.phones.id, new_level);
    CategoryRepo::move_subtree(&pool, f.phones.id, Some(f.clothing.id), &plan)
        .await
        .unwrap();

    let phones = CategoryRepo::find_by_id(&pool, f.phones.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(phones.parent_id, Some(f.clothing.id));
    assert_eq!(phones.level, 1);

    let smartphones = CategoryRepo::find_by_id(&pool, f.smartphones.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(smartphones.parent_id, Some(f.phones.id));
    assert_eq!(smartphones.level, 2);

    // Electronics lost the branch.
    let children = CategoryRepo::find_children(&pool, Some(f.electronics.id))
        .await
        .unwrap();
    assert_eq!(ids(&children), vec![f.laptops.id]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_move_to_root_zeroes_levels(pool: PgPool) {
    let f = seed(&pool).await;

    let subtree = CategoryRepo::collect_subtree(&pool, f.phones.id)
        .await
        .unwrap();
    let adj = Adjacency::build(&subtree);
    let plan = adj.level_plan(f.phones.id, 0);
    CategoryRepo::move_subtree(&pool, f.phones.id, None, &plan)
        .await
        .unwrap();

    let phones = CategoryRepo::find_by_id(&pool, f.phones.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(phones.parent_id, None);
    assert_eq!(phones.level, 0);

    let smartphones = CategoryRepo::find_by_id(&pool, f.smartphones.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(smartphones.level, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_cycle_guard_rejects_descendant_parent(pool: PgPool) {
    let f = seed(&pool).await;

    let subtree = CategoryRepo::collect_subtree(&pool, f.electronics.id)
        .await
        .unwrap();
    let adj = Adjacency::build(&subtree);

    // Under itself, under a child, under a grandchild: all cycles.
    assert!(adj.would_create_cycle(f.electronics.id, Some(f.electronics.id)));
    assert!(adj.would_create_cycle(f.electronics.id, Some(f.phones.id)));
    assert!(adj.would_create_cycle(f.electronics.id, Some(f.smartphones.id)));

    // A sibling branch is fine.
    assert!(!adj.would_create_cycle(f.electronics.id, Some(f.clothing.id)));
}

// ---------------------------------------------------------------------------
// Test: soft and hard delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_cascade_soft_delete_spans_inactive_rows(pool: PgPool) {
    let f = seed(&pool).await;

    // Pre-deactivate a mid-chain node; the cascade working set must still
    // include its subtree.
    CategoryRepo::soft_delete_many(&pool, &[f.phones.id])
        .await
        .unwrap();

    let subtree = CategoryRepo::collect_subtree(&pool, f.electronics.id)
        .await
        .unwrap();
    assert_eq!(subtree.len(), 4);

    let deactivated = CategoryRepo::soft_delete_many(&pool, &ids(&subtree))
        .await
        .unwrap();
    assert_eq!(deactivated, 4);

    // All rows survive, just inactive.
    for id in ids(&subtree) {
        let row = CategoryRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert!(!row.is_active);
    }
    assert!(CategoryRepo::find_roots(&pool).await.unwrap().len() == 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_hard_delete_deepest_first(pool: PgPool) {
    let f = seed(&pool).await;

    let subtree = CategoryRepo::collect_subtree(&pool, f.electronics.id)
        .await
        .unwrap();
    let levelled: Vec<(DbId, i32)> = subtree.iter().map(|c| (c.id, c.level)).collect();
    let order = tree::deepest_first(&levelled);

    let deleted = CategoryRepo::hard_delete_ordered(&pool, &order)
        .await
        .unwrap();
    assert_eq!(deleted, 4);

    assert!(CategoryRepo::find_by_id(&pool, f.electronics.id)
        .await
        .unwrap()
        .is_none());
    assert!(CategoryRepo::find_by_id(&pool, f.smartphones.id)
        .await
        .unwrap()
        .is_none());

    // The other root is untouched.
    assert!(CategoryRepo::find_by_id(&pool, f.clothing.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_parent_first_delete_hits_restrict(pool: PgPool) {
    let f = seed(&pool).await;

    // Deleting a parent before its children violates the self-referencing
    // RESTRICT foreign key; the transaction rolls back.
    let result =
        CategoryRepo::hard_delete_ordered(&pool, &[f.electronics.id, f.phones.id]).await;
    assert!(result.is_err());

    assert!(CategoryRepo::find_by_id(&pool, f.electronics.id)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: update scope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_never_touches_parentage(pool: PgPool) {
    let f = seed(&pool).await;

    let input = UpdateCategory {
        name: Some("Mobile Phones".to_string()),
        slug: None,
        description: Some("Handsets and accessories".to_string()),
        media_id: None,
        sort_order: Some(9),
        is_active: None,
    };
    let updated = CategoryRepo::update(&pool, f.phones.id, &input, Some("mobile-phones"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Mobile Phones");
    assert_eq!(updated.slug, "mobile-phones");
    assert_eq!(updated.sort_order, 9);
    assert_eq!(updated.parent_id, Some(f.electronics.id));
    assert_eq!(updated.level, 1);

    let missing = CategoryRepo::update(&pool, 999_999, &input, None)
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: search and uniqueness helpers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_search_escapes_like_wildcards(pool: PgPool) {
    seed(&pool).await;
    insert(&pool, "100% Cotton", None, 5).await;

    let hits = CategoryRepo::search(&pool, "100%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% Cotton");

    // A bare wildcard matches nothing rather than everything.
    let hits = CategoryRepo::search(&pool, "_______").await.unwrap();
    assert!(hits.is_empty());

    let hits = CategoryRepo::search(&pool, "phone").await.unwrap();
    assert_eq!(hits.len(), 2); // Phones, Smartphones
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_name_uniqueness_is_active_scoped(pool: PgPool) {
    let f = seed(&pool).await;

    assert!(
        CategoryRepo::active_name_exists(&pool, "Phones", None)
            .await
            .unwrap()
    );
    // The row itself is excluded during updates.
    assert!(
        !CategoryRepo::active_name_exists(&pool, "Phones", Some(f.phones.id))
            .await
            .unwrap()
    );

    // An inactive row frees its name but not its slug.
    CategoryRepo::soft_delete_many(&pool, &[f.phones.id])
        .await
        .unwrap();
    assert!(
        !CategoryRepo::active_name_exists(&pool, "Phones", None)
            .await
            .unwrap()
    );
    assert!(CategoryRepo::slug_exists(&pool, "phones", None).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_slug_hits_unique_constraint(pool: PgPool) {
    let f = seed(&pool).await;

    let input = new_category("Telephones", None, 3);
    let result = CategoryRepo::insert(&pool, &input, &f.phones.slug, 0).await;
    match result {
        Err(sqlx::Error::Database(db_err)) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_categories_slug"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}
