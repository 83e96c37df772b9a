//! Category tree algorithms.
//!
//! Categories are stored as rows with a nullable parent pointer. Rather than
//! issuing one query per tree step, callers fetch a snapshot of rows once,
//! build an [`Adjacency`] index over it, and run every walk in memory at
//! O(n). All walks are iterative with explicit work lists, so tree depth is
//! bounded only by data, never by the call stack.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

/// Minimal view of a category row needed by the tree algorithms.
pub trait Node {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// A nested subtree of category ids.
///
/// Children appear in the same order as the snapshot rows, so a snapshot
/// fetched ordered by (sort_order, name) yields display-ordered trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    pub id: DbId,
    pub children: Vec<Subtree>,
}

/// Adjacency index over a snapshot of category rows.
///
/// Built once per operation. Children buckets preserve snapshot row order.
pub struct Adjacency {
    children: HashMap<Option<DbId>, Vec<DbId>>,
    parents: HashMap<DbId, Option<DbId>>,
}

impl Adjacency {
    /// Build the index from a snapshot of rows.
    pub fn build<N: Node>(nodes: &[N]) -> Self {
        let mut children: HashMap<Option<DbId>, Vec<DbId>> = HashMap::new();
        let mut parents = HashMap::with_capacity(nodes.len());
        for node in nodes {
            parents.insert(node.id(), node.parent_id());
            children.entry(node.parent_id()).or_default().push(node.id());
        }
        Self { children, parents }
    }

    /// Whether the snapshot contains a row with this id.
    pub fn contains(&self, id: DbId) -> bool {
        self.parents.contains_key(&id)
    }

    /// Direct children of `parent`, in snapshot order. `None` means roots.
    pub fn children_of(&self, parent: Option<DbId>) -> &[DbId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Root ids (rows with no parent), in snapshot order.
    pub fn root_ids(&self) -> &[DbId] {
        self.children_of(None)
    }

    /// Number of direct children of `id`.
    pub fn child_count(&self, id: DbId) -> usize {
        self.children_of(Some(id)).len()
    }

    /// The transitive closure of children below `id`, excluding `id` itself.
    ///
    /// Iterative with an explicit frontier; an unknown id yields an empty
    /// list rather than an error.
    pub fn descendant_ids(&self, id: DbId) -> Vec<DbId> {
        let mut out = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for &child in self.children_of(Some(current)) {
                out.push(child);
                frontier.push(child);
            }
        }
        out
    }

    /// The chain from `id` up to its root, inclusive of `id` itself:
    /// `[id, parent, ..., root]`. Unknown ids yield an empty list.
    ///
    /// A visited set guards the upward walk so corrupt data containing a
    /// parent cycle terminates instead of looping.
    pub fn ancestor_ids(&self, id: DbId) -> Vec<DbId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(c) = current {
            if !self.contains(c) || !seen.insert(c) {
                break;
            }
            out.push(c);
            current = self.parents.get(&c).copied().flatten();
        }
        out
    }

    /// Root-first ancestor path for display: `[root, ..., id]`.
    pub fn breadcrumb_ids(&self, id: DbId) -> Vec<DbId> {
        let mut out = self.ancestor_ids(id);
        out.reverse();
        out
    }

    /// Whether re-parenting `id` under `new_parent` would make `id` its own
    /// ancestor. Moving a node under itself or under any of its descendants
    /// is a cycle.
    pub fn would_create_cycle(&self, id: DbId, new_parent: Option<DbId>) -> bool {
        match new_parent {
            None => false,
            Some(p) if p == id => true,
            Some(p) => self.descendant_ids(id).contains(&p),
        }
    }

    /// Materialize the subtree rooted at `root`, or `None` for unknown ids.
    ///
    /// Assembled bottom-up from an iterative pre-order walk so arbitrarily
    /// deep trees never recurse.
    pub fn subtree(&self, root: DbId) -> Option<Subtree> {
        if !self.contains(root) {
            return None;
        }

        // Pre-order id list (parent before children, children in order).
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            order.push(current);
            // Reverse so the leftmost child is popped first.
            for &child in self.children_of(Some(current)).iter().rev() {
                stack.push(child);
            }
        }

        // Walking pre-order backwards guarantees every child is built before
        // its parent collects it.
        let mut built: HashMap<DbId, Subtree> = HashMap::with_capacity(order.len());
        for &id in order.iter().rev() {
            let children = self
                .children_of(Some(id))
                .iter()
                .filter_map(|c| built.remove(c))
                .collect();
            built.insert(id, Subtree { id, children });
        }
        built.remove(&root)
    }

    /// Materialize every root's full subtree, in snapshot order.
    pub fn forest(&self) -> Vec<Subtree> {
        self.root_ids()
            .iter()
            .filter_map(|&root| self.subtree(root))
            .collect()
    }

    /// Compute the levels a move must persist: the moved node at
    /// `new_level`, and every transitive descendant at its parent's new
    /// level + 1.
    ///
    /// Returned pairs are ordered parent-before-child, so applying them in
    /// order never leaves a child's level computed from a stale parent.
    pub fn level_plan(&self, moved: DbId, new_level: i32) -> Vec<(DbId, i32)> {
        let mut plan = Vec::new();
        let mut frontier = vec![(moved, new_level)];
        while let Some((id, level)) = frontier.pop() {
            plan.push((id, level));
            for &child in self.children_of(Some(id)) {
                frontier.push((child, level + 1));
            }
        }
        plan
    }
}

/// Order subtree rows for hard deletion: deepest level first, so no delete
/// is ever blocked by a surviving child row referencing its parent.
pub fn deepest_first(rows: &[(DbId, i32)]) -> Vec<DbId> {
    let mut sorted: Vec<(DbId, i32)> = rows.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: DbId,
        parent_id: Option<DbId>,
    }

    impl Node for Row {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
    }

    fn row(id: DbId, parent_id: Option<DbId>) -> Row {
        Row { id, parent_id }
    }

    /// Forest used across tests:
    ///
    /// 1 (root)        6 (root)
    /// ├── 2           └── 7
    /// │   ├── 4
    /// │   └── 5
    /// └── 3
    fn sample() -> Vec<Row> {
        vec![
            row(1, None),
            row(2, Some(1)),
            row(3, Some(1)),
            row(4, Some(2)),
            row(5, Some(2)),
            row(6, None),
            row(7, Some(6)),
        ]
    }

    #[test]
    fn roots_and_children_preserve_snapshot_order() {
        let adj = Adjacency::build(&sample());
        assert_eq!(adj.root_ids(), &[1, 6]);
        assert_eq!(adj.children_of(Some(1)), &[2, 3]);
        assert_eq!(adj.children_of(Some(2)), &[4, 5]);
        assert_eq!(adj.children_of(Some(4)), &[] as &[DbId]);
    }

    #[test]
    fn descendants_cover_the_whole_subtree() {
        let adj = Adjacency::build(&sample());
        let mut ids = adj.descendant_ids(1);
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert!(adj.descendant_ids(4).is_empty());
    }

    #[test]
    fn descendants_of_unknown_id_are_empty() {
        let adj = Adjacency::build(&sample());
        assert!(adj.descendant_ids(99).is_empty());
    }

    #[test]
    fn descendants_are_idempotent_as_a_set() {
        let adj = Adjacency::build(&sample());
        let mut first = adj.descendant_ids(1);
        let mut second = adj.descendant_ids(1);
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first, second);
    }

    #[test]
    fn ancestors_walk_upward_including_self() {
        let adj = Adjacency::build(&sample());
        assert_eq!(adj.ancestor_ids(4), vec![4, 2, 1]);
        assert_eq!(adj.ancestor_ids(1), vec![1]);
        assert!(adj.ancestor_ids(99).is_empty());
    }

    #[test]
    fn breadcrumb_is_reversed_ancestors() {
        let adj = Adjacency::build(&sample());
        let mut ancestors = adj.ancestor_ids(4);
        ancestors.reverse();
        assert_eq!(adj.breadcrumb_ids(4), ancestors);
        assert_eq!(adj.breadcrumb_ids(4), vec![1, 2, 4]);
    }

    #[test]
    fn ancestor_walk_terminates_on_corrupt_parent_cycle() {
        let adj = Adjacency::build(&[row(1, Some(2)), row(2, Some(1))]);
        let chain = adj.ancestor_ids(1);
        assert_eq!(chain, vec![1, 2]);
    }

    #[test]
    fn cycle_guard_rejects_self_and_descendants() {
        let adj = Adjacency::build(&sample());
        assert!(adj.would_create_cycle(1, Some(1)));
        assert!(adj.would_create_cycle(1, Some(4)));
        assert!(adj.would_create_cycle(2, Some(5)));
        assert!(!adj.would_create_cycle(2, Some(6)));
        assert!(!adj.would_create_cycle(2, None));
    }

    #[test]
    fn subtree_materializes_nested_children_in_order() {
        let adj = Adjacency::build(&sample());
        let tree = adj.subtree(1).unwrap();
        assert_eq!(tree.id, 1);
        assert_eq!(
            tree.children.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(
            tree.children[0]
                .children
                .iter()
                .map(|c| c.id)
                .collect::<Vec<_>>(),
            vec![4, 5]
        );
        assert!(adj.subtree(99).is_none());
    }

    #[test]
    fn forest_covers_every_root() {
        let adj = Adjacency::build(&sample());
        let forest = adj.forest();
        assert_eq!(forest.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 6]);
        assert_eq!(forest[1].children[0].id, 7);
    }

    #[test]
    fn subtree_handles_deep_chains_without_recursion() {
        // 10k-deep chain; would overflow the stack if walks recursed.
        let rows: Vec<Row> = (0..10_000)
            .map(|i| row(i, if i == 0 { None } else { Some(i - 1) }))
            .collect();
        let adj = Adjacency::build(&rows);
        assert_eq!(adj.descendant_ids(0).len(), 9_999);
        assert_eq!(adj.ancestor_ids(9_999).len(), 10_000);
        let plan = adj.level_plan(0, 0);
        assert_eq!(plan.len(), 10_000);
        let tree = adj.subtree(0).unwrap();
        assert_eq!(tree.id, 0);
    }

    #[test]
    fn level_plan_relevels_the_whole_subtree() {
        // Root 1 (level 0) -> 2 (1) -> 4,5 (2). Moving 2 to the root level
        // must set 2 to 0 and its children to 1.
        let adj = Adjacency::build(&sample());
        let plan = adj.level_plan(2, 0);
        let levels: HashMap<DbId, i32> = plan.iter().copied().collect();
        assert_eq!(levels[&2], 0);
        assert_eq!(levels[&4], 1);
        assert_eq!(levels[&5], 1);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn level_plan_orders_parents_before_children() {
        let adj = Adjacency::build(&sample());
        let plan = adj.level_plan(1, 5);
        let pos: HashMap<DbId, usize> =
            plan.iter().enumerate().map(|(i, (id, _))| (*id, i)).collect();
        assert!(pos[&1] < pos[&2]);
        assert!(pos[&2] < pos[&4]);
        assert!(pos[&2] < pos[&5]);
        assert!(pos[&1] < pos[&3]);
    }

    #[test]
    fn deepest_first_orders_descendants_before_ancestors() {
        let order = deepest_first(&[(1, 0), (2, 1), (4, 2), (5, 2)]);
        assert_eq!(*order.last().unwrap(), 1);
        assert!(order[0] == 4 || order[0] == 5);
        let pos = |id: DbId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(4) < pos(2));
        assert!(pos(5) < pos(2));
        assert!(pos(2) < pos(1));
    }
}
