//! Arena-backed DAG storage and traversal.

use std::collections::{HashMap, HashSet, VecDeque};

use vertex_types::{NodeId, NodeStatus};

use crate::error::{InsertError, UpdateError};
use crate::node::DagNode;

/// Append-only store for the transaction DAG.
///
/// Nodes are kept in insertion order in a dense arena; a side index maps
/// ids to arena slots. The tip set (nodes without children) is maintained
/// incrementally on insert.
#[derive(Default)]
pub struct DagStore {
    arena: Vec<DagNode>,
    index: HashMap<NodeId, usize>,
    tips: HashSet<NodeId>,
}

impl DagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node whose parents are already present.
    ///
    /// Assigns the level (`1 + max(parent levels)`, 0 for genesis), links
    /// the node into its parents' children lists, and updates the tip set.
    /// The first node inserted into an empty store is the genesis node and
    /// must have no parents; every later node must have at least one.
    pub fn insert(&mut self, mut node: DagNode) -> Result<(), InsertError> {
        if self.index.contains_key(&node.id) {
            return Err(InsertError::DuplicateId(node.id));
        }
        if node.parents.is_empty() {
            if !self.arena.is_empty() {
                return Err(InsertError::EmptyParents);
            }
            node.level = 0;
        } else {
            // Parents must pre-exist and the id is fresh, so no edge can
            // point forward in insertion order; the only representable
            // cycle is a node naming itself as a parent.
            if node.parents.contains(&node.id) {
                return Err(InsertError::CycleDetected(node.id));
            }
            let mut max_parent_level = 0u64;
            for parent in &node.parents {
                let slot = self
                    .index
                    .get(parent)
                    .copied()
                    .ok_or(InsertError::UnknownParent { parent: *parent })?;
                max_parent_level = max_parent_level.max(self.arena[slot].level);
            }
            node.level = max_parent_level + 1;
        }

        let slot = self.arena.len();
        for parent in &node.parents {
            // Index hit was verified above.
            if let Some(&parent_slot) = self.index.get(parent) {
                let children = &mut self.arena[parent_slot].children;
                if !children.contains(&node.id) {
                    children.push(node.id);
                }
            }
            self.tips.remove(parent);
        }
        self.tips.insert(node.id);
        self.index.insert(node.id, slot);
        tracing::debug!(node = ?node.id, level = node.level, parents = node.parents.len(), "node inserted");
        self.arena.push(node);
        Ok(())
    }

    pub fn get(&self, id: &NodeId) -> Option<&DagNode> {
        self.index.get(id).map(|&slot| &self.arena[slot])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DagNode> {
        self.arena.iter()
    }

    /// Current tips, sorted by id so every caller sees the same order.
    pub fn get_tips(&self) -> Vec<NodeId> {
        let mut tips: Vec<NodeId> = self.tips.iter().copied().collect();
        tips.sort();
        tips
    }

    /// Add endorsement weight to a node. Saturating. Returns the new
    /// accumulated weight.
    pub fn add_weight(&mut self, id: &NodeId, amount: u128) -> Result<u128, UpdateError> {
        let slot = self
            .index
            .get(id)
            .copied()
            .ok_or(UpdateError::UnknownNode(*id))?;
        let node = &mut self.arena[slot];
        node.weight = node.weight.saturating_add(amount);
        Ok(node.weight)
    }

    /// Transition a node's status, enforcing monotonicity.
    pub fn set_status(&mut self, id: &NodeId, status: NodeStatus) -> Result<(), UpdateError> {
        let slot = self
            .index
            .get(id)
            .copied()
            .ok_or(UpdateError::UnknownNode(*id))?;
        let node = &mut self.arena[slot];
        if !node.status.can_transition_to(status) {
            return Err(UpdateError::InvalidTransition {
                from: node.status,
                to: status,
            });
        }
        tracing::debug!(node = ?id, from = ?node.status, to = ?status, "status transition");
        node.status = status;
        Ok(())
    }

    /// Ancestors of `id` in breadth-first order, up to `depth_limit`
    /// generations. Each ancestor is yielded once even when reachable
    /// through several paths. The node itself is not included.
    pub fn ancestors_of(&self, id: &NodeId, depth_limit: usize) -> Ancestors<'_> {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        if let Some(node) = self.get(id) {
            visited.insert(node.id);
            for parent in &node.parents {
                if visited.insert(*parent) {
                    queue.push_back((*parent, 1usize));
                }
            }
        }
        Ancestors {
            store: self,
            queue,
            visited,
            depth_limit,
        }
    }

    /// Whether `ancestor` is reachable from `descendant` by following
    /// parent edges, within `depth_limit` generations.
    pub fn is_ancestor(&self, ancestor: &NodeId, descendant: &NodeId, depth_limit: usize) -> bool {
        self.ancestors_of(descendant, depth_limit)
            .any(|id| id == *ancestor)
    }
}

/// Lazy bounded BFS over parent edges. No recursion; the visited set keeps
/// diamond-shaped ancestry from being yielded twice.
pub struct Ancestors<'a> {
    store: &'a DagStore,
    queue: VecDeque<(NodeId, usize)>,
    visited: HashSet<NodeId>,
    depth_limit: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.queue.pop_front()?;
        if depth < self.depth_limit {
            if let Some(node) = self.store.get(&id) {
                for parent in &node.parents {
                    if self.visited.insert(*parent) {
                        self.queue.push_back((*parent, depth + 1));
                    }
                }
            }
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vertex_types::Timestamp;

    fn id(byte: u8) -> NodeId {
        NodeId::new([byte; 32])
    }

    fn node(byte: u8, parents: Vec<NodeId>) -> DagNode {
        DagNode::new(id(byte), parents, 100, 1.0, vec![], vec![], Timestamp::now())
    }

    /// genesis(0) <- a(1) <- b(2); a <- c(3); b,c <- d(4)
    fn diamond() -> DagStore {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        store.insert(node(1, vec![id(0)])).unwrap();
        store.insert(node(2, vec![id(1)])).unwrap();
        store.insert(node(3, vec![id(1)])).unwrap();
        store.insert(node(4, vec![id(2), id(3)])).unwrap();
        store
    }

    // ── Insertion ────────────────────────────────────────────────────────

    #[test]
    fn genesis_has_level_zero() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        assert_eq!(store.get(&id(0)).unwrap().level, 0);
    }

    #[test]
    fn level_is_one_past_deepest_parent() {
        let store = diamond();
        assert_eq!(store.get(&id(1)).unwrap().level, 1);
        assert_eq!(store.get(&id(2)).unwrap().level, 2);
        assert_eq!(store.get(&id(3)).unwrap().level, 2);
        assert_eq!(store.get(&id(4)).unwrap().level, 3);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        assert_eq!(
            store.insert(node(0, vec![])),
            Err(InsertError::DuplicateId(id(0)))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        assert_eq!(
            store.insert(node(1, vec![id(9)])),
            Err(InsertError::UnknownParent { parent: id(9) })
        );
    }

    #[test]
    fn empty_parents_rejected_after_genesis() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        assert_eq!(store.insert(node(1, vec![])), Err(InsertError::EmptyParents));
    }

    #[test]
    fn self_parent_rejected_as_cycle() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        assert_eq!(
            store.insert(node(1, vec![id(1)])),
            Err(InsertError::CycleDetected(id(1)))
        );
    }

    #[test]
    fn rejected_insert_leaves_store_untouched() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        let tips_before = store.get_tips();
        let _ = store.insert(node(1, vec![id(0), id(9)]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_tips(), tips_before);
    }

    // ── Tips and children ────────────────────────────────────────────────

    #[test]
    fn tips_track_childless_nodes() {
        let store = diamond();
        assert_eq!(store.get_tips(), vec![id(4)]);
    }

    #[test]
    fn tips_are_sorted() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        store.insert(node(3, vec![id(0)])).unwrap();
        store.insert(node(1, vec![id(0)])).unwrap();
        store.insert(node(2, vec![id(0)])).unwrap();
        assert_eq!(store.get_tips(), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn children_linked_on_insert() {
        let store = diamond();
        let a = store.get(&id(1)).unwrap();
        assert_eq!(a.children, vec![id(2), id(3)]);
    }

    #[test]
    fn duplicate_parent_entries_link_one_edge() {
        let mut store = DagStore::new();
        store.insert(node(0, vec![])).unwrap();
        store.insert(node(1, vec![id(0), id(0)])).unwrap();
        assert_eq!(store.get(&id(0)).unwrap().children, vec![id(1)]);
    }

    // ── Mutation ─────────────────────────────────────────────────────────

    #[test]
    fn add_weight_accumulates_and_saturates() {
        let mut store = diamond();
        assert_eq!(store.add_weight(&id(0), 50).unwrap(), 150);
        assert_eq!(store.add_weight(&id(0), u128::MAX).unwrap(), u128::MAX);
    }

    #[test]
    fn add_weight_unknown_node() {
        let mut store = DagStore::new();
        assert_eq!(
            store.add_weight(&id(9), 1),
            Err(UpdateError::UnknownNode(id(9)))
        );
    }

    #[test]
    fn status_transitions_enforced() {
        let mut store = diamond();
        store.set_status(&id(0), NodeStatus::Confirmed).unwrap();
        store.set_status(&id(0), NodeStatus::Final).unwrap();
        assert_eq!(
            store.set_status(&id(0), NodeStatus::Orphaned),
            Err(UpdateError::InvalidTransition {
                from: NodeStatus::Final,
                to: NodeStatus::Orphaned,
            })
        );
    }

    #[test]
    fn pending_can_be_orphaned() {
        let mut store = diamond();
        store.set_status(&id(3), NodeStatus::Orphaned).unwrap();
        assert_eq!(store.get(&id(3)).unwrap().status, NodeStatus::Orphaned);
    }

    // ── Traversal ────────────────────────────────────────────────────────

    #[test]
    fn ancestors_visit_each_node_once() {
        let store = diamond();
        let ancestors: Vec<NodeId> = store.ancestors_of(&id(4), 16).collect();
        assert_eq!(ancestors.len(), 4);
        let mut unique = ancestors.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn ancestors_respect_depth_limit() {
        let store = diamond();
        let ancestors: Vec<NodeId> = store.ancestors_of(&id(4), 1).collect();
        assert_eq!(ancestors.len(), 2); // just b and c
    }

    #[test]
    fn ancestors_of_unknown_node_is_empty() {
        let store = diamond();
        assert_eq!(store.ancestors_of(&id(9), 16).count(), 0);
    }

    #[test]
    fn is_ancestor_follows_parent_edges() {
        let store = diamond();
        assert!(store.is_ancestor(&id(0), &id(4), 16));
        assert!(store.is_ancestor(&id(1), &id(2), 16));
        assert!(!store.is_ancestor(&id(2), &id(3), 16));
        assert!(!store.is_ancestor(&id(4), &id(0), 16));
    }
}
