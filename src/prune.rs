//! Top-down re-collapse after deletions (component C4).
//!
//! Grounded on the teacher's post-erase cleanup pass over `node_children`
//! that walks back up re-deriving whether an ancestor can still justify
//! staying `Internal`; generalized here from a single-path bottom-up walk
//! into the full top-down recollapse the container needs after arbitrary
//! erases, since a deletion can shrink any number of sibling subtrees at
//! once.

use crate::coord::Component;
use crate::node::{self, NodeKind};
use crate::CMap;

impl<C, T, F> CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    /// Re-collapses every subtree whose total entry count has fallen to
    /// `2^D` or fewer into a single leaf. Idempotent: running it twice in a
    /// row is the same as running it once.
    pub fn prune(&mut self) {
        self.prune_node(self.root);
    }

    fn prune_node(&mut self, key: u32) {
        if self.pool.get(key).is_leaf() {
            return;
        }

        let capacity = 1usize << self.dim;
        if node::subtree_size(&self.pool, key) <= capacity {
            let mut merged = Vec::with_capacity(capacity);
            node::collect(&mut self.pool, key, &mut merged);

            let children = match &self.pool.get(key).kind {
                NodeKind::Internal(children) => children.clone(),
                NodeKind::Leaf(_) => unreachable!("just checked this node is internal"),
            };
            for child in children {
                self.pool.pop(child);
            }

            self.pool.get_mut(key).kind = NodeKind::Leaf(merged);
            return;
        }

        let children = match &self.pool.get(key).kind {
            NodeKind::Internal(children) => children.clone(),
            NodeKind::Leaf(_) => unreachable!("just checked this node is internal"),
        };
        for child in children {
            self.prune_node(child);
        }
    }
}
