//! Node & tree primitives (component C1).
//!
//! Grounded on the teacher's tagged-variant `NodeContent` (`Nothing` /
//! `Internal` / `Leaf`): the leaf-vs-internal distinction is an explicit
//! discriminant, never an inheritance hierarchy, per the Design Notes.
//! Parent back-references are arena keys (`Option<u32>`), matching the
//! teacher's `ObjectPool`-indexed `node_children: Vec<NodeChildren<u32>>`.

use crate::coord::{Component, Coord};
use crate::pool::ObjectPool;

pub(crate) type Entry<C, T> = (Coord<C>, T);

/// A node is either a leaf (a bucket of entries) or internal (`2^D`
/// children), never both, never neither (invariant I2).
pub(crate) enum NodeKind<C: Component, T> {
    Leaf(Vec<Entry<C, T>>),
    Internal(Vec<u32>),
}

impl<C: Component, T> Default for NodeKind<C, T> {
    fn default() -> Self {
        NodeKind::Leaf(Vec::new())
    }
}

pub(crate) struct Node<C: Component, T> {
    pub(crate) parent: Option<u32>,
    pub(crate) level: u32,
    pub(crate) kind: NodeKind<C, T>,
}

impl<C: Component, T> Default for Node<C, T> {
    fn default() -> Self {
        Node {
            parent: None,
            level: 0,
            kind: NodeKind::default(),
        }
    }
}

impl<C: Component, T> Node<C, T> {
    pub(crate) fn new_leaf(parent: Option<u32>, level: u32) -> Self {
        Node {
            parent,
            level,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub(crate) fn bucket(&self) -> &[Entry<C, T>] {
        match &self.kind {
            NodeKind::Leaf(b) => b,
            NodeKind::Internal(_) => &[],
        }
    }

    pub(crate) fn bucket_mut(&mut self) -> &mut Vec<Entry<C, T>> {
        match &mut self.kind {
            NodeKind::Leaf(b) => b,
            NodeKind::Internal(_) => panic!("bucket_mut called on an internal node"),
        }
    }

    pub(crate) fn children(&self) -> &[u32] {
        match &self.kind {
            NodeKind::Internal(c) => c,
            NodeKind::Leaf(_) => &[],
        }
    }
}

/// Subtree size: bucket length for a leaf, sum over children for internal.
/// A pure function; the container never caches node sizes (matches the
/// distilled spec's explicit "this is a pure function" note).
pub(crate) fn subtree_size<C: Component, T>(pool: &ObjectPool<Node<C, T>>, key: u32) -> usize {
    match &pool.get(key).kind {
        NodeKind::Leaf(bucket) => bucket.len(),
        NodeKind::Internal(children) => children.iter().map(|&c| subtree_size(pool, c)).sum(),
    }
}

/// Depth-first, left-to-right concatenation of every entry in the subtree
/// rooted at `key` into `out`, moving entries out of the subtree (which is
/// left structurally intact but emptied — callers that need to actually
/// discard the nodes free them separately, as `prune` does).
pub(crate) fn collect<C: Component, T>(pool: &mut ObjectPool<Node<C, T>>, key: u32, out: &mut Vec<Entry<C, T>>) {
    let children = match &mut pool.get_mut(key).kind {
        NodeKind::Leaf(bucket) => {
            out.append(bucket);
            return;
        }
        NodeKind::Internal(children) => children.clone(),
    };
    for child in children {
        collect(pool, child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with<C: Component>(pool: &mut ObjectPool<Node<C, u32>>, entries: Vec<Entry<C, u32>>) -> u32 {
        let key = pool.push(Node::new_leaf(None, 0));
        *pool.get_mut(key).bucket_mut() = entries;
        key
    }

    #[test]
    fn subtree_size_sums_over_children() {
        let mut pool = ObjectPool::<Node<u8, u32>>::with_capacity(4);
        let c0 = leaf_with(&mut pool, vec![(Coord::new(&[0]).unwrap(), 1)]);
        let c1 = leaf_with(&mut pool, vec![(Coord::new(&[1]).unwrap(), 2), (Coord::new(&[1]).unwrap(), 3)]);
        let root = pool.push(Node {
            parent: None,
            level: 1,
            kind: NodeKind::Internal(vec![c0, c1]),
        });
        assert_eq!(subtree_size(&pool, root), 3);
    }

    #[test]
    fn collect_drains_leaves_left_to_right() {
        let mut pool = ObjectPool::<Node<u8, u32>>::with_capacity(4);
        let c0 = leaf_with(&mut pool, vec![(Coord::new(&[0]).unwrap(), 10)]);
        let c1 = leaf_with(&mut pool, vec![(Coord::new(&[1]).unwrap(), 20)]);
        let root = pool.push(Node {
            parent: None,
            level: 1,
            kind: NodeKind::Internal(vec![c0, c1]),
        });
        let mut out = Vec::new();
        collect(&mut pool, root, &mut out);
        assert_eq!(out.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![10, 20]);
        assert!(pool.get(c0).bucket().is_empty());
        assert!(pool.get(c1).bucket().is_empty());
    }
}
