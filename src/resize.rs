//! Resize engine (component C3): halve every coordinate axis and fuse
//! payloads whose quotient coordinates coincide.
//!
//! There is no direct analogue of this in the teacher's octree — the
//! closest shape is the bottom-up "re-derive parent state from children"
//! walk in `clear_at_lod`'s post-processing loop, generalized here from a
//! single root-to-leaf path into a full top-down recursion that also has to
//! perform the level-1 collapse the distilled spec calls out as the
//! structurally interesting case.

use crate::coord::Component;
use crate::node::NodeKind;
use crate::CMap;

impl<C, T, F> CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    /// Shifts every stored coordinate right by one bit component-wise,
    /// fusing entries whose shifted coordinates collide. A single logical
    /// step: either it runs to completion (incrementing `num_resizes()` by
    /// exactly one) or it panics, there is no partially-resized state to
    /// observe.
    pub fn resize(&mut self) {
        let fused = self.resize_node(self.root);
        self.len -= fused;
        self.resizes = self.resizes.saturating_add(1);
    }

    fn resize_node(&mut self, key: u32) -> usize {
        if self.pool.get(key).is_leaf() {
            return self.resize_leaf(key);
        }
        let level = self.pool.get(key).level;
        let fused = if level > 1 {
            let children = self.pool.get(key).children().to_vec();
            children.into_iter().map(|c| self.resize_node(c)).sum()
        } else {
            self.collapse(key)
        };
        self.pool.get_mut(key).level = level.saturating_sub(1);
        fused
    }

    /// Shifts every entry's coordinate right by one, then merges any
    /// entries whose shifted coordinates now collide. The survivor of each
    /// collision group is the earlier entry in the bucket's current order —
    /// `merge` is called as `merge(survivor, later)`, matching the
    /// accumulator role the first insertion of a coordinate plays elsewhere
    /// in the container.
    fn resize_leaf(&mut self, key: u32) -> usize {
        let level = self.pool.get(key).level;
        let bucket = self.pool.get_mut(key).bucket_mut();
        for entry in bucket.iter_mut() {
            entry.0 = entry.0.shr1();
        }

        let mut fused = 0;
        let mut head = 0;
        while head < bucket.len() {
            let mut tail = head + 1;
            while tail < bucket.len() {
                if bucket[tail].0 == bucket[head].0 {
                    let (_, later) = bucket.remove(tail);
                    (self.merge)(&mut bucket[head].1, later);
                    fused += 1;
                } else {
                    tail += 1;
                }
            }
            head += 1;
        }

        self.pool.get_mut(key).level = level.saturating_sub(1);
        fused
    }

    /// Collapses a level-1 internal node (whose `2^D` children are all
    /// leaves) into a single leaf at level 0. Every non-empty child
    /// contributes exactly one survivor entry: post-shift, every coordinate
    /// within a child is pairwise identical (they agreed on every bit
    /// except the one that selected the child, and that bit is now gone),
    /// so the child's whole bucket fuses into its first entry.
    fn collapse(&mut self, key: u32) -> usize {
        let children = match &self.pool.get(key).kind {
            NodeKind::Internal(children) => children.clone(),
            NodeKind::Leaf(_) => unreachable!("collapse called on a leaf"),
        };

        let mut fused = 0;
        let mut survivors = Vec::with_capacity(children.len());
        for child in children {
            let child_node = self.pool.pop(child).expect("child key must be valid");
            let mut bucket = match child_node.kind {
                NodeKind::Leaf(bucket) => bucket,
                NodeKind::Internal(_) => unreachable!("level-1 node's children must be leaves"),
            };
            if bucket.is_empty() {
                continue;
            }
            let (coord, mut value) = bucket.remove(0);
            for (_, later) in bucket {
                (self.merge)(&mut value, later);
                fused += 1;
            }
            survivors.push((coord.shr1(), value));
        }

        self.pool.get_mut(key).kind = NodeKind::Leaf(survivors);
        fused
    }
}
