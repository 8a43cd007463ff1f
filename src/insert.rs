//! Insert / emplace engine (component C2).
//!
//! Grounded on the teacher's `insert_at_lod`: an iterative descent (no
//! recursion, so depth is bounded only by a loop rather than the call
//! stack) that either lands in an existing leaf to merge, appends to a
//! leaf with room, or splits an overflowing leaf and keeps descending.

use crate::coord::{Component, Coord};
use crate::node::{Node, NodeKind};
use crate::CMap;

impl<C, T, F> CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    /// Inserts `value` at `coord`. If an entry already exists at `coord`,
    /// folds `value` into it via the container's merge operation instead of
    /// overwriting it.
    pub fn insert(&mut self, coord: Coord<C>, value: T) {
        self.emplace(coord, || value);
    }

    /// Like [`CMap::insert`], but the incoming payload is built lazily via
    /// `make` instead of passed by value. `make` runs exactly once per call,
    /// whether it lands in a fresh bucket slot or is folded into an existing
    /// entry through the container's merge operation — the laziness is over
    /// the cost of constructing `T` itself, deferred until `emplace` is
    /// actually reached (useful behind a conditional insert).
    pub fn emplace<G>(&mut self, coord: Coord<C>, make: G)
    where
        G: FnOnce() -> T,
    {
        assert_eq!(
            coord.dim(),
            self.dim,
            "coordinate has {} axes but the container's dimension is {}",
            coord.dim(),
            self.dim
        );

        let mut current = self.root;
        loop {
            if self.pool.get(current).is_leaf() {
                if let Some(pos) = self
                    .pool
                    .get(current)
                    .bucket()
                    .iter()
                    .position(|(k, _)| *k == coord)
                {
                    let existing = &mut self.pool.get_mut(current).bucket_mut()[pos].1;
                    (self.merge)(existing, make());
                    return;
                }

                let capacity = 1usize << self.dim;
                if self.pool.get(current).bucket().len() < capacity {
                    self.pool.get_mut(current).bucket_mut().push((coord, make()));
                    self.len += 1;
                    return;
                }

                let level = self.pool.get(current).level;
                assert!(
                    level >= 1,
                    "cannot split a leaf at level 0: more than 2^D entries share every bit \
                     of every axis, which I1 and merge forbid"
                );
                self.split(current, level);
                // current is now internal; fall through to descend below.
            }

            let level = self.pool.get(current).level;
            let idx = coord.child_index(level);
            current = self.pool.get(current).children()[idx];
        }
    }

    /// Turns an overflowing leaf into an internal node with `2^D` fresh
    /// leaf children at `level - 1`, redistributing the old bucket among
    /// them by child index at `level`.
    pub(crate) fn split(&mut self, key: u32, level: u32) {
        let capacity = 1usize << self.dim;
        let old_bucket = std::mem::take(self.pool.get_mut(key).bucket_mut());

        let mut children = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            children.push(self.pool.push(Node::new_leaf(Some(key), level - 1)));
        }
        for entry in old_bucket {
            let idx = entry.0.child_index(level);
            self.pool.get_mut(children[idx]).bucket_mut().push(entry);
        }
        self.pool.get_mut(key).kind = NodeKind::Internal(children);
    }
}
