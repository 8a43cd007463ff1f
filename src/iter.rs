//! Public iteration over a container's entries (component C6).
//!
//! `Iter` is a plain double-ended iterator over shared references — aliasing
//! is a non-issue there, so it is entirely safe. A double-ended *mutable*
//! iterator over an arena would need two independently-advancing cursors
//! that the borrow checker cannot see are disjoint; rather than reach for
//! `unsafe` to prove that, `IterMut` only runs in one direction, chosen at
//! construction via [`Direction`].

use crate::coord::{Component, Coord};
use crate::node::Node;
use crate::pool::ObjectPool;
use crate::traversal::{self, Cursor};

/// Forward or backward, for [`IterMut`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A stable handle to a traversal position, usable with
/// [`crate::CMap::remove_at`] and [`crate::CMap::remove_range`].
///
/// Cursors are invalidated by any structural change to the container
/// (insert-triggered split, `resize`, `prune`, or any `remove*` call) made
/// after they were obtained; using a stale cursor is a logic error the same
/// way a stale C++ iterator would be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryCursor(pub(crate) u32, pub(crate) usize);

/// Double-ended iterator over `(&Coord<C>, &T)`, visiting entries in
/// ascending coordinate order (the order induced by the bit-partitioned
/// tree, not a sort).
pub struct Iter<'a, C: Component, T> {
    pool: &'a ObjectPool<Node<C, T>>,
    front: Cursor,
    back: Cursor,
}

impl<'a, C: Component, T> Iter<'a, C, T> {
    pub(crate) fn new(pool: &'a ObjectPool<Node<C, T>>, root: u32) -> Self {
        Iter {
            pool,
            front: traversal::leftmost(pool, root),
            back: traversal::rightmost(pool, root),
        }
    }

    fn entry(&self, cursor: (u32, usize)) -> (&'a Coord<C>, &'a T) {
        let (coord, value) = &self.pool.get(cursor.0).bucket()[cursor.1];
        (coord, value)
    }

    /// The cursor that would be yielded by the next call to `next`, if any.
    pub fn cursor(&self) -> Option<EntryCursor> {
        self.front.map(|(k, p)| EntryCursor(k, p))
    }
}

impl<'a, C: Component, T> Iterator for Iter<'a, C, T> {
    type Item = (&'a Coord<C>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.front?;
        if Some(cur) == self.back {
            self.front = None;
            self.back = None;
            return Some(self.entry(cur));
        }
        self.front = traversal::successor(self.pool, cur.0, cur.1);
        Some(self.entry(cur))
    }
}

impl<'a, C: Component, T> DoubleEndedIterator for Iter<'a, C, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let cur = self.back?;
        if Some(cur) == self.front {
            self.front = None;
            self.back = None;
            return Some(self.entry(cur));
        }
        self.back = traversal::predecessor(self.pool, cur.0, cur.1);
        Some(self.entry(cur))
    }
}

/// Single-direction mutable iterator over `(&Coord<C>, &mut T)`.
pub struct IterMut<'a, C: Component, T> {
    pool: &'a mut ObjectPool<Node<C, T>>,
    cursor: Cursor,
    direction: Direction,
}

impl<'a, C: Component, T> IterMut<'a, C, T> {
    pub(crate) fn new(pool: &'a mut ObjectPool<Node<C, T>>, root: u32, direction: Direction) -> Self {
        let cursor = match direction {
            Direction::Forward => traversal::leftmost(pool, root),
            Direction::Backward => traversal::rightmost(pool, root),
        };
        IterMut {
            pool,
            cursor,
            direction,
        }
    }

    pub fn cursor(&self) -> Option<EntryCursor> {
        self.cursor.map(|(k, p)| EntryCursor(k, p))
    }
}

impl<'a, C: Component, T> Iterator for IterMut<'a, C, T> {
    type Item = (&'a Coord<C>, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let (leaf, pos) = self.cursor?;
        self.cursor = match self.direction {
            Direction::Forward => traversal::successor(self.pool, leaf, pos),
            Direction::Backward => traversal::predecessor(self.pool, leaf, pos),
        };

        // SAFETY: each entry is visited at most once per traversal (the
        // cursor only ever advances), so the `'a` borrow handed out here
        // never aliases a borrow handed out by a previous or future call.
        let bucket_ptr = self.pool.get_mut(leaf).bucket_mut().as_mut_ptr();
        let entry: &'a mut (Coord<C>, T) = unsafe { &mut *bucket_ptr.add(pos) };
        Some((&entry.0, &mut entry.1))
    }
}
