//! A resizable, hierarchical bit-partitioned coordinate map.
//!
//! `CMap<C, T, F>` keys `T` payloads by `D`-dimensional unsigned integer
//! coordinates (`D` is a runtime parameter in `1..=8`; the axis width `W` is
//! fixed by the chosen [`Component`] type, e.g. `u32`). Internally it is a
//! `2^D`-ary tree: each internal node discriminates one bit of every axis,
//! and each leaf holds up to `2^D` entries in an unordered bucket. Keys that
//! collide on insert are folded together with a caller-supplied `merge`
//! closure instead of overwriting one another.
//!
//! The defining operation beyond a normal map is [`CMap::resize`], which
//! halves every stored coordinate (a right shift by one bit) and fuses any
//! entries that collide as a result — useful for coordinate spaces that
//! periodically need to be "zoomed out".

mod coord;
mod error;
mod insert;
mod iter;
mod node;
mod pool;
mod prune;
mod resize;
mod traversal;

#[cfg(test)]
mod reference;
#[cfg(test)]
mod proptests;

pub use coord::{Component, Coord, MAX_DIM};
pub use error::CMapError;
pub use iter::{Direction, EntryCursor, Iter, IterMut};

use node::Node;
use pool::ObjectPool;

/// A resizable coordinate map over `D`-dimensional keys made of `C`
/// components, folding colliding payloads with `F`.
pub struct CMap<C: Component, T, F: FnMut(&mut T, T)> {
    dim: u32,
    pub(crate) root: u32,
    pub(crate) pool: ObjectPool<Node<C, T>>,
    len: usize,
    resizes: u32,
    merge: F,
}

impl<C, T, F> CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    /// Creates an empty map of dimension `dim` (`1..=MAX_DIM`). `merge` folds
    /// an incoming payload into an existing one on coordinate collision,
    /// whether from [`CMap::insert`]/[`CMap::emplace`] or from entries that
    /// collapse together during [`CMap::resize`].
    pub fn new(dim: u32, merge: F) -> Result<Self, CMapError> {
        if dim == 0 || dim > MAX_DIM {
            return Err(CMapError::InvalidDimension(dim));
        }
        let mut pool = ObjectPool::with_capacity(1);
        let root = pool.push(Node::new_leaf(None, C::BITS - 1));
        Ok(CMap {
            dim,
            root,
            pool,
            len: 0,
            resizes: 0,
            merge,
        })
    }

    /// The container's dimension D.
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of times [`CMap::resize`] has been called.
    pub fn num_resizes(&self) -> u32 {
        self.resizes
    }

    /// Resets the container to a single empty leaf at level `W-1`, as if
    /// freshly constructed, preserving the merge closure and dimension.
    pub fn clear(&mut self) {
        let mut pool = ObjectPool::with_capacity(1);
        let root = pool.push(Node::new_leaf(None, C::BITS - 1));
        self.pool = pool;
        self.root = root;
        self.len = 0;
        self.resizes = 0;
    }

    fn descend_to_leaf(&self, coord: &Coord<C>) -> u32 {
        let mut current = self.root;
        while !self.pool.get(current).is_leaf() {
            let level = self.pool.get(current).level;
            let idx = coord.child_index(level);
            current = self.pool.get(current).children()[idx];
        }
        current
    }

    /// Looks up the payload stored at `coord`, if any.
    pub fn get(&self, coord: &Coord<C>) -> Option<&T> {
        let leaf = self.descend_to_leaf(coord);
        self.pool
            .get(leaf)
            .bucket()
            .iter()
            .find(|(k, _)| k == coord)
            .map(|(_, v)| v)
    }

    /// Looks up a mutable reference to the payload stored at `coord`, if any.
    pub fn get_mut(&mut self, coord: &Coord<C>) -> Option<&mut T> {
        let leaf = self.descend_to_leaf(coord);
        self.pool
            .get_mut(leaf)
            .bucket_mut()
            .iter_mut()
            .find(|(k, _)| k == coord)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, coord: &Coord<C>) -> bool {
        self.get(coord).is_some()
    }

    /// Removes the entry at `coord`, re-collapsing the tree top-down
    /// afterwards (see [`CMap::prune`]). Returns the removed payload, if
    /// there was one.
    pub fn remove(&mut self, coord: &Coord<C>) -> Option<T> {
        let leaf = self.descend_to_leaf(coord);
        let bucket = self.pool.get_mut(leaf).bucket_mut();
        let pos = bucket.iter().position(|(k, _)| k == coord)?;
        let (_, value) = bucket.remove(pos);
        self.len -= 1;
        self.prune();
        Some(value)
    }

    /// Removes the entry a cursor points at. The cursor is invalidated by
    /// this call, as is every other outstanding cursor into the container
    /// (removal re-collapses the tree top-down).
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is stale — pointing past the end of its leaf's
    /// current bucket, as happens once an intervening `remove`/
    /// `remove_range`/`prune`/`resize` has run. Cursors are single-use.
    pub fn remove_at(&mut self, cursor: EntryCursor) -> Option<T> {
        let bucket = self.pool.get(cursor.0).bucket();
        assert!(
            cursor.1 < bucket.len(),
            "stale cursor: position {} is out of range for its leaf's current bucket (len {})",
            cursor.1,
            bucket.len()
        );
        let coord = bucket[cursor.1].0;
        self.remove(&coord)
    }

    /// Removes the half-open sequence of entries from `first` (inclusive) to
    /// `last` (exclusive, in iteration order); `last = None` removes through
    /// the end. Re-collapses the tree once, after all removals. Returns the
    /// number of entries removed.
    pub fn remove_range(&mut self, first: EntryCursor, last: Option<EntryCursor>) -> usize {
        let last = last.map(|c| (c.0, c.1));
        let mut coords = Vec::new();
        let mut cursor = Some((first.0, first.1));
        while let Some((leaf, pos)) = cursor {
            if Some((leaf, pos)) == last {
                break;
            }
            coords.push(self.pool.get(leaf).bucket()[pos].0);
            cursor = traversal::successor(&self.pool, leaf, pos);
        }
        for coord in &coords {
            let leaf = self.descend_to_leaf(coord);
            let bucket = self.pool.get_mut(leaf).bucket_mut();
            if let Some(pos) = bucket.iter().position(|(k, _)| k == coord) {
                bucket.remove(pos);
                self.len -= 1;
            }
        }
        self.prune();
        coords.len()
    }

    /// Double-ended iterator over `(&Coord<C>, &T)` in tree order.
    pub fn iter(&self) -> Iter<'_, C, T> {
        Iter::new(&self.pool, self.root)
    }

    /// Forward mutable iterator over `(&Coord<C>, &mut T)`.
    pub fn iter_mut(&mut self) -> IterMut<'_, C, T> {
        IterMut::new(&mut self.pool, self.root, Direction::Forward)
    }

    /// Backward mutable iterator over `(&Coord<C>, &mut T)`.
    pub fn iter_mut_rev(&mut self) -> IterMut<'_, C, T> {
        IterMut::new(&mut self.pool, self.root, Direction::Backward)
    }
}

impl<C, T, F> CMap<C, T, F>
where
    C: Component,
    T: Default,
    F: FnMut(&mut T, T),
{
    /// Returns a mutable reference to the payload at `coord`, inserting
    /// `T::default()` first if absent. Mirrors `operator[]`.
    pub fn entry_or_default(&mut self, coord: Coord<C>) -> &mut T {
        if !self.contains_key(&coord) {
            self.emplace(coord, T::default);
        }
        self.get_mut(&coord).expect("just inserted")
    }
}

impl<'a, C, T, F> IntoIterator for &'a CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    type Item = (&'a Coord<C>, &'a T);
    type IntoIter = Iter<'a, C, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, C, T, F> IntoIterator for &'a mut CMap<C, T, F>
where
    C: Component,
    F: FnMut(&mut T, T),
{
    type Item = (&'a Coord<C>, &'a mut T);
    type IntoIter = IterMut<'a, C, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<C, T, F> std::fmt::Debug for CMap<C, T, F>
where
    C: Component,
    T: std::fmt::Debug,
    F: FnMut(&mut T, T),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CMap")
            .field("dim", &self.dim)
            .field("len", &self.len)
            .field("num_resizes", &self.resizes)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
