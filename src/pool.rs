//! A reusable-slot arena, used so that node creation and destruction during
//! split/collapse/prune never has to walk an owning `Box` tree.
//!
//! Adapted from the teacher's `ObjectPool`: the same free-list-by-index
//! strategy, just without the bencode (de)serialization machinery, which has
//! no role in this crate (persistence is a stated non-goal).

use std::vec::Vec;

/// One item in a pool with a used flag.
#[derive(Clone)]
struct ReusableItem<T> {
    reserved: bool,
    item: T,
}

/// Stores re-usable objects so that arena-indexed trees (see [`crate::node`])
/// don't pay an allocation for every split and every collapse.
#[derive(Default, Clone)]
pub(crate) struct ObjectPool<T> {
    buffer: Vec<ReusableItem<T>>,
    first_available: usize,
}

impl<T> ObjectPool<T>
where
    T: Default,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        ObjectPool {
            buffer: Vec::with_capacity(capacity),
            first_available: 0,
        }
    }

    fn is_next_available(&self) -> bool {
        self.first_available + 1 < self.buffer.len() && !self.buffer[self.first_available + 1].reserved
    }

    fn check_first_available(&mut self) -> bool {
        if self.first_available < self.buffer.len() && !self.buffer[self.first_available].reserved {
            true
        } else if self.is_next_available() {
            self.first_available += 1;
            true
        } else {
            self.first_available = self.buffer.len();
            false
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn push(&mut self, item: T) -> u32 {
        let key = self.allocate();
        *self.get_mut(key) = item;
        key
    }

    pub(crate) fn allocate(&mut self) -> u32 {
        let key = if self.check_first_available() {
            self.buffer[self.first_available].reserved = true;
            self.first_available
        } else {
            self.buffer.push(ReusableItem {
                reserved: true,
                item: T::default(),
            });
            self.buffer.len() - 1
        };
        if self.is_next_available() {
            self.first_available += 1;
        }
        key as u32
    }

    pub(crate) fn pop(&mut self, key: u32) -> Option<T> {
        let key = key as usize;
        if self.key_is_valid(key as u32) {
            self.buffer[key].reserved = false;
            self.first_available = self.first_available.min(key);
            Some(std::mem::take(&mut self.buffer[key].item))
        } else {
            None
        }
    }

    pub(crate) fn get(&self, key: u32) -> &T {
        let key = key as usize;
        debug_assert!(self.key_is_valid(key as u32));
        &self.buffer[key].item
    }

    pub(crate) fn get_mut(&mut self, key: u32) -> &mut T {
        let key_u = key as usize;
        debug_assert!(self.key_is_valid(key));
        &mut self.buffer[key_u].item
    }

    pub(crate) fn key_is_valid(&self, key: u32) -> bool {
        let key = key as usize;
        key < self.buffer.len() && self.buffer[key].reserved
    }
}
