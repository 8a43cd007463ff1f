//! Property-based tests for the container's documented invariants.
//!
//! These run as crate-internal unit tests (rather than under `tests/`)
//! because several of them cross-check against [`crate::node::subtree_size`]
//! and the differential [`crate::reference::RefMap`] oracle, both of which
//! are private to the crate.

use crate::coord::Coord;
use crate::node;
use crate::reference::RefMap;
use crate::CMap;
use proptest::collection::vec as pvec;
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

fn sum_merge(a: &mut i64, b: i64) {
    *a += b;
}

fn coords_strategy(dim: usize, max_axis: u32) -> impl Strategy<Value = Vec<[u32; 3]>> {
    let axis2 = if dim > 1 { 0..=max_axis } else { 0..=0 };
    let axis3 = if dim > 2 { 0..=max_axis } else { 0..=0 };
    pvec([0..=max_axis, axis2, axis3], 0..64)
}

proptest! {
    #[test]
    fn p1_size_equals_distinct_coordinates(points in coords_strategy(3, 31)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        let mut distinct = HashSet::new();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
            distinct.insert(*p);
        }
        prop_assert_eq!(m.len(), distinct.len());
    }

    #[test]
    fn p2_size_matches_subtree_size_of_root(points in coords_strategy(3, 31)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
        }
        prop_assert_eq!(m.len(), node::subtree_size(&m.pool, m.root));

        if !points.is_empty() {
            m.remove(&Coord::new(&points[0]).unwrap());
            prop_assert_eq!(m.len(), node::subtree_size(&m.pool, m.root));
        }
    }

    #[test]
    fn p3_forward_and_backward_yield_the_same_multiset(points in coords_strategy(3, 31)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
        }
        let forward: Vec<_> = m.iter().map(|(c, _)| *c).collect();
        prop_assert_eq!(forward.len(), m.len());

        let mut backward: Vec<_> = m.iter().rev().map(|(c, _)| *c).collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn p4_colliding_inserts_apply_merge(v1 in any::<i64>(), v2 in any::<i64>()) {
        fn wrapping_merge(a: &mut i64, b: i64) {
            *a = a.wrapping_add(b);
        }
        let mut m = CMap::<u32, i64, _>::new(2, wrapping_merge).unwrap();
        let c = Coord::new(&[5, 5]).unwrap();
        m.insert(c, v1);
        m.insert(c, v2);
        prop_assert_eq!(*m.get(&c).unwrap(), v1.wrapping_add(v2));
    }

    #[test]
    fn p5_resize_shifts_every_coordinate(points in coords_strategy(3, 1000)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        let mut oracle = RefMap::<u32, i64>::new();
        let mut merge = sum_merge;
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
            oracle.insert(Coord::new(p).unwrap(), 1, &mut merge);
        }

        let resizes_before = m.num_resizes();
        m.resize();
        oracle.resize(&mut merge);

        prop_assert_eq!(m.num_resizes(), resizes_before + 1);

        let mut expected: Vec<_> = oracle.ordered_coords();
        expected.sort_by_key(|c| c.axes().to_vec());
        let mut actual: Vec<_> = m.iter().map(|(c, _)| *c).collect();
        actual.sort_by_key(|c| c.axes().to_vec());
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn p6_merge_count_accounts_for_size_delta(points in coords_strategy(3, 1000)) {
        let counter = Rc::new(Cell::new(0usize));
        let counting = {
            let counter = Rc::clone(&counter);
            move |a: &mut i64, b: i64| {
                counter.set(counter.get() + 1);
                *a += b;
            }
        };
        let mut m = CMap::<u32, i64, _>::new(3, counting).unwrap();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
        }

        let size_before = m.len();
        counter.set(0);
        m.resize();
        prop_assert_eq!(size_before - m.len(), counter.get());
    }

    #[test]
    fn p8_erase_then_contains_is_false(points in coords_strategy(2, 63)) {
        let mut m = CMap::<u32, i64, _>::new(2, sum_merge).unwrap();
        for p in &points {
            m.insert(Coord::new(&p[..2]).unwrap(), 1);
        }
        if let Some(first) = points.first() {
            let c = Coord::new(&first[..2]).unwrap();
            let before = m.len();
            let removed = m.remove(&c);
            prop_assert!(removed.is_some());
            prop_assert!(!m.contains_key(&c));
            prop_assert_eq!(m.len(), before - 1);
        }
    }

    #[test]
    fn p9_prune_is_idempotent(points in coords_strategy(3, 31)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
        }
        m.prune();
        let after_first: Vec<_> = m.iter().map(|(c, v)| (*c, *v)).collect();
        m.prune();
        let after_second: Vec<_> = m.iter().map(|(c, v)| (*c, *v)).collect();
        prop_assert_eq!(after_first, after_second);
    }

    #[test]
    fn p10_clear_resets_everything(points in coords_strategy(3, 31)) {
        let mut m = CMap::<u32, i64, _>::new(3, sum_merge).unwrap();
        for p in &points {
            m.insert(Coord::new(p).unwrap(), 1);
        }
        m.resize();
        m.clear();
        prop_assert_eq!(m.len(), 0);
        prop_assert!(m.is_empty());
        prop_assert_eq!(m.num_resizes(), 0);
    }
}
