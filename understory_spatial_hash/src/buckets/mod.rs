// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cell payload containers.
//!
//! - `vec`: unbounded, insertion-ordered list of references ([`VecBucket`]).
//! - `heap`: bounded, ranked by key, capacity fixed by a const generic ([`HeapBucket`]).
//! - `ordered`: bounded, ranked by key, capacity chosen at run time ([`OrderedBucket`]).
//!
//! Ranking policy
//! --------------
//! Both bounded buckets keep the best `capacity` entries under a [`RankOrder`]
//! chosen as a type parameter: [`KeepSmallest`] (the default) or [`KeepLargest`].
//! When keys tie, the entry inserted first ranks better, so a later entry with
//! an equal key never displaces an earlier one. A full bucket therefore holds
//! exactly the first `capacity` entries of a stable sort of everything it was
//! offered.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::marker::PhantomData;

pub(crate) mod heap;
pub(crate) mod ordered;
pub(crate) mod vec;

pub use heap::HeapBucket;
pub use ordered::{Capacity, OrderedBucket};
pub use vec::VecBucket;

/// Container stored in each populated cell of a [`GridTable`][crate::GridTable].
///
/// The table creates a bucket with [`with_config`][Self::with_config] on the
/// first insertion into a cell and forwards every later insertion to
/// [`push`][Self::push].
pub trait Bucket {
    /// What a single insertion hands to the bucket.
    type Entry;
    /// The caller-visible reference returned by queries.
    type Ref;
    /// Per-table settings applied to every new bucket.
    type Config: Clone + Debug + Default;

    /// Create an empty bucket.
    fn with_config(config: &Self::Config) -> Self;

    /// Offer an entry to the bucket. Bounded buckets may drop it or evict another.
    fn push(&mut self, entry: Self::Entry);

    /// Number of retained entries.
    fn len(&self) -> usize;

    /// Whether the bucket retains nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retained references, in a bucket-specific order.
    fn refs(&self) -> impl Iterator<Item = &Self::Ref>;
}

/// Ranking direction for bounded buckets.
pub trait RankOrder: Copy + Default + Debug {
    /// Compare two keys; [`Ordering::Less`] means `a` ranks better than `b`.
    fn rank<K: Ord>(a: &K, b: &K) -> Ordering;
}

/// Retain the entries with the smallest keys (e.g. nearest candidates by distance).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeepSmallest;

impl RankOrder for KeepSmallest {
    #[inline]
    fn rank<K: Ord>(a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Retain the entries with the largest keys (e.g. highest scores).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeepLargest;

impl RankOrder for KeepLargest {
    #[inline]
    fn rank<K: Ord>(a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

/// Sort key shared by the bounded buckets: rank order first, then arrival.
///
/// Orders best first, so the greatest value is the next to evict.
#[derive(Clone, Debug)]
pub(crate) struct RankKey<K, O> {
    pub(crate) key: K,
    seq: u64,
    _order: PhantomData<O>,
}

impl<K, O> RankKey<K, O> {
    pub(crate) fn new(key: K, seq: u64) -> Self {
        Self {
            key,
            seq,
            _order: PhantomData,
        }
    }
}

impl<K: Ord, O: RankOrder> Ord for RankKey<K, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::rank(&self.key, &other.key).then(self.seq.cmp(&other.seq))
    }
}

impl<K: Ord, O: RankOrder> PartialOrd for RankKey<K, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, O: RankOrder> PartialEq for RankKey<K, O> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, O: RankOrder> Eq for RankKey<K, O> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_are_opposite() {
        assert_eq!(KeepSmallest::rank(&1, &2), Ordering::Less);
        assert_eq!(KeepLargest::rank(&1, &2), Ordering::Greater);
        assert_eq!(KeepLargest::rank(&3, &3), Ordering::Equal);
    }

    #[test]
    fn rank_key_breaks_ties_by_arrival() {
        let early = RankKey::<u32, KeepLargest>::new(7, 0);
        let late = RankKey::<u32, KeepLargest>::new(7, 1);
        assert!(early < late);

        let big = RankKey::<u32, KeepLargest>::new(9, 5);
        assert!(big < early);
    }
}
