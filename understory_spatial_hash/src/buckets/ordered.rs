// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded bucket with a run-time capacity.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use super::{Bucket, KeepSmallest, RankKey, RankOrder};

/// Capacity handed to every [`OrderedBucket`] a table creates.
///
/// Buckets read it once, on the first write to their cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(pub usize);

impl Capacity {
    /// Capacity used when none is configured.
    pub const DEFAULT: Self = Self(8);
}

impl Default for Capacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Keeps the best `capacity` `(key, ref)` entries under the rank order `O`.
///
/// Same retention contract as [`HeapBucket`][super::HeapBucket], but the
/// capacity is a run-time value and entries are held in key order, so
/// iteration is always best first.
///
/// ```
/// use understory_spatial_hash::{Bucket, KeepLargest, OrderedBucket};
///
/// let mut bucket: OrderedBucket<u32, &str, KeepLargest> = OrderedBucket::with_capacity(2);
/// bucket.push((1, "low"));
/// bucket.push((9, "high"));
/// bucket.push((5, "mid"));
/// let kept: Vec<_> = bucket.refs().copied().collect();
/// assert_eq!(kept, ["high", "mid"]);
/// ```
#[derive(Clone, Debug)]
pub struct OrderedBucket<K, R, O = KeepSmallest> {
    entries: BTreeMap<RankKey<K, O>, R>,
    capacity: usize,
    next_seq: u64,
}

impl<K: Ord, R, O: RankOrder> OrderedBucket<K, R, O> {
    /// Create an empty bucket that retains at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
            next_seq: 0,
        }
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The entry that would be evicted next, if any.
    pub fn worst(&self) -> Option<(&K, &R)> {
        self.entries.last_key_value().map(|(k, v)| (&k.key, v))
    }

    /// The best retained entry, if any.
    pub fn best(&self) -> Option<(&K, &R)> {
        self.entries.first_key_value().map(|(k, v)| (&k.key, v))
    }

    /// Iterate retained entries best first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &R)> {
        self.entries.iter().map(|(k, v)| (&k.key, v))
    }

    /// Consume the bucket, returning its entries best first.
    pub fn into_sorted_vec(self) -> Vec<(K, R)> {
        self.entries.into_iter().map(|(k, v)| (k.key, v)).collect()
    }
}

impl<K: Ord, R, O: RankOrder> Bucket for OrderedBucket<K, R, O> {
    type Entry = (K, R);
    type Ref = R;
    type Config = Capacity;

    fn with_config(config: &Capacity) -> Self {
        Self::with_capacity(config.0)
    }

    fn push(&mut self, (key, value): (K, R)) {
        let candidate = RankKey::new(key, self.next_seq);
        self.next_seq += 1;

        if self.entries.len() < self.capacity {
            self.entries.insert(candidate, value);
            return;
        }
        let displaces = self
            .entries
            .last_key_value()
            .is_some_and(|(worst, _)| candidate < *worst);
        if displaces {
            self.entries.pop_last();
            self.entries.insert(candidate, value);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn refs(&self) -> impl Iterator<Item = &R> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::KeepLargest;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn capacity_comes_from_config() {
        let bucket: OrderedBucket<u32, u32> = OrderedBucket::with_config(&Capacity(3));
        assert_eq!(bucket.capacity(), 3);
        let bucket: OrderedBucket<u32, u32> = OrderedBucket::with_config(&Capacity::default());
        assert_eq!(bucket.capacity(), Capacity::DEFAULT.0);
    }

    #[test]
    fn iterates_best_first() {
        let mut bucket: OrderedBucket<i64, char> = OrderedBucket::with_capacity(3);
        for (key, c) in [(5, 'a'), (-2, 'b'), (9, 'c'), (0, 'd')] {
            bucket.push((key, c));
        }
        let kept: Vec<_> = bucket.iter().map(|(k, c)| (*k, *c)).collect();
        assert_eq!(kept, vec![(-2, 'b'), (0, 'd'), (5, 'a')]);
        assert_eq!(bucket.best(), Some((&-2, &'b')));
        assert_eq!(bucket.worst(), Some((&5, &'a')));
    }

    #[test]
    fn both_directions_match_reference_sort() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut smallest: OrderedBucket<u16, usize> = OrderedBucket::with_capacity(10);
        let mut largest: OrderedBucket<u16, usize, KeepLargest> = OrderedBucket::with_capacity(10);
        let mut offered = Vec::new();
        for i in 0..500 {
            let key = rng.gen_range(0..50_u16);
            smallest.push((key, i));
            largest.push((key, i));
            offered.push((key, i));
            assert!(smallest.len() <= 10);
            assert!(largest.len() <= 10);
        }

        let mut ascending = offered.clone();
        ascending.sort_by_key(|&(key, _)| key);
        ascending.truncate(10);
        assert_eq!(smallest.into_sorted_vec(), ascending);

        let mut descending = offered;
        descending.sort_by(|a, b| b.0.cmp(&a.0));
        descending.truncate(10);
        assert_eq!(largest.into_sorted_vec(), descending);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut bucket: OrderedBucket<u8, u8> = OrderedBucket::with_capacity(0);
        bucket.push((0, 0));
        assert!(bucket.is_empty());
        assert_eq!(bucket.best(), None);
    }
}
