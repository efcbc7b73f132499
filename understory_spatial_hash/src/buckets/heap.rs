// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded bucket with a compile-time capacity.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;

use super::{Bucket, KeepSmallest, RankKey, RankOrder};

#[derive(Clone, Debug)]
struct HeapEntry<K, R, O> {
    rank: RankKey<K, O>,
    value: R,
}

impl<K: Ord, R, O: RankOrder> Ord for HeapEntry<K, R, O> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl<K: Ord, R, O: RankOrder> PartialOrd for HeapEntry<K, R, O> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, R, O: RankOrder> PartialEq for HeapEntry<K, R, O> {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl<K: Ord, R, O: RankOrder> Eq for HeapEntry<K, R, O> {}

/// Keeps the `N` best `(key, ref)` entries under the rank order `O`.
///
/// Backed by a binary heap whose top is the worst retained entry, so a
/// rejected candidate costs one comparison and an accepted one replaces the
/// top in `O(log N)`.
///
/// ```
/// use understory_spatial_hash::{Bucket, HeapBucket};
///
/// let mut bucket: HeapBucket<u32, char, 2> = HeapBucket::new();
/// bucket.push((5, 'a'));
/// bucket.push((1, 'b'));
/// bucket.push((3, 'c'));
/// assert_eq!(bucket.into_sorted_vec(), vec![(1, 'b'), (3, 'c')]);
/// ```
#[derive(Clone, Debug)]
pub struct HeapBucket<K, R, const N: usize, O = KeepSmallest> {
    heap: BinaryHeap<HeapEntry<K, R, O>>,
    next_seq: u64,
}

impl<K: Ord, R, const N: usize, O: RankOrder> HeapBucket<K, R, N, O> {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Maximum number of retained entries.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The entry that would be evicted next, if any.
    pub fn worst(&self) -> Option<(&K, &R)> {
        self.heap.peek().map(|e| (&e.rank.key, &e.value))
    }

    /// Iterate retained entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &R)> {
        self.heap.iter().map(|e| (&e.rank.key, &e.value))
    }

    /// Consume the bucket, returning its entries best first.
    pub fn into_sorted_vec(self) -> Vec<(K, R)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| (e.rank.key, e.value))
            .collect()
    }
}

impl<K: Ord, R, const N: usize, O: RankOrder> Default for HeapBucket<K, R, N, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, R, const N: usize, O: RankOrder> Bucket for HeapBucket<K, R, N, O> {
    type Entry = (K, R);
    type Ref = R;
    type Config = ();

    fn with_config(_config: &()) -> Self {
        Self::new()
    }

    fn push(&mut self, (key, value): (K, R)) {
        let candidate = HeapEntry {
            rank: RankKey::new(key, self.next_seq),
            value,
        };
        self.next_seq += 1;

        if self.heap.len() < N {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut()
            && candidate < *worst
        {
            // Replacing through `PeekMut` sifts the new entry down on drop.
            *worst = candidate;
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn refs(&self) -> impl Iterator<Item = &R> {
        self.heap.iter().map(|e| &e.value)
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
    fn keeps_smallest_by_default() {
        let mut bucket: HeapBucket<i32, usize, 3> = HeapBucket::new();
        for (i, key) in [9, 4, 7, 1, 8, 2].into_iter().enumerate() {
            bucket.push((key, i));
            assert!(bucket.len() <= 3);
        }
        assert_eq!(bucket.worst(), Some((&4, &1)));
        assert_eq!(bucket.into_sorted_vec(), vec![(1, 3), (2, 5), (4, 1)]);
    }

    #[test]
    fn keeps_largest_when_asked() {
        let mut bucket: HeapBucket<i32, usize, 2, KeepLargest> = HeapBucket::new();
        for (i, key) in [3, 10, -1, 7].into_iter().enumerate() {
            bucket.push((key, i));
        }
        assert_eq!(bucket.into_sorted_vec(), vec![(10, 1), (7, 3)]);
    }

    #[test]
    fn ties_keep_earlier_entries() {
        let mut bucket: HeapBucket<u8, char, 2> = HeapBucket::new();
        bucket.push((1, 'a'));
        bucket.push((1, 'b'));
        bucket.push((1, 'c'));
        bucket.push((0, 'd'));
        assert_eq!(bucket.into_sorted_vec(), vec![(0, 'd'), (1, 'a')]);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut bucket: HeapBucket<u8, u8, 0> = HeapBucket::new();
        bucket.push((1, 1));
        assert!(bucket.is_empty());
        assert_eq!(bucket.worst(), None);
    }

    #[test]
    fn matches_reference_sort() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bucket: HeapBucket<u32, usize, 16> = HeapBucket::new();
        let mut offered = Vec::new();
        for i in 0..1000 {
            let key = rng.gen_range(0..200_u32);
            bucket.push((key, i));
            offered.push((key, i));
            assert!(bucket.len() <= bucket.capacity());
        }
        // Stable sort by key mirrors the tie rule (earlier insertion wins).
        offered.sort_by_key(|&(key, _)| key);
        offered.truncate(16);
        assert_eq!(bucket.into_sorted_vec(), offered);
    }
}
