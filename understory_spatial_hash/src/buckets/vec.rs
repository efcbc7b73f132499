// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unbounded bucket.

use smallvec::SmallVec;

use super::Bucket;

/// Append-only list of references, iterated in insertion order.
///
/// Small cells stay inline; growth is unbounded and left to the caller.
#[derive(Clone, Debug)]
pub struct VecBucket<R> {
    refs: SmallVec<[R; 4]>,
}

impl<R> VecBucket<R> {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self {
            refs: SmallVec::new(),
        }
    }

    /// Retained references in insertion order.
    pub fn as_slice(&self) -> &[R] {
        &self.refs
    }

    /// Iterate references in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, R> {
        self.refs.iter()
    }
}

impl<R> Default for VecBucket<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Bucket for VecBucket<R> {
    type Entry = R;
    type Ref = R;
    type Config = ();

    fn with_config(_config: &()) -> Self {
        Self::new()
    }

    #[inline]
    fn push(&mut self, entry: R) {
        self.refs.push(entry);
    }

    fn len(&self) -> usize {
        self.refs.len()
    }

    fn refs(&self) -> impl Iterator<Item = &R> {
        self.refs.iter()
    }
}

impl<'a, R> IntoIterator for &'a VecBucket<R> {
    type Item = &'a R;
    type IntoIter = core::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}
